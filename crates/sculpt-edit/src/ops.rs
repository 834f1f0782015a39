//! One-shot terrain edits. Each operation writes every affected sample
//! through the grid, then remeshes each touched chunk exactly once.
use sculpt_chunk::{Grid, TouchedChunks};
use sculpt_geom::Vec3;

use crate::brush::{Brush, LineOptions, ModifyMode, PaintOptions};

/// Floor for the distance divisor so the sample under the brush centre stays finite.
const MIN_DISTANCE: f32 = 1e-3;
/// Half-thickness of the smoothing disc along the surface normal.
const SMOOTH_HALF_THICKNESS: f32 = 1.5;
/// Brush bounds must stay inside this magnitude so lattice indices never overflow `i32`.
const MAX_LATTICE_COORD: f32 = (1u32 << 30) as f32;

const NEIGHBOURS: [[i32; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

#[inline]
fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[inline]
fn lattice_vec(w: [i32; 3]) -> Vec3 {
    Vec3::new(w[0] as f32, w[1] as f32, w[2] as f32)
}

/// Lattice coordinates within the cube of half-width `ceil(range)` around the rounded point.
fn cube_around(point: Vec3, range: f32) -> impl Iterator<Item = [i32; 3]> {
    let r = range.max(0.0).ceil() as i32;
    let (hx, hy, hz) = point.round_i32();
    (-r..=r).flat_map(move |dz| {
        (-r..=r).flat_map(move |dy| (-r..=r).map(move |dx| [hx + dx, hy + dy, hz + dz]))
    })
}

/// True when every lattice coordinate within `radius` of `p` fits the index range.
fn within_lattice(p: Vec3, radius: f32) -> bool {
    let r = radius.max(0.0);
    p.is_finite()
        && r.is_finite()
        && [p.x, p.y, p.z]
            .iter()
            .all(|c| c.abs() + r + 1.0 < MAX_LATTICE_COORD)
}

/// Whether a sphere of radius `range` at `point` can land on a stored sample,
/// or on one the edit may create.
fn reaches_grid(grid: &Grid, point: Vec3, range: f32, creates_chunks: bool) -> bool {
    if !within_lattice(point, range) {
        log::warn!("ignoring brush at {:?} outside the lattice range", point);
        return false;
    }
    let r = range.max(0.0);
    creates_chunks || grid.chunks().any(|c| c.aabb().expanded(r).contains(point))
}

fn write_density(grid: &mut Grid, brush: &Brush, w: [i32; 3], value: f32, touched: &mut TouchedChunks) {
    let [x, y, z] = w;
    if brush.create_missing_chunks {
        grid.ensure_chunk_at(x, y, z, touched);
    }
    grid.set_density(x, y, z, value, touched);
}

fn finish(grid: &mut Grid, op: &str, touched: TouchedChunks) -> TouchedChunks {
    let remeshed = grid.remesh_touched(&touched);
    log::debug!("{op}: {} chunks touched, {} remeshed", touched.len(), remeshed);
    touched
}

/// Raises or lowers density inside a sphere of radius `brush.range`, scaled by
/// `force / distance` and the falloff curve at `1 - distance / force`.
pub fn modify_terrain(grid: &mut Grid, brush: &Brush, point: Vec3, mode: ModifyMode) -> TouchedChunks {
    let mut touched = TouchedChunks::new();
    if !reaches_grid(grid, point, brush.range, brush.create_missing_chunks) {
        return touched;
    }
    log::trace!("modify {:?} at {:?} range={} force={}", mode, point, brush.range, brush.force);
    for w in cube_around(point, brush.range) {
        let distance = lattice_vec(w).distance(point);
        if !(distance <= brush.range) {
            continue;
        }
        let t = if brush.force > 0.0 { distance / brush.force } else { 1.0 };
        let amount = brush.force / distance.max(MIN_DISTANCE) * brush.falloff.evaluate(1.0 - t);
        if amount == 0.0 || !amount.is_finite() {
            continue;
        }
        let [x, y, z] = w;
        if brush.create_missing_chunks {
            grid.ensure_chunk_at(x, y, z, &mut touched);
        }
        let Some(p) = grid.try_point(x, y, z) else {
            continue;
        };
        let new = clamp01(p.density + mode.sign() * amount);
        if new != p.density {
            grid.set_density(x, y, z, new, &mut touched);
        }
    }
    finish(grid, "modify", touched)
}

/// Flattens the columns within `brush.range` (XZ) of `point`: samples at or
/// below `brush.target_height` become solid and everything above empty.
pub fn set_terrain(grid: &mut Grid, brush: &Brush, point: Vec3) -> TouchedChunks {
    let mut touched = TouchedChunks::new();
    let Some((lo, hi)) = grid.vertical_extent() else {
        return touched;
    };
    if !within_lattice(point.flatten_y(), brush.range) {
        log::warn!("set: ignoring point {:?} outside the lattice range", point);
        return touched;
    }
    let r = brush.range.max(0.0).ceil() as i32;
    let (hx, _, hz) = point.round_i32();
    for dz in -r..=r {
        for dx in -r..=r {
            let (wx, wz) = (hx + dx, hz + dz);
            let d = Vec3::new(wx as f32 - point.x, 0.0, wz as f32 - point.z).length();
            if !(d <= brush.range) {
                continue;
            }
            for wy in lo..=hi {
                let value = if wy <= brush.target_height { 1.0 } else { 0.0 };
                write_density(grid, brush, [wx, wy, wz], value, &mut touched);
            }
        }
    }
    finish(grid, "set", touched)
}

/// Carves (or fills) a capsule of radius `brush.range` along the segment.
pub fn line_terrain(grid: &mut Grid, brush: &Brush, line: &LineOptions) -> TouchedChunks {
    let mut touched = TouchedChunks::new();
    let (a, b) = (line.start, line.end);
    if !within_lattice(a, brush.range) || !within_lattice(b, brush.range) {
        log::warn!("line: ignoring segment {:?} -> {:?} outside the lattice range", a, b);
        return touched;
    }
    let r = brush.range.max(0.0);
    let fill = if line.add_terrain { 1.0 } else { 0.0 };

    let x0 = (a.x.min(b.x) - r).floor() as i32;
    let x1 = (a.x.max(b.x) + r).ceil() as i32;
    let y0 = (a.y.min(b.y) - r).floor() as i32;
    let mut y1 = (a.y.max(b.y) + r).ceil() as i32;
    let z0 = (a.z.min(b.z) - r).floor() as i32;
    let z1 = (a.z.max(b.z) + r).ceil() as i32;
    if line.clear_above {
        if let Some((_, top)) = grid.vertical_extent() {
            y1 = y1.max(top);
        }
    }
    let (fa, fb) = (a.flatten_y(), b.flatten_y());

    for wz in z0..=z1 {
        for wy in y0..=y1 {
            for wx in x0..=x1 {
                let p = lattice_vec([wx, wy, wz]);
                let (q, _) = p.closest_on_segment(a, b);
                let value = if p.distance(q) <= r {
                    if line.flat_floor && p.y < q.y {
                        continue;
                    }
                    fill
                } else if line.clear_above {
                    let (fq, t) = p.flatten_y().closest_on_segment(fa, fb);
                    let height = a.y + (b.y - a.y) * t;
                    if p.flatten_y().distance(fq) <= r && p.y >= height {
                        0.0
                    } else {
                        continue;
                    }
                } else {
                    continue;
                };
                write_density(grid, brush, [wx, wy, wz], value, &mut touched);
            }
        }
    }
    finish(grid, "line", touched)
}

/// Blends each sample in a disc around `point` toward the mean of its existing
/// axis neighbours. All reads happen before any write.
pub fn smooth_terrain(grid: &mut Grid, brush: &Brush, point: Vec3, normal: Vec3) -> TouchedChunks {
    let mut touched = TouchedChunks::new();
    if !reaches_grid(grid, point, brush.range, false) {
        return touched;
    }
    let n = if normal.is_finite() && normal.length() > 0.0 {
        normal.normalized()
    } else {
        Vec3::UP
    };
    let blend = brush.force.clamp(0.0, 1.0);

    let mut updates: Vec<([i32; 3], f32)> = Vec::new();
    for w in cube_around(point, brush.range) {
        let offset = lattice_vec(w) - point;
        if !(offset.length() <= brush.range) || offset.dot(n).abs() > SMOOTH_HALF_THICKNESS {
            continue;
        }
        let [x, y, z] = w;
        let Some(p) = grid.try_point(x, y, z) else {
            continue;
        };
        let (sum, count) = NEIGHBOURS
            .iter()
            .filter_map(|[dx, dy, dz]| grid.try_point(x + dx, y + dy, z + dz))
            .fold((0.0f32, 0u32), |(s, c), q| (s + q.density, c + 1));
        if count == 0 {
            continue;
        }
        let average = sum / count as f32;
        let new = clamp01(p.density + (average - p.density) * blend);
        if new != p.density {
            updates.push((w, new));
        }
    }
    for ([x, y, z], value) in updates {
        grid.set_density(x, y, z, value, &mut touched);
    }
    finish(grid, "smooth", touched)
}

/// Sets the colour of samples in a sphere, optionally only where the
/// current colour passes the mask test.
pub fn paint_terrain(grid: &mut Grid, brush: &Brush, paint: &PaintOptions, point: Vec3) -> TouchedChunks {
    let mut touched = TouchedChunks::new();
    if !reaches_grid(grid, point, brush.range, brush.create_missing_chunks) {
        return touched;
    }
    for w in cube_around(point, brush.range) {
        if !(lattice_vec(w).distance(point) <= brush.range) {
            continue;
        }
        let [x, y, z] = w;
        if brush.create_missing_chunks {
            grid.ensure_chunk_at(x, y, z, &mut touched);
        }
        let Some(p) = grid.try_point(x, y, z) else {
            continue;
        };
        if p.colour == paint.colour || !paint.accepts(p.colour) {
            continue;
        }
        grid.set_colour(x, y, z, paint.colour, &mut touched);
    }
    finish(grid, "paint", touched)
}
