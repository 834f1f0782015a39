use sculpt_geom::{Rgba, Vec3};
use sculpt_world::{LatticePoint, lattice_index, lattice_len};

use crate::mesh_build::MeshBuffer;
use crate::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRIANGLE_TABLE};

/// Densities this close are treated as equal when placing an edge vertex.
pub const SNAP_EPSILON: f32 = 1e-6;

/// Bit `i` is set when corner `i` lies outside the surface (`density < iso`).
#[inline]
pub fn cube_index(densities: &[f32; 8], iso: f32) -> u8 {
    densities
        .iter()
        .enumerate()
        .fold(0u8, |acc, (i, &d)| if d < iso { acc | (1 << i) } else { acc })
}

#[inline]
fn corner_densities(points: &[LatticePoint], size: usize, x: usize, y: usize, z: usize) -> [f32; 8] {
    let mut d = [0.0f32; 8];
    for (c, &(ox, oy, oz)) in CORNER_OFFSETS.iter().enumerate() {
        d[c] = points[lattice_index(x + ox, y + oy, z + oz, size)].density;
    }
    d
}

/// Parameter along an edge where the density reaches `iso`, with snapping
/// for values that sit on the threshold or edges with no gradient.
#[inline]
pub fn edge_mu(iso: f32, v1: f32, v2: f32) -> f32 {
    if (iso - v1).abs() < SNAP_EPSILON {
        return 0.0;
    }
    if (iso - v2).abs() < SNAP_EPSILON {
        return 1.0;
    }
    if (v1 - v2).abs() < SNAP_EPSILON {
        return 0.0;
    }
    (iso - v1) / (v2 - v1)
}

#[inline]
pub fn interpolate(iso: f32, p1: Vec3, p2: Vec3, v1: f32, v2: f32) -> Vec3 {
    p1.lerp(p2, edge_mu(iso, v1, v2))
}

/// Reusable marching-cubes mesher. Holds per-cube scratch so repeated
/// remeshes of same-sized chunks do not reallocate.
#[derive(Default, Debug)]
pub struct Mesher {
    cube_indices: Vec<u8>,
}

impl Mesher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&mut self, size: usize, points: &[LatticePoint], iso: f32) -> MeshBuffer {
        let mut out = MeshBuffer::default();
        self.mesh_into(size, points, iso, &mut out);
        out
    }

    /// Rebuilds `out` from scratch for a `size`^3-cube lattice. A lattice of
    /// the wrong length yields an empty mesh.
    pub fn mesh_into(&mut self, size: usize, points: &[LatticePoint], iso: f32, out: &mut MeshBuffer) {
        out.clear_keep_capacity();
        if size == 0 || points.len() != lattice_len(size) {
            log::warn!(
                "mesher: lattice of {} points does not match chunk size {}",
                points.len(),
                size
            );
            return;
        }

        // First pass: classify every cube and count the vertices we will emit.
        self.cube_indices.clear();
        self.cube_indices.reserve(size * size * size);
        let mut total = 0usize;
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let ci = cube_index(&corner_densities(points, size, x, y, z), iso);
                    total += TRIANGLE_TABLE[ci as usize].len();
                    self.cube_indices.push(ci);
                }
            }
        }
        if total == 0 {
            return;
        }
        out.reserve_vertices(total);

        let mut edge_pos = [Vec3::ZERO; 12];
        let mut edge_col = [Rgba::CLEAR; 12];
        let mut cubes = self.cube_indices.iter();
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let Some(&ci) = cubes.next() else {
                        return;
                    };
                    if ci == 0 || ci == 0xFF {
                        continue;
                    }
                    let mut corners = [LatticePoint::SENTINEL; 8];
                    for (c, &(ox, oy, oz)) in CORNER_OFFSETS.iter().enumerate() {
                        corners[c] = points[lattice_index(x + ox, y + oy, z + oz, size)];
                    }
                    let base = Vec3::new(x as f32, y as f32, z as f32);
                    let mask = EDGE_TABLE[ci as usize];
                    for (e, &(a, b)) in EDGE_CORNERS.iter().enumerate() {
                        if mask & (1 << e) == 0 {
                            continue;
                        }
                        let (pa, pb) = (corners[a], corners[b]);
                        let mu = edge_mu(iso, pa.density, pb.density);
                        let (ax, ay, az) = CORNER_OFFSETS[a];
                        let (bx, by, bz) = CORNER_OFFSETS[b];
                        let p1 = base + Vec3::new(ax as f32, ay as f32, az as f32);
                        let p2 = base + Vec3::new(bx as f32, by as f32, bz as f32);
                        edge_pos[e] = p1.lerp(p2, mu);
                        edge_col[e] = pa.colour.lerp(pb.colour, mu);
                    }
                    for &e in TRIANGLE_TABLE[ci as usize] {
                        out.push_vertex(edge_pos[e as usize], edge_col[e as usize]);
                    }
                }
            }
        }
        log::trace!(
            "mesher: size={} vertices={} triangles={}",
            size,
            out.vertex_count(),
            out.triangle_count()
        );
    }
}

/// Vertices a mesh of this lattice will hold, without building it.
pub fn count_vertices(size: usize, points: &[LatticePoint], iso: f32) -> usize {
    if size == 0 || points.len() != lattice_len(size) {
        return 0;
    }
    let mut total = 0;
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let d = corner_densities(points, size, x, y, z);
                total += TRIANGLE_TABLE[cube_index(&d, iso) as usize].len();
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapping_rules() {
        assert_eq!(edge_mu(0.5, 0.5, 0.9), 0.0);
        assert_eq!(edge_mu(0.5, 0.1, 0.5), 1.0);
        assert_eq!(edge_mu(0.5, 0.3, 0.3), 0.0);
        assert!((edge_mu(0.5, 0.0, 1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn cube_index_marks_empty_corners() {
        let mut d = [1.0f32; 8];
        assert_eq!(cube_index(&d, 0.5), 0);
        d[0] = 0.0;
        d[6] = 0.49;
        assert_eq!(cube_index(&d, 0.5), 0b0100_0001);
        assert_eq!(cube_index(&[0.0; 8], 0.5), 0xFF);
    }

    #[test]
    fn mismatched_lattice_is_empty() {
        let pts = vec![LatticePoint::new([0, 0, 0], 0.0, Rgba::WHITE); 5];
        let mut m = Mesher::new();
        assert!(m.mesh(2, &pts, 0.5).is_empty());
    }
}
