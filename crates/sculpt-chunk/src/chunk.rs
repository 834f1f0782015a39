use sculpt_geom::{Aabb, Rgba, Vec3};
use sculpt_mesh::{MeshBuffer, Mesher};
use sculpt_world::{ChunkCoord, DensitySource, LatticePoint, lattice_index, lattice_len};

/// One chunk's `(size+1)^3` lattice plus the mesh last built from it.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    size: usize,
    points: Vec<LatticePoint>,
    mesh: MeshBuffer,
}

impl Chunk {
    /// Empty (density 0) white lattice.
    pub fn new(coord: ChunkCoord, size: usize) -> Self {
        let mut points = Vec::with_capacity(lattice_len(size));
        for z in 0..=size {
            for y in 0..=size {
                for x in 0..=size {
                    points.push(LatticePoint::new(
                        [x as i32, y as i32, z as i32],
                        0.0,
                        Rgba::WHITE,
                    ));
                }
            }
        }
        Self {
            coord,
            size,
            points,
            mesh: MeshBuffer::default(),
        }
    }

    pub fn seeded<S: DensitySource + ?Sized>(coord: ChunkCoord, size: usize, source: &S) -> Self {
        let mut c = Self::new(coord, size);
        c.reset_from(source);
        c
    }

    /// Reseeds every density from `source` and resets colours to white.
    pub fn reset_from<S: DensitySource + ?Sized>(&mut self, source: &S) {
        let (ox, oy, oz) = self.coord.origin(self.size as i32);
        for p in &mut self.points {
            let [x, y, z] = p.local;
            let d = source.density((ox + x) as f32, (oy + y) as f32, (oz + z) as f32);
            p.density = clamp01(d);
            p.colour = Rgba::WHITE;
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn points(&self) -> &[LatticePoint] {
        &self.points
    }

    #[inline]
    pub fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }

    #[inline]
    fn clamp_local(&self, v: i32) -> usize {
        v.clamp(0, self.size as i32) as usize
    }

    #[inline]
    fn idx_clamped(&self, x: i32, y: i32, z: i32) -> usize {
        lattice_index(
            self.clamp_local(x),
            self.clamp_local(y),
            self.clamp_local(z),
            self.size,
        )
    }

    /// Local coordinates are clamped into `[0, size]`.
    #[inline]
    pub fn get_local(&self, x: i32, y: i32, z: i32) -> &LatticePoint {
        &self.points[self.idx_clamped(x, y, z)]
    }

    #[inline]
    pub fn set_density_local(&mut self, x: i32, y: i32, z: i32, density: f32) {
        let i = self.idx_clamped(x, y, z);
        self.points[i].density = density;
    }

    #[inline]
    pub fn set_colour_local(&mut self, x: i32, y: i32, z: i32, colour: Rgba) {
        let i = self.idx_clamped(x, y, z);
        self.points[i].colour = colour;
    }

    /// True when the chunk stores the world lattice coordinate, boundary included.
    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let n = self.size as i32;
        let (ox, oy, oz) = self.coord.origin(n);
        (ox..=ox + n).contains(&wx) && (oy..=oy + n).contains(&wy) && (oz..=oz + n).contains(&wz)
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<&LatticePoint> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let (ox, oy, oz) = self.coord.origin(self.size as i32);
        Some(self.get_local(wx - ox, wy - oy, wz - oz))
    }

    pub fn world_origin(&self) -> Vec3 {
        Vec3::from(self.coord.origin(self.size as i32))
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_origin_size(self.world_origin(), self.size as f32)
    }

    /// Rebuilds the cached mesh from the current lattice.
    pub fn regenerate_mesh(&mut self, mesher: &mut Mesher, iso: f32) -> &MeshBuffer {
        mesher.mesh_into(self.size, &self.points, iso, &mut self.mesh);
        &self.mesh
    }
}

/// NaN counts as empty.
#[inline]
pub(crate) fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_access_clamps() {
        let mut c = Chunk::new(ChunkCoord::new(0, 0, 0), 4);
        c.set_density_local(9, -3, 2, 0.75);
        assert_eq!(c.get_local(4, 0, 2).density, 0.75);
        assert_eq!(c.get_local(4, 0, 2).local, [4, 0, 2]);
    }

    #[test]
    fn world_bounds_include_far_face() {
        let c = Chunk::new(ChunkCoord::new(-1, 2, 0), 8);
        assert!(c.contains_world(-8, 16, 0));
        assert!(c.contains_world(0, 24, 8));
        assert!(!c.contains_world(1, 16, 0));
        assert!(c.get_world(-9, 16, 0).is_none());
        assert_eq!(c.get_world(-4, 20, 3).map(|p| p.local), Some([4, 4, 3]));
    }

    #[test]
    fn seeding_reads_world_coordinates() {
        let src = |_x: f32, y: f32, _z: f32| if y < 10.0 { 1.0 } else { 0.0 };
        let c = Chunk::seeded(ChunkCoord::new(0, 1, 0), 8, &src);
        assert_eq!(c.get_local(0, 1, 0).density, 1.0);
        assert_eq!(c.get_local(0, 2, 0).density, 0.0);
    }

    #[test]
    fn regenerate_replaces_mesh() {
        let src = |_x: f32, y: f32, _z: f32| clamp01(2.5 - y);
        let mut c = Chunk::seeded(ChunkCoord::new(0, 0, 0), 4, &src);
        let mut m = Mesher::new();
        let n = c.regenerate_mesh(&mut m, 0.5).triangle_count();
        assert_eq!(n, 4 * 4 * 2);
        let again = c.regenerate_mesh(&mut m, 0.5).triangle_count();
        assert_eq!(again, n);
    }
}
