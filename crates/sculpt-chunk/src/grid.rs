use hashbrown::HashMap;

use sculpt_geom::{Rgba, Vec3};
use sculpt_mesh::{MeshBuffer, Mesher};
use sculpt_world::{ChunkCoord, DensitySource, LatticePoint, TerrainConfig};

use crate::chunk::{Chunk, clamp01};
use crate::touched::TouchedChunks;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridParams {
    pub chunk_size: usize,
    pub iso_level: f32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            chunk_size: 8,
            iso_level: 0.5,
        }
    }
}

impl GridParams {
    pub fn from_config(cfg: &TerrainConfig) -> Self {
        Self {
            chunk_size: cfg.lattice.chunk_size as usize,
            iso_level: cfg.lattice.iso_level,
        }
    }
}

/// Every chunk slot that stores one world lattice coordinate, with the
/// coordinate's local position in that chunk. At most 8 (a shared corner).
#[derive(Clone, Copy, Debug)]
pub struct Owners {
    slots: [(ChunkCoord, [i32; 3]); 8],
    len: usize,
}

impl Owners {
    pub fn iter(&self) -> impl Iterator<Item = &(ChunkCoord, [i32; 3])> {
        self.slots[..self.len].iter()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl IntoIterator for Owners {
    type Item = (ChunkCoord, [i32; 3]);
    type IntoIter = std::iter::Take<std::array::IntoIter<(ChunkCoord, [i32; 3]), 8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter().take(self.len)
    }
}

/// Owns the chunk map and resolves world lattice coordinates to chunks.
pub struct Grid {
    params: GridParams,
    chunks: HashMap<ChunkCoord, Chunk>,
    source: Box<dyn DensitySource>,
    mesher: Mesher,
}

impl Grid {
    pub fn new(params: GridParams, source: Box<dyn DensitySource>) -> Self {
        Self {
            params,
            chunks: HashMap::new(),
            source,
            mesher: Mesher::new(),
        }
    }

    #[inline]
    pub fn params(&self) -> GridParams {
        self.params
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.params.chunk_size
    }

    #[inline]
    pub fn iso_level(&self) -> f32 {
        self.params.iso_level
    }

    /// Replaces the density source used for new chunks and resets.
    pub fn set_source(&mut self, source: Box<dyn DensitySource>) {
        self.source = source;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Chunk coordinates in ascending order.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        v.sort_unstable();
        v
    }

    pub fn mesh(&self, coord: ChunkCoord) -> Option<&MeshBuffer> {
        self.chunks.get(&coord).map(Chunk::mesh)
    }

    /// Chunk whose cell holds `world_pos`, by `floor(world_pos / chunk_size)`.
    pub fn find_chunk(&self, world_pos: Vec3) -> Option<&Chunk> {
        let n = self.params.chunk_size as f32;
        let coord = ChunkCoord::new(
            (world_pos.x / n).floor() as i32,
            (world_pos.y / n).floor() as i32,
            (world_pos.z / n).floor() as i32,
        );
        self.chunks.get(&coord)
    }

    /// Chunk slots that store `(wx, wy, wz)`, whether or not the chunks exist.
    pub fn owner_slots(&self, wx: i32, wy: i32, wz: i32) -> Owners {
        let n = self.params.chunk_size as i32;
        let home = ChunkCoord::containing(wx, wy, wz, n);
        let (ox, oy, oz) = home.origin(n);
        let local = [wx - ox, wy - oy, wz - oz];
        let mut out = Owners {
            slots: [(home, local); 8],
            len: 0,
        };
        // A coordinate on a chunk's low face is also the far face of the chunk below it.
        let steps = |l: i32| if l == 0 { 2 } else { 1 };
        for dz in 0..steps(local[2]) {
            for dy in 0..steps(local[1]) {
                for dx in 0..steps(local[0]) {
                    let c = home.offset(-dx, -dy, -dz);
                    let l = [local[0] + dx * n, local[1] + dy * n, local[2] + dz * n];
                    out.slots[out.len] = (c, l);
                    out.len += 1;
                }
            }
        }
        out
    }

    /// Existing chunks that store `(wx, wy, wz)`.
    pub fn owners_of(&self, wx: i32, wy: i32, wz: i32) -> Vec<ChunkCoord> {
        self.owner_slots(wx, wy, wz)
            .iter()
            .map(|(c, _)| *c)
            .filter(|c| self.chunks.contains_key(c))
            .collect()
    }

    pub fn try_point(&self, wx: i32, wy: i32, wz: i32) -> Option<LatticePoint> {
        self.owner_slots(wx, wy, wz).iter().find_map(|(c, [x, y, z])| {
            self.chunks.get(c).map(|chunk| *chunk.get_local(*x, *y, *z))
        })
    }

    /// Point at a world lattice coordinate, or [`LatticePoint::SENTINEL`] when no chunk stores it.
    pub fn get_point(&self, wx: i32, wy: i32, wz: i32) -> LatticePoint {
        self.try_point(wx, wy, wz).unwrap_or(LatticePoint::SENTINEL)
    }

    /// Writes `value` (clamped to `[0,1]`) into every chunk storing the
    /// coordinate. Returns false when no chunk stores it.
    pub fn set_density(
        &mut self,
        wx: i32,
        wy: i32,
        wz: i32,
        value: f32,
        touched: &mut TouchedChunks,
    ) -> bool {
        let value = clamp01(value);
        self.write_all(wx, wy, wz, touched, |chunk, [x, y, z]| {
            chunk.set_density_local(x, y, z, value)
        })
    }

    pub fn set_colour(
        &mut self,
        wx: i32,
        wy: i32,
        wz: i32,
        colour: Rgba,
        touched: &mut TouchedChunks,
    ) -> bool {
        self.write_all(wx, wy, wz, touched, |chunk, [x, y, z]| {
            chunk.set_colour_local(x, y, z, colour)
        })
    }

    fn write_all(
        &mut self,
        wx: i32,
        wy: i32,
        wz: i32,
        touched: &mut TouchedChunks,
        mut write: impl FnMut(&mut Chunk, [i32; 3]),
    ) -> bool {
        let owners = self.owner_slots(wx, wy, wz);
        let mut any = false;
        for &(coord, local) in owners.iter() {
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                write(chunk, local);
                touched.insert(coord);
                any = true;
            }
        }
        any
    }

    /// Seeds a chunk, copies shared boundary samples from existing
    /// neighbours, and meshes it. Returns false if the slot was occupied.
    pub fn create_chunk(&mut self, coord: ChunkCoord) -> bool {
        self.insert_seeded(coord) && self.remesh(coord)
    }

    /// Creates the chunk whose cell holds the world coordinate if no chunk
    /// stores it yet. The new chunk is left unmeshed and recorded in
    /// `touched`, so the edit's closing `remesh_touched` builds its mesh.
    pub fn ensure_chunk_at(
        &mut self,
        wx: i32,
        wy: i32,
        wz: i32,
        touched: &mut TouchedChunks,
    ) -> bool {
        if self.try_point(wx, wy, wz).is_some() {
            return false;
        }
        let coord = ChunkCoord::containing(wx, wy, wz, self.params.chunk_size as i32);
        if !self.insert_seeded(coord) {
            return false;
        }
        touched.insert(coord);
        true
    }

    fn insert_seeded(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }
        let mut chunk = Chunk::seeded(coord, self.params.chunk_size, self.source.as_ref());
        let adopted = self.adopt_boundary(&mut chunk);
        log::info!("chunk {} created ({} boundary samples adopted)", coord, adopted);
        self.chunks.insert(coord, chunk);
        true
    }

    fn adopt_boundary(&self, chunk: &mut Chunk) -> usize {
        let n = chunk.size() as i32;
        let (ox, oy, oz) = chunk.coord.origin(n);
        let on_face = |v: i32| v == 0 || v == n;
        let mut adopted = 0;
        for z in 0..=n {
            for y in 0..=n {
                for x in 0..=n {
                    if !(on_face(x) || on_face(y) || on_face(z)) {
                        continue;
                    }
                    let shared = self
                        .owner_slots(ox + x, oy + y, oz + z)
                        .iter()
                        .filter(|(c, _)| *c != chunk.coord)
                        .find_map(|(c, [lx, ly, lz])| {
                            self.chunks.get(c).map(|nb| *nb.get_local(*lx, *ly, *lz))
                        });
                    if let Some(p) = shared {
                        chunk.set_density_local(x, y, z, p.density);
                        chunk.set_colour_local(x, y, z, p.colour);
                        adopted += 1;
                    }
                }
            }
        }
        adopted
    }

    pub fn destroy_chunk(&mut self, coord: ChunkCoord) -> bool {
        let removed = self.chunks.remove(&coord).is_some();
        if removed {
            log::info!("chunk {} destroyed", coord);
        }
        removed
    }

    pub fn destroy_all(&mut self) {
        log::info!("destroying all {} chunks", self.chunks.len());
        self.chunks.clear();
    }

    /// Creates every missing chunk in the inclusive box. Returns how many were created.
    pub fn add_chunk_range(&mut self, a: ChunkCoord, b: ChunkCoord) -> usize {
        ChunkCoord::range_inclusive(a, b)
            .filter(|&c| self.create_chunk(c))
            .count()
    }

    pub fn remove_chunk_range(&mut self, a: ChunkCoord, b: ChunkCoord) -> usize {
        ChunkCoord::range_inclusive(a, b)
            .filter(|&c| self.destroy_chunk(c))
            .count()
    }

    pub fn remesh(&mut self, coord: ChunkCoord) -> bool {
        let iso = self.params.iso_level;
        match self.chunks.get_mut(&coord) {
            Some(chunk) => {
                let tris = chunk.regenerate_mesh(&mut self.mesher, iso).triangle_count();
                log::debug!("remeshed chunk {} ({} triangles)", coord, tris);
                true
            }
            None => false,
        }
    }

    /// Remeshes each touched chunk once, in coordinate order.
    pub fn remesh_touched(&mut self, touched: &TouchedChunks) -> usize {
        touched
            .sorted()
            .into_iter()
            .filter(|&c| self.remesh(c))
            .count()
    }

    pub fn remesh_all(&mut self) {
        for coord in self.coords() {
            self.remesh(coord);
        }
    }

    /// Reseeds every chunk from the density source, then remeshes.
    pub fn reset_all(&mut self) {
        log::info!("resetting {} chunks", self.chunks.len());
        for chunk in self.chunks.values_mut() {
            chunk.reset_from(self.source.as_ref());
        }
        self.remesh_all();
    }

    /// Changes the lattice resolution; every chunk is rebuilt at the new size.
    pub fn resize(&mut self, chunk_size: usize) {
        if chunk_size == 0 {
            log::warn!("ignoring resize to chunk size 0");
            return;
        }
        log::info!(
            "resizing chunks from {} to {}",
            self.params.chunk_size,
            chunk_size
        );
        self.params.chunk_size = chunk_size;
        for (coord, chunk) in self.chunks.iter_mut() {
            *chunk = Chunk::seeded(*coord, chunk_size, self.source.as_ref());
        }
        self.remesh_all();
    }

    /// Lowest and highest world-Y lattice coordinates any chunk stores.
    pub fn vertical_extent(&self) -> Option<(i32, i32)> {
        let n = self.params.chunk_size as i32;
        let lo = self.chunks.keys().map(|c| c.cy).min()?;
        let hi = self.chunks.keys().map(|c| c.cy).max()?;
        Some((lo * n, (hi + 1) * n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground(height: f32) -> Box<dyn DensitySource> {
        Box::new(move |_x: f32, y: f32, _z: f32| clamp01(0.5 + height - y))
    }

    fn grid_with(size: usize) -> Grid {
        Grid::new(
            GridParams {
                chunk_size: size,
                iso_level: 0.5,
            },
            ground(4.0),
        )
    }

    #[test]
    fn corner_point_has_eight_slots() {
        let g = grid_with(8);
        let owners = g.owner_slots(8, 16, -8);
        assert_eq!(owners.len(), 8);
        for (c, [x, y, z]) in owners.iter() {
            let (ox, oy, oz) = c.origin(8);
            assert_eq!((ox + x, oy + y, oz + z), (8, 16, -8));
            assert!([x, y, z].iter().all(|v| (0..=8).contains(*v)));
        }
        assert_eq!(g.owner_slots(3, 5, 7).len(), 1);
        assert_eq!(g.owner_slots(0, 5, 7).len(), 2);
        assert_eq!(g.owner_slots(0, 0, 7).len(), 4);
    }

    #[test]
    fn owners_iterate_by_value() {
        let g = grid_with(8);
        let coords: Vec<ChunkCoord> = g.owner_slots(0, 3, 3).into_iter().map(|(c, _)| c).collect();
        assert_eq!(coords, vec![ChunkCoord::new(0, 0, 0), ChunkCoord::new(-1, 0, 0)]);
    }

    #[test]
    fn writes_fan_out_across_a_shared_face() {
        let mut g = grid_with(8);
        g.add_chunk_range(ChunkCoord::new(0, 0, 0), ChunkCoord::new(1, 0, 0));
        let mut touched = TouchedChunks::new();
        assert!(g.set_density(8, 3, 3, 0.25, &mut touched));
        assert_eq!(touched.sorted(), vec![ChunkCoord::new(0, 0, 0), ChunkCoord::new(1, 0, 0)]);
        let a = g.chunk(ChunkCoord::new(0, 0, 0)).unwrap().get_local(8, 3, 3).density;
        let b = g.chunk(ChunkCoord::new(1, 0, 0)).unwrap().get_local(0, 3, 3).density;
        assert_eq!(a, 0.25);
        assert_eq!(b, 0.25);
    }

    #[test]
    fn missing_points_are_sentinels() {
        let g = grid_with(8);
        assert!(g.get_point(1, 2, 3).is_sentinel());
        assert!(g.try_point(1, 2, 3).is_none());
        let mut g = g;
        let mut touched = TouchedChunks::new();
        assert!(!g.set_density(1, 2, 3, 1.0, &mut touched));
        assert!(touched.is_empty());
    }

    #[test]
    fn new_chunk_adopts_neighbour_boundary() {
        let mut g = grid_with(4);
        g.create_chunk(ChunkCoord::new(0, 0, 0));
        let mut touched = TouchedChunks::new();
        g.set_density(4, 1, 1, 0.9, &mut touched);
        g.set_colour(4, 1, 1, Rgba::GREEN, &mut touched);
        g.create_chunk(ChunkCoord::new(1, 0, 0));
        let p = g.chunk(ChunkCoord::new(1, 0, 0)).unwrap().get_local(0, 1, 1);
        assert_eq!(p.density, 0.9);
        assert_eq!(p.colour, Rgba::GREEN);
    }

    #[test]
    fn find_chunk_floors_world_position() {
        let mut g = grid_with(8);
        g.create_chunk(ChunkCoord::new(-1, 0, 0));
        let found = g.find_chunk(Vec3::new(-0.5, 3.0, 7.9)).map(|c| c.coord);
        assert_eq!(found, Some(ChunkCoord::new(-1, 0, 0)));
        assert!(g.find_chunk(Vec3::new(0.5, 3.0, 1.0)).is_none());
    }

    #[test]
    fn lifecycle_ranges_and_extent() {
        let mut g = grid_with(8);
        let a = ChunkCoord::new(0, -1, 0);
        let b = ChunkCoord::new(1, 1, 1);
        assert_eq!(g.add_chunk_range(a, b), 12);
        assert_eq!(g.add_chunk_range(a, b), 0);
        assert_eq!(g.vertical_extent(), Some((-8, 16)));
        assert_eq!(g.remove_chunk_range(ChunkCoord::new(0, 1, 0), ChunkCoord::new(1, 1, 1)), 4);
        assert_eq!(g.len(), 8);
        assert_eq!(g.vertical_extent(), Some((-8, 8)));
        g.destroy_all();
        assert!(g.is_empty());
        assert_eq!(g.vertical_extent(), None);
    }

    #[test]
    fn reset_and_resize_reseed() {
        let mut g = grid_with(4);
        g.create_chunk(ChunkCoord::new(0, 0, 0));
        let mut touched = TouchedChunks::new();
        g.set_density(1, 1, 1, 0.0, &mut touched);
        g.reset_all();
        assert_eq!(g.get_point(1, 1, 1).density, 1.0);

        g.resize(6);
        let c = g.chunk(ChunkCoord::new(0, 0, 0)).unwrap();
        assert_eq!(c.size(), 6);
        assert_eq!(c.points().len(), 7 * 7 * 7);
        // Surface at y=4 crosses one cube layer.
        assert_eq!(c.mesh().triangle_count(), 6 * 6 * 2);
    }

    #[test]
    fn ensured_chunks_wait_for_the_edit_remesh() {
        let mut g = grid_with(8);
        let mut touched = TouchedChunks::new();
        assert!(g.ensure_chunk_at(3, 3, 3, &mut touched));
        assert!(!g.ensure_chunk_at(8, 3, 3, &mut touched));
        let c = ChunkCoord::new(0, 0, 0);
        assert_eq!(touched.sorted(), vec![c]);
        assert!(g.mesh(c).is_some_and(|m| m.is_empty()));
        assert_eq!(g.remesh_touched(&touched), 1);
        assert_eq!(g.mesh(c).map(|m| m.triangle_count()), Some(8 * 8 * 2));
    }

    #[test]
    fn chunk_boxes_cover_the_shared_faces() {
        let mut g = grid_with(8);
        g.create_chunk(ChunkCoord::new(-1, 0, 0));
        let bx = g.chunk(ChunkCoord::new(-1, 0, 0)).unwrap().aabb();
        assert!(bx.contains(Vec3::new(-8.0, 0.0, 8.0)));
        assert!(bx.contains(Vec3::new(0.0, 8.0, 0.0)));
        assert!(!bx.contains(Vec3::new(0.5, 4.0, 4.0)));
    }
}
