use hashbrown::HashSet;
use sculpt_world::ChunkCoord;

/// Distinct chunks written by one edit. Each is remeshed once after the edit's writes finish.
#[derive(Clone, Debug, Default)]
pub struct TouchedChunks {
    set: HashSet<ChunkCoord>,
}

impl TouchedChunks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `coord` was not yet recorded.
    #[inline]
    pub fn insert(&mut self, coord: ChunkCoord) -> bool {
        self.set.insert(coord)
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.set.contains(&coord)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn clear(&mut self) {
        self.set.clear();
    }

    /// Coordinates in ascending order, so callers get a stable remesh order.
    pub fn sorted(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.set.iter().copied().collect();
        v.sort_unstable();
        v
    }
}

impl Extend<ChunkCoord> for TouchedChunks {
    fn extend<T: IntoIterator<Item = ChunkCoord>>(&mut self, iter: T) {
        self.set.extend(iter);
    }
}

impl FromIterator<ChunkCoord> for TouchedChunks {
    fn from_iter<T: IntoIterator<Item = ChunkCoord>>(iter: T) -> Self {
        Self {
            set: iter.into_iter().collect(),
        }
    }
}
