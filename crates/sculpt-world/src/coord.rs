use serde::{Deserialize, Serialize};

/// Integer index of a chunk in the grid. Chunk `c` covers world lattice
/// coordinates `c * size ..= c * size + size` on each axis.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Chunk whose half-open cell `[c*size, (c+1)*size)` holds the world coordinate.
    #[inline]
    pub fn containing(wx: i32, wy: i32, wz: i32, size: i32) -> Self {
        Self {
            cx: wx.div_euclid(size),
            cy: wy.div_euclid(size),
            cz: wz.div_euclid(size),
        }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// World lattice coordinate of local `(0,0,0)`.
    #[inline]
    pub fn origin(self, size: i32) -> (i32, i32, i32) {
        (self.cx * size, self.cy * size, self.cz * size)
    }

    /// Every coordinate in the inclusive box spanned by `a` and `b`, in any corner order.
    pub fn range_inclusive(a: ChunkCoord, b: ChunkCoord) -> impl Iterator<Item = ChunkCoord> {
        let (x0, x1) = (a.cx.min(b.cx), a.cx.max(b.cx));
        let (y0, y1) = (a.cy.min(b.cy), a.cy.max(b.cy));
        let (z0, z1) = (a.cz.min(b.cz), a.cz.max(b.cz));
        (z0..=z1).flat_map(move |z| {
            (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| ChunkCoord::new(x, y, z)))
        })
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.cx, self.cy, self.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_floors_negative_coordinates() {
        assert_eq!(ChunkCoord::containing(-1, 0, 7, 8), ChunkCoord::new(-1, 0, 0));
        assert_eq!(ChunkCoord::containing(8, -8, -9, 8), ChunkCoord::new(1, -1, -2));
    }

    #[test]
    fn range_covers_box_once() {
        let a = ChunkCoord::new(1, 0, -1);
        let b = ChunkCoord::new(-1, 1, 0);
        let all: Vec<_> = ChunkCoord::range_inclusive(a, b).collect();
        assert_eq!(all.len(), 3 * 2 * 2);
        let mut dedup = all.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), all.len());
    }
}
