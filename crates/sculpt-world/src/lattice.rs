use sculpt_geom::Rgba;

/// One density/colour sample at an integer lattice coordinate inside a chunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticePoint {
    pub local: [i32; 3],
    pub density: f32,
    pub colour: Rgba,
}

impl LatticePoint {
    /// Returned for coordinates no chunk stores.
    pub const SENTINEL: LatticePoint = LatticePoint {
        local: [i32::MAX; 3],
        density: 0.0,
        colour: Rgba::CLEAR,
    };

    #[inline]
    pub const fn new(local: [i32; 3], density: f32, colour: Rgba) -> Self {
        Self {
            local,
            density,
            colour,
        }
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.local == [i32::MAX; 3]
    }
}

/// Samples per axis are `size + 1`; x varies fastest.
#[inline]
pub fn lattice_index(x: usize, y: usize, z: usize, size: usize) -> usize {
    let side = size + 1;
    x + side * (y + z * side)
}

#[inline]
pub fn lattice_len(size: usize) -> usize {
    let side = size + 1;
    side * side * side
}
