//! Chunk lattices and the grid that keeps their shared seams consistent.
#![forbid(unsafe_code)]

mod chunk;
mod grid;
mod touched;

pub use chunk::Chunk;
pub use grid::{Grid, GridParams, Owners};
pub use touched::TouchedChunks;
