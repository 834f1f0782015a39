//! Brush-driven terrain edits over a chunk grid.
#![forbid(unsafe_code)]

mod brush;
mod falloff;
mod ops;

pub use brush::{Brush, LineOptions, ModifyMode, PaintOptions};
pub use falloff::FalloffCurve;
pub use ops::{line_terrain, modify_terrain, paint_terrain, set_terrain, smooth_terrain};
pub use sculpt_chunk::TouchedChunks;
