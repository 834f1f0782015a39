use sculpt_geom::{Rgba, Vec3};
use sculpt_world::TerrainConfig;

use crate::falloff::FalloffCurve;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifyMode {
    Raise,
    Lower,
}

impl ModifyMode {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            ModifyMode::Raise => 1.0,
            ModifyMode::Lower => -1.0,
        }
    }
}

/// Shape and strength shared by every edit operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Brush {
    pub range: f32,
    pub force: f32,
    pub target_height: i32,
    pub falloff: FalloffCurve,
    /// Create the chunk for any written coordinate no chunk stores yet.
    pub create_missing_chunks: bool,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            range: 2.0,
            force: 2.0,
            target_height: 10,
            falloff: FalloffCurve::default(),
            create_missing_chunks: false,
        }
    }
}

impl Brush {
    pub fn from_config(cfg: &TerrainConfig) -> Self {
        let b = &cfg.brush;
        Self {
            range: b.range,
            force: b.force,
            target_height: b.target_height,
            falloff: FalloffCurve::from_keys(&b.falloff),
            create_missing_chunks: b.create_missing_chunks,
        }
    }

    /// Takes the flatten height from a picked surface point.
    pub fn pick_target_height(&mut self, point: Vec3) -> i32 {
        self.target_height = point.y.round() as i32;
        log::debug!("target height set to {}", self.target_height);
        self.target_height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineOptions {
    pub start: Vec3,
    pub end: Vec3,
    /// Fill the capsule instead of carving it.
    pub add_terrain: bool,
    /// Leave samples below the segment untouched.
    pub flat_floor: bool,
    /// Also empty the column above the segment up to the top of the grid.
    pub clear_above: bool,
}

impl LineOptions {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            add_terrain: false,
            flat_floor: false,
            clear_above: false,
        }
    }

    pub fn from_config(cfg: &TerrainConfig, start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            add_terrain: cfg.line.add_terrain,
            flat_floor: cfg.line.flat_floor,
            clear_above: cfg.line.clear_above,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintOptions {
    pub colour: Rgba,
    pub use_colour_mask: bool,
    pub colour_mask: Rgba,
    pub colour_mask_tolerance: f32,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            colour: Rgba::GREEN,
            use_colour_mask: false,
            colour_mask: Rgba::WHITE,
            colour_mask_tolerance: 0.01,
        }
    }
}

impl PaintOptions {
    pub fn from_config(cfg: &TerrainConfig) -> Self {
        Self {
            colour: cfg.paint.colour(),
            use_colour_mask: cfg.paint.use_colour_mask,
            colour_mask: cfg.paint.colour_mask(),
            colour_mask_tolerance: cfg.paint.colour_mask_tolerance,
        }
    }

    /// Whether a sample with colour `current` may be repainted.
    #[inline]
    pub fn accepts(&self, current: Rgba) -> bool {
        !self.use_colour_mask || current.matches(self.colour_mask, self.colour_mask_tolerance)
    }
}
