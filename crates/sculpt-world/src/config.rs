use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use sculpt_geom::Rgba;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("lattice.chunk_size must be positive")]
    ZeroChunkSize,
    #[error("lattice.iso_level must lie strictly between 0 and 1, got {0}")]
    IsoLevel(f32),
    #[error("brush.range must be positive, got {0}")]
    Range(f32),
    #[error("brush.force must not be negative, got {0}")]
    Force(f32),
    #[error("generation.noise_stretch must be positive, got {0}")]
    NoiseStretch(f32),
    #[error("paint.colour_mask_tolerance must not be negative, got {0}")]
    Tolerance(f32),
    #[error("{0} must be finite")]
    NonFinite(&'static str),
    #[error("brush.falloff keys must be finite and sorted by position")]
    Falloff,
}

/// Terrain tool settings, one TOML table per concern. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TerrainConfig {
    #[serde(default)]
    pub lattice: Lattice,
    #[serde(default)]
    pub generation: Generation,
    #[serde(default)]
    pub brush: BrushSettings,
    #[serde(default)]
    pub line: LineSettings,
    #[serde(default)]
    pub paint: PaintSettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Lattice {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    #[serde(default = "default_iso_level")]
    pub iso_level: f32,
}
fn default_chunk_size() -> u32 {
    8
}
fn default_iso_level() -> f32 {
    0.5
}
impl Default for Lattice {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            iso_level: default_iso_level(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Generation {
    #[serde(default = "default_generate_noise")]
    pub generate_noise: bool,
    #[serde(default = "default_ground_height")]
    pub ground_height: f32,
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f32,
    #[serde(default = "default_noise_stretch")]
    pub noise_stretch: f32,
    #[serde(default)]
    pub seed: i32,
    /// Draw a fresh seed every time the terrain is reset.
    #[serde(default)]
    pub randomize_seed: bool,
}
fn default_generate_noise() -> bool {
    true
}
fn default_ground_height() -> f32 {
    10.0
}
fn default_noise_scale() -> f32 {
    1.0
}
fn default_noise_stretch() -> f32 {
    1.0
}
impl Default for Generation {
    fn default() -> Self {
        Self {
            generate_noise: default_generate_noise(),
            ground_height: default_ground_height(),
            noise_scale: default_noise_scale(),
            noise_stretch: default_noise_stretch(),
            seed: 0,
            randomize_seed: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct BrushSettings {
    #[serde(default = "default_range")]
    pub range: f32,
    #[serde(default = "default_force")]
    pub force: f32,
    #[serde(default = "default_target_height")]
    pub target_height: i32,
    /// `[t, value]` pairs; empty means a constant 1.
    #[serde(default)]
    pub falloff: Vec<[f32; 2]>,
    #[serde(default)]
    pub create_missing_chunks: bool,
}
fn default_range() -> f32 {
    2.0
}
fn default_force() -> f32 {
    2.0
}
fn default_target_height() -> i32 {
    10
}
impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            range: default_range(),
            force: default_force(),
            target_height: default_target_height(),
            falloff: Vec::new(),
            create_missing_chunks: false,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LineSettings {
    #[serde(default)]
    pub add_terrain: bool,
    #[serde(default)]
    pub flat_floor: bool,
    #[serde(default)]
    pub clear_above: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PaintSettings {
    #[serde(default = "default_colour")]
    pub colour: [f32; 4],
    #[serde(default)]
    pub use_colour_mask: bool,
    #[serde(default = "default_colour_mask")]
    pub colour_mask: [f32; 4],
    #[serde(default = "default_colour_mask_tolerance")]
    pub colour_mask_tolerance: f32,
}
fn default_colour() -> [f32; 4] {
    Rgba::GREEN.to_array()
}
fn default_colour_mask() -> [f32; 4] {
    Rgba::WHITE.to_array()
}
fn default_colour_mask_tolerance() -> f32 {
    0.01
}
impl Default for PaintSettings {
    fn default() -> Self {
        Self {
            colour: default_colour(),
            use_colour_mask: false,
            colour_mask: default_colour_mask(),
            colour_mask_tolerance: default_colour_mask_tolerance(),
        }
    }
}

impl PaintSettings {
    pub fn colour(&self) -> Rgba {
        let [r, g, b, a] = self.colour;
        Rgba::new(r, g, b, a)
    }

    pub fn colour_mask(&self) -> Rgba {
        let [r, g, b, a] = self.colour_mask;
        Rgba::new(r, g, b, a)
    }
}

fn finite(name: &'static str, v: f32) -> Result<f32, ConfigError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ConfigError::NonFinite(name))
    }
}

impl TerrainConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: TerrainConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects settings the grid and brushes assume never occur.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lattice.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        let iso = finite("lattice.iso_level", self.lattice.iso_level)?;
        if iso <= 0.0 || iso >= 1.0 {
            return Err(ConfigError::IsoLevel(iso));
        }

        let g = &self.generation;
        finite("generation.ground_height", g.ground_height)?;
        finite("generation.noise_scale", g.noise_scale)?;
        let stretch = finite("generation.noise_stretch", g.noise_stretch)?;
        if stretch <= 0.0 {
            return Err(ConfigError::NoiseStretch(stretch));
        }

        let range = finite("brush.range", self.brush.range)?;
        if range <= 0.0 {
            return Err(ConfigError::Range(range));
        }
        let force = finite("brush.force", self.brush.force)?;
        if force < 0.0 {
            return Err(ConfigError::Force(force));
        }
        let keys_ok = self
            .brush
            .falloff
            .iter()
            .all(|[t, v]| t.is_finite() && v.is_finite())
            && self.brush.falloff.windows(2).all(|w| w[0][0] <= w[1][0]);
        if !keys_ok {
            return Err(ConfigError::Falloff);
        }

        let p = &self.paint;
        if !p.colour.iter().chain(p.colour_mask.iter()).all(|c| c.is_finite()) {
            return Err(ConfigError::NonFinite("paint colour"));
        }
        let tol = finite("paint.colour_mask_tolerance", p.colour_mask_tolerance)?;
        if tol < 0.0 {
            return Err(ConfigError::Tolerance(tol));
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<TerrainConfig, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg = TerrainConfig::from_toml_str(&s)?;
    log::info!(
        "loaded terrain config from {} (chunk_size={}, iso={})",
        path.display(),
        cfg.lattice.chunk_size,
        cfg.lattice.iso_level
    );
    Ok(cfg)
}
