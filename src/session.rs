//! Stroke scripts: a TOML list of edits replayed against a grid, standing in
//! for the interactive tool that would normally drive the editor.
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use sculpt_chunk::{Grid, GridParams, TouchedChunks};
use sculpt_edit::{
    Brush, LineOptions, ModifyMode, PaintOptions, line_terrain, modify_terrain, paint_terrain,
    set_terrain, smooth_terrain,
};
use sculpt_geom::{Rgba, Vec3};
use sculpt_world::{ChunkCoord, NoiseTerrain, TerrainConfig};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read stroke script: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse stroke script: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("stroke {0}: line strokes need an `end` point")]
    MissingEnd(usize),
    #[error("stroke {0}: coordinates must be finite")]
    NonFinite(usize),
    #[error("stroke {0}: missing the `at` point")]
    MissingAt(usize),
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrokeOp {
    Raise,
    Lower,
    Set,
    Line,
    Smooth,
    Paint,
    /// Takes the flatten height from `at`.
    Pick,
    /// Reseeds every chunk, drawing a new seed when `randomize_seed` is set.
    Reset,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Stroke {
    pub op: StrokeOp,
    #[serde(default)]
    pub at: Option<[f32; 3]>,
    #[serde(default)]
    pub end: Option<[f32; 3]>,
    #[serde(default)]
    pub normal: Option<[f32; 3]>,
    #[serde(default)]
    pub range: Option<f32>,
    #[serde(default)]
    pub force: Option<f32>,
    #[serde(default)]
    pub colour: Option<[f32; 4]>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct StrokeScript {
    #[serde(default, rename = "stroke")]
    pub strokes: Vec<Stroke>,
}

impl StrokeScript {
    pub fn from_toml_str(s: &str) -> Result<Self, ScriptError> {
        let script: StrokeScript = toml::from_str(s)?;
        for (i, stroke) in script.strokes.iter().enumerate() {
            if stroke.op != StrokeOp::Reset && stroke.at.is_none() {
                return Err(ScriptError::MissingAt(i));
            }
            let coords = stroke
                .at
                .iter()
                .flatten()
                .chain(stroke.end.iter().flatten())
                .chain(stroke.normal.iter().flatten());
            if !coords.copied().all(f32::is_finite) {
                return Err(ScriptError::NonFinite(i));
            }
            if stroke.op == StrokeOp::Line && stroke.end.is_none() {
                return Err(ScriptError::MissingEnd(i));
            }
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let s = fs::read_to_string(path)?;
        let script = Self::from_toml_str(&s)?;
        log::info!("loaded {} strokes from {}", script.strokes.len(), path.display());
        Ok(script)
    }
}

/// A grid plus the brush settings every stroke starts from.
pub struct Session {
    pub grid: Grid,
    pub brush: Brush,
    pub paint: PaintOptions,
    cfg: TerrainConfig,
}

impl Session {
    pub fn new(cfg: TerrainConfig, from: ChunkCoord, to: ChunkCoord) -> Self {
        let terrain = NoiseTerrain::from_config(&cfg.generation);
        let mut grid = Grid::new(GridParams::from_config(&cfg), Box::new(terrain));
        let created = grid.add_chunk_range(from, to);
        log::info!("created {} chunks between {} and {}", created, from, to);
        Self {
            grid,
            brush: Brush::from_config(&cfg),
            paint: PaintOptions::from_config(&cfg),
            cfg,
        }
    }

    pub fn apply(&mut self, stroke: &Stroke) -> TouchedChunks {
        let mut brush = self.brush.clone();
        if let Some(r) = stroke.range.filter(|r| *r > 0.0) {
            brush.range = r;
        }
        if let Some(f) = stroke.force.filter(|f| *f >= 0.0) {
            brush.force = f;
        }
        let at = Vec3::from(stroke.at.unwrap_or([0.0; 3]));
        match stroke.op {
            StrokeOp::Raise => modify_terrain(&mut self.grid, &brush, at, ModifyMode::Raise),
            StrokeOp::Lower => modify_terrain(&mut self.grid, &brush, at, ModifyMode::Lower),
            StrokeOp::Set => set_terrain(&mut self.grid, &brush, at),
            StrokeOp::Line => {
                let end = stroke.end.map(Vec3::from).unwrap_or(at);
                let line = LineOptions::from_config(&self.cfg, at, end);
                line_terrain(&mut self.grid, &brush, &line)
            }
            StrokeOp::Smooth => {
                let normal = stroke.normal.map(Vec3::from).unwrap_or(Vec3::UP);
                smooth_terrain(&mut self.grid, &brush, at, normal)
            }
            StrokeOp::Paint => {
                let mut paint = self.paint;
                if let Some([r, g, b, a]) = stroke.colour {
                    paint.colour = Rgba::new(r, g, b, a);
                }
                paint_terrain(&mut self.grid, &brush, &paint, at)
            }
            StrokeOp::Pick => {
                self.brush.pick_target_height(at);
                TouchedChunks::new()
            }
            StrokeOp::Reset => {
                self.reset_terrain();
                self.grid.coords().into_iter().collect()
            }
        }
    }

    /// Reseeds and remeshes every chunk from the configured terrain.
    pub fn reset_terrain(&mut self) {
        let generation = &mut self.cfg.generation;
        if generation.randomize_seed {
            generation.seed = rand::random::<i32>();
            log::info!("terrain seed randomized to {}", generation.seed);
        }
        let terrain = NoiseTerrain::from_config(generation);
        self.grid.set_source(Box::new(terrain));
        self.grid.reset_all();
    }

    pub fn seed(&self) -> i32 {
        self.cfg.generation.seed
    }

    pub fn replay(&mut self, script: &StrokeScript) -> usize {
        let mut remeshed = 0;
        for (i, stroke) in script.strokes.iter().enumerate() {
            let touched = self.apply(stroke);
            log::info!(
                "stroke {} {:?} at {:?}: {} chunks touched",
                i,
                stroke.op,
                stroke.at,
                touched.len()
            );
            remeshed += touched.len();
        }
        remeshed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
        [[stroke]]
        op = "pick"
        at = [0.0, 6.4, 0.0]

        [[stroke]]
        op = "set"
        at = [4.0, 0.0, 4.0]

        [[stroke]]
        op = "line"
        at = [1.0, 3.0, 1.0]
        end = [7.0, 3.0, 7.0]
        range = 1.0

        [[stroke]]
        op = "paint"
        at = [4.0, 6.0, 4.0]
        colour = [1.0, 0.0, 0.0, 1.0]
    "#;

    fn flat_session() -> Session {
        let cfg = TerrainConfig::from_toml_str(
            r#"
            [generation]
            generate_noise = false
            ground_height = 3.0
            "#,
        )
        .unwrap();
        Session::new(cfg, ChunkCoord::new(0, 0, 0), ChunkCoord::new(0, 0, 0))
    }

    #[test]
    fn script_parses_and_replays() {
        let script = StrokeScript::from_toml_str(SCRIPT).unwrap();
        assert_eq!(script.strokes.len(), 4);
        let mut s = flat_session();
        s.replay(&script);
        assert_eq!(s.brush.target_height, 6);
        assert_eq!(s.grid.get_point(4, 6, 4).density, 1.0);
        assert_eq!(s.grid.get_point(4, 7, 4).density, 0.0);
        assert_eq!(s.grid.get_point(4, 3, 4).density, 0.0);
        assert_eq!(s.grid.get_point(4, 6, 4).colour, Rgba::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn demo_files_load() {
        let cfg = TerrainConfig::from_toml_str(include_str!("../demos/terrain.toml")).unwrap();
        let script = StrokeScript::from_toml_str(include_str!("../demos/strokes.toml")).unwrap();
        let mut s = Session::new(cfg, ChunkCoord::new(-1, 0, -1), ChunkCoord::new(0, 1, 0));
        assert_eq!(s.grid.len(), 8);
        s.replay(&script);
        assert_eq!(s.brush.target_height, 15);
    }

    #[test]
    fn reset_restores_generated_terrain() {
        let mut s = flat_session();
        let script = StrokeScript::from_toml_str(
            "[[stroke]]\nop = \"set\"\nat = [4.0, 0.0, 4.0]\n\n[[stroke]]\nop = \"reset\"\n",
        )
        .unwrap();
        s.apply(&script.strokes[0]);
        assert_eq!(s.grid.get_point(4, 5, 4).density, 1.0);
        let touched = s.apply(&script.strokes[1]);
        assert_eq!(touched.len(), 1);
        assert_eq!(s.grid.get_point(4, 5, 4).density, 0.0);
        assert_eq!(s.grid.get_point(4, 3, 4).density, 0.5);
        assert_eq!(s.seed(), 0);
    }

    #[test]
    fn reset_draws_a_new_seed_when_asked() {
        let cfg = TerrainConfig::from_toml_str("[generation]\nrandomize_seed = true\nseed = 7\n").unwrap();
        let mut s = Session::new(cfg, ChunkCoord::new(0, 0, 0), ChunkCoord::new(0, 0, 0));
        let seeds: Vec<i32> = (0..4)
            .map(|_| {
                s.reset_terrain();
                s.seed()
            })
            .collect();
        assert!(seeds.iter().any(|&seed| seed != 7));
    }

    #[test]
    fn strokes_need_a_point() {
        let err = StrokeScript::from_toml_str("[[stroke]]\nop = \"raise\"\n");
        assert!(matches!(err, Err(ScriptError::MissingAt(0))));
    }

    #[test]
    fn line_without_end_is_rejected() {
        let err = StrokeScript::from_toml_str("[[stroke]]\nop = \"line\"\nat = [0.0, 0.0, 0.0]\n");
        assert!(matches!(err, Err(ScriptError::MissingEnd(0))));
    }

    #[test]
    fn unknown_ops_fail_to_parse() {
        let err = StrokeScript::from_toml_str("[[stroke]]\nop = \"explode\"\nat = [0.0, 0.0, 0.0]\n");
        assert!(matches!(err, Err(ScriptError::Parse(_))));
    }
}
