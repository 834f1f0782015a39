mod session;

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use sculpt_world::{ChunkCoord, TerrainConfig, load_config_from_path};
use session::{Session, StrokeScript};

#[derive(Parser, Debug)]
#[command(name = "sculpt", about = "Build a density-field terrain, replay edit strokes, report meshes")]
struct Cli {
    /// Terrain config (TOML). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stroke script (TOML `[[stroke]]` tables) to replay after generation.
    #[arg(long)]
    strokes: Option<PathBuf>,

    /// Inclusive chunk range `x0,y0,z0:x1,y1,z1`.
    #[arg(long, value_parser = parse_chunk_range, default_value = "-1,0,-1:0,1,0")]
    chunks: (ChunkCoord, ChunkCoord),

    #[arg(long)]
    verbose: bool,
}

fn parse_coord(s: &str) -> Result<ChunkCoord, String> {
    let parts: Vec<i32> = s
        .split(',')
        .map(|p| p.trim().parse::<i32>().map_err(|e| format!("bad coordinate '{p}': {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(ChunkCoord::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z but got '{s}'")),
    }
}

fn parse_chunk_range(s: &str) -> Result<(ChunkCoord, ChunkCoord), String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| format!("expected x0,y0,z0:x1,y1,z1 but got '{s}'"))?;
    Ok((parse_coord(a)?, parse_coord(b)?))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let cfg = match &cli.config {
        Some(path) => load_config_from_path(path)?,
        None => {
            log::info!("no config given, using defaults");
            TerrainConfig::default()
        }
    };
    let (from, to) = cli.chunks;
    let mut session = Session::new(cfg, from, to);

    if let Some(path) = &cli.strokes {
        let script = StrokeScript::load(path)?;
        let remeshed = session.replay(&script);
        log::info!("replayed {} strokes, {} chunk remeshes", script.strokes.len(), remeshed);
    }

    let mut vertices = 0usize;
    let mut triangles = 0usize;
    for coord in session.grid.coords() {
        if let Some(mesh) = session.grid.mesh(coord) {
            println!("{} {} {}", coord, mesh.vertex_count(), mesh.triangle_count());
            vertices += mesh.vertex_count();
            triangles += mesh.triangle_count();
        }
    }
    log::info!(
        "{} chunks, {} vertices, {} triangles",
        session.grid.len(),
        vertices,
        triangles
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_range_parses() {
        let (a, b) = parse_chunk_range("-1, 0,-2:3,4,5").unwrap();
        assert_eq!(a, ChunkCoord::new(-1, 0, -2));
        assert_eq!(b, ChunkCoord::new(3, 4, 5));
    }

    #[test]
    fn malformed_ranges_fail() {
        assert!(parse_chunk_range("0,0,0").is_err());
        assert!(parse_chunk_range("0,0:1,1,1").is_err());
        assert!(parse_chunk_range("a,0,0:1,1,1").is_err());
    }
}
