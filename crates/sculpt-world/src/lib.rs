//! Lattice addressing, terrain configuration and density seeding.
#![forbid(unsafe_code)]

pub mod config;
pub mod coord;
pub mod density;
pub mod lattice;

pub use config::{ConfigError, TerrainConfig, load_config_from_path};
pub use coord::ChunkCoord;
pub use density::{DensitySource, NoiseTerrain};
pub use lattice::{LatticePoint, lattice_index, lattice_len};
