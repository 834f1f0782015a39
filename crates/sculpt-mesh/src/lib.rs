//! CPU marching-cubes mesher for density lattices.
#![forbid(unsafe_code)]

mod march;
mod mesh_build;
pub mod tables;

pub use march::{Mesher, SNAP_EPSILON, count_vertices, cube_index, edge_mu, interpolate};
pub use mesh_build::MeshBuffer;
