//! Multiresolution mesh simplification
//!
//! This crate builds a hierarchical decimation structure (an octree over the
//! vertices of a triangle soup) and extracts level-of-detail meshes from it:
//! - Threshold queries fold every node whose error radius is small enough
//! - Budget queries fold nodes in a fixed priority order until a triangle
//!   count is met
//!
//! Each node keeps a representative vertex and normal (the mean of the
//! vertices below it), an error radius, and the two triangle lists needed to
//! patch the visible set when the node folds or unfolds.

pub mod node;
pub mod lists;
pub mod triangle;
pub mod params;
pub mod octree;
mod build;
mod fold;
mod query;
pub mod output;
pub mod simplifier;

pub use node::*;
pub use lists::*;
pub use triangle::*;
pub use params::*;
pub use octree::*;
pub use output::*;
pub use simplifier::*;

use hdscrate_core::{TriangleMesh, Result};

/// Simplify a mesh by reducing the number of faces/vertices
pub trait MeshSimplifier {
    /// Simplify mesh with target reduction ratio (0.0 = no reduction, 1.0 = maximum reduction)
    fn simplify(&self, mesh: &TriangleMesh, reduction_ratio: f32) -> Result<TriangleMesh>;
}
