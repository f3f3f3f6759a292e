//! Core data structures and traits for hdscrate
//!
//! This crate provides the fundamental geometry types shared by the
//! simplification engine: points and normals, indexed triangle meshes,
//! flat triangle soups, and the common error type.

pub mod point;
pub mod mesh;
pub mod soup;
pub mod traits;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use soup::*;
pub use traits::*;
pub use error::*;
