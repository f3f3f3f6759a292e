//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A point with normal vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalPoint3f {
    pub position: Point3f,
    pub normal: Vector3f,
}

impl NormalPoint3f {
    pub fn new(position: Point3f, normal: Vector3f) -> Self {
        Self { position, normal }
    }

    /// True when every coordinate of both the position and the normal is finite
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite()) && self.normal.iter().all(|c| c.is_finite())
    }
}

impl Default for NormalPoint3f {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            normal: Vector3f::new(0.0, 0.0, 1.0),
        }
    }
}

/// Normalize `v`, falling back to +Z when it has no usable direction.
pub fn normalize_or_z(v: &Vector3f) -> Vector3f {
    let len = v.magnitude();
    if len > 1e-12 && len.is_finite() {
        v / len
    } else {
        Vector3f::new(0.0, 0.0, 1.0)
    }
}
