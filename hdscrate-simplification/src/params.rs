//! Parameters for building the decimation octree.

use hdscrate_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Deepest tree the builder accepts. Past this, f32 boxes stop shrinking.
pub const MAX_SUPPORTED_DEPTH: u32 = 32;

/// Parameters for building a [`crate::Octree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdsParams {
    /// Maximum node depth (root = 0). Vertices that would need a deeper
    /// cell are merged into the depth-limited leaf. Default: 8
    pub max_depth: u32,

    /// Root box padding, as a fraction of the largest bounding-box extent.
    /// Keeps every vertex strictly inside the half-open root box. Default: 1e-4
    pub padding: f32,
}

impl Default for HdsParams {
    fn default() -> Self {
        Self {
            max_depth: 8,
            padding: 1e-4,
        }
    }
}

impl HdsParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create params with the given depth limit.
    #[must_use]
    pub fn with_max_depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    /// Set the relative root padding.
    #[must_use]
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(Error::InvalidParameter(format!(
                "max_depth {} exceeds the supported limit of {}",
                self.max_depth, MAX_SUPPORTED_DEPTH
            )));
        }
        if !(self.padding.is_finite() && self.padding > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "padding must be a positive finite fraction, got {}",
                self.padding
            )));
        }
        Ok(())
    }
}
