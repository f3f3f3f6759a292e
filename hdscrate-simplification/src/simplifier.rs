//! [`MeshSimplifier`] front end for the decimation octree

use hdscrate_core::{Error, Result, TriangleMesh};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::octree::Octree;
use crate::params::HdsParams;
use crate::MeshSimplifier;

/// Simplifies a mesh by building an octree and running a budget query.
///
/// The budget is `ceil((1 - reduction_ratio) * faces)`. Output vertices are
/// the node representatives, one per distinct proxy node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HdsSimplifier {
    pub params: HdsParams,
}

impl HdsSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: HdsParams) -> Self {
        Self { params }
    }
}

impl MeshSimplifier for HdsSimplifier {
    fn simplify(&self, mesh: &TriangleMesh, reduction_ratio: f32) -> Result<TriangleMesh> {
        if mesh.is_empty() {
            return Err(Error::InvalidData("Mesh is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&reduction_ratio) {
            return Err(Error::InvalidData(
                "Reduction ratio must be between 0.0 and 1.0".to_string(),
            ));
        }
        if reduction_ratio == 0.0 {
            return Ok(mesh.clone());
        }

        let budget = ((1.0 - reduction_ratio) * mesh.face_count() as f32).ceil() as usize;
        let mut octree = Octree::from_mesh(mesh, &self.params)?;
        let simplified = octree.query_by_budget(budget).to_triangle_mesh();

        info!(
            faces = mesh.face_count(),
            budget,
            result_faces = simplified.face_count(),
            result_vertices = simplified.vertex_count(),
            "HDS simplification finished"
        );
        Ok(simplified)
    }
}
