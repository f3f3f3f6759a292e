//! Triangle records owned by the octree

use crate::lists::TriId;
use crate::node::NodeId;
use crate::octree::ROOT;
use hdscrate_core::{Point3f, SoupTriangle, Vector3f};

/// Immutable triangle geometry plus per-corner links into the tree.
///
/// `proxy[c]` is the node whose representative currently stands in for
/// corner `c`; `leaf[c]` is the deepest node corner `c` reached when the
/// tree was classified. Both are arena indices and never own anything.
/// They start at the root and are set for every corner during the build.
#[derive(Debug, Clone)]
pub struct TriangleRecord {
    id: TriId,
    positions: [Point3f; 3],
    normals: [Vector3f; 3],
    pub(crate) proxy: [NodeId; 3],
    pub(crate) leaf: [NodeId; 3],
}

impl TriangleRecord {
    pub(crate) fn from_soup(id: TriId, triangle: &SoupTriangle) -> Self {
        TriangleRecord {
            id,
            positions: triangle.positions(),
            normals: triangle.normals(),
            proxy: [ROOT; 3],
            leaf: [ROOT; 3],
        }
    }

    pub fn id(&self) -> TriId {
        self.id
    }

    pub fn position(&self, corner: usize) -> &Point3f {
        &self.positions[corner]
    }

    pub fn positions(&self) -> &[Point3f; 3] {
        &self.positions
    }

    pub fn normal(&self, corner: usize) -> &Vector3f {
        &self.normals[corner]
    }

    pub fn proxy(&self, corner: usize) -> NodeId {
        self.proxy[corner]
    }

    pub fn leaf(&self, corner: usize) -> NodeId {
        self.leaf[corner]
    }
}
