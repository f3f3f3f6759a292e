//! The decimation octree aggregate
//!
//! An [`Octree`] owns every node (in an arena indexed by [`NodeId`]), the
//! triangle store, the active list and the budget queue. It only exists
//! after a successful build, and dropping it releases everything at once.

use std::fmt;

use hdscrate_core::{Drawable, Error, NormalPoint3f, Result, TriangleMesh, TriangleSoup};
use tracing::{debug, info, warn};

use crate::lists::{ActiveList, TriId};
use crate::node::{Aabb, NodeId, NodeStatus, OctreeNode};
use crate::params::HdsParams;
use crate::triangle::TriangleRecord;

pub(crate) const ROOT: NodeId = NodeId(0);

/// Counters gathered while building the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Nodes in the arena, root included.
    pub node_count: usize,
    /// Nodes without children.
    pub leaf_count: usize,
    /// Deepest node depth actually created.
    pub max_depth_reached: u32,
    /// Corner insertions that hit a bit-identical leaf occupant.
    pub duplicate_vertices: usize,
    /// Corner insertions merged into a leaf at the depth limit.
    pub truncated_vertices: usize,
    /// Interior nodes in the budget queue.
    pub queue_len: usize,
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes ({} leaves, depth {}), {} duplicate and {} truncated vertices, {} queued",
            self.node_count,
            self.leaf_count,
            self.max_depth_reached,
            self.duplicate_vertices,
            self.truncated_vertices,
            self.queue_len
        )
    }
}

/// Hierarchical decimation structure over a triangle soup.
#[derive(Debug, Clone)]
pub struct Octree {
    pub(crate) params: HdsParams,
    pub(crate) nodes: Vec<OctreeNode>,
    pub(crate) triangles: Vec<TriangleRecord>,
    pub(crate) active: ActiveList,
    /// Foldable nodes by decreasing radius, ties by smaller depth. Fixed at build.
    pub(crate) tbq: Vec<NodeId>,
    pub(crate) stats: BuildStats,
}

impl Octree {
    /// Build the octree for `soup`.
    ///
    /// Every corner is inserted, then every triangle is classified into the
    /// per-node lists, then radii are computed and the budget queue is
    /// sorted. The returned tree is at full resolution.
    pub fn build(soup: &TriangleSoup, params: &HdsParams) -> Result<Self> {
        params.validate()?;
        if soup.is_empty() {
            return Err(Error::InvalidData("Triangle soup is empty".to_string()));
        }
        if let Some(index) = soup
            .triangles
            .iter()
            .position(|t| !t.corners.iter().all(NormalPoint3f::is_finite))
        {
            return Err(Error::InvalidData(format!(
                "Triangle {} has a non-finite position or normal",
                index
            )));
        }

        let (min, max) = soup.bounding_box();
        let bounds = Aabb::new(min, max);
        let max_abs = soup
            .corners()
            .map(|c| c.position.coords.amax())
            .fold(0.0f32, f32::max);
        let scale = bounds.max_extent().max(max_abs).max(1.0);

        let mut root = OctreeNode::new(bounds.padded(scale * params.padding), 0, None);
        root.status = NodeStatus::Boundary;

        let mut octree = Octree {
            params: params.clone(),
            nodes: vec![root],
            triangles: soup
                .triangles
                .iter()
                .enumerate()
                .map(|(id, t)| TriangleRecord::from_soup(id, t))
                .collect(),
            active: ActiveList::new(),
            tbq: Vec::new(),
            stats: BuildStats::default(),
        };

        octree.insert_vertices();
        octree.classify_triangles();
        octree.compute_radii();
        octree.build_budget_queue();
        octree.collect_stats();
        octree.unfold_all(ROOT);

        info!(
            triangles = octree.triangles.len(),
            nodes = octree.stats.node_count,
            leaves = octree.stats.leaf_count,
            depth = octree.stats.max_depth_reached,
            active = octree.active.len(),
            "Built decimation octree"
        );
        if octree.stats.truncated_vertices > 0 {
            warn!(
                truncated = octree.stats.truncated_vertices,
                max_depth = octree.params.max_depth,
                "Depth limit reached; nearby vertices were merged"
            );
        }

        Ok(octree)
    }

    /// Expand an indexed mesh into a soup and build from it.
    pub fn from_mesh(mesh: &TriangleMesh, params: &HdsParams) -> Result<Self> {
        Self::build(&TriangleSoup::from_mesh(mesh)?, params)
    }

    fn collect_stats(&mut self) {
        self.stats.node_count = self.nodes.len();
        self.stats.leaf_count = self.nodes.iter().filter(|n| n.is_leaf()).count();
        self.stats.max_depth_reached = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        self.stats.queue_len = self.tbq.len();
    }

    pub fn params(&self) -> &HdsParams {
        &self.params
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn root_id(&self) -> NodeId {
        ROOT
    }

    pub fn root(&self) -> &OctreeNode {
        &self.nodes[ROOT.0]
    }

    pub fn node(&self, id: NodeId) -> &OctreeNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &OctreeNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn triangle(&self, id: TriId) -> &TriangleRecord {
        &self.triangles[id]
    }

    /// All triangles in ingestion order.
    pub fn triangles(&self) -> &[TriangleRecord] {
        &self.triangles
    }

    pub fn active_triangles(&self) -> &ActiveList {
        &self.active
    }

    /// Foldable nodes, head first (largest radius, shallowest on ties).
    pub fn budget_queue(&self) -> &[NodeId] {
        &self.tbq
    }

    pub fn active_triangle_count(&self) -> usize {
        self.active.len()
    }

    pub fn original_triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Drop for Octree {
    fn drop(&mut self) {
        debug!(
            nodes = self.nodes.len(),
            triangles = self.triangles.len(),
            "Releasing decimation octree"
        );
    }
}
