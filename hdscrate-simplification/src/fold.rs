//! Fold and unfold: moving the cut through the tree one node at a time.
//!
//! A node is `Active` when unfolded (its children are on or below the cut),
//! `Boundary` when it is on the cut and `Inactive` below it. Collapsing a
//! node pulls the cut up to it, expanding pushes the cut down to its
//! children. Both keep two things in step:
//!
//! - the active list: a triangle is visible exactly when the node whose
//!   `SubTris` holds it is `Active`;
//! - corner proxies: a visible corner always points at the cut node on the
//!   path to its vertex, which is the node the triangle's `Tris` entries
//!   route it to.

use crate::node::{NodeId, NodeStatus};
use crate::octree::Octree;

/// What an unfolded node does with its foldable children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum UnfoldMode {
    /// Refine each child against the error limit.
    Threshold { limit: f32 },
    /// Unfold everything below.
    Full,
}

impl Octree {
    /// Fold `id`: its whole subtree goes below the cut and `id` is rendered
    /// in its place.
    pub(crate) fn collapse(&mut self, id: NodeId) {
        self.nodes[id.0].status = NodeStatus::Boundary;

        let children = self.nodes[id.0].children;
        for child in children.into_iter().flatten() {
            if self.nodes[child.0].status == NodeStatus::Active {
                self.collapse(child);
            }
            self.nodes[child.0].status = NodeStatus::Inactive;
        }

        let node = &self.nodes[id.0];
        for t in node.tris.iter() {
            let record = &mut self.triangles[t];
            for corner in 0..3 {
                if node.bbox.contains(record.position(corner)) {
                    record.proxy[corner] = id;
                }
            }
        }
        for t in node.sub_tris.iter() {
            self.active.remove(t);
        }
    }

    /// Unfold `id`: its children join the cut, then each foldable child is
    /// handled according to `mode`.
    pub(crate) fn expand(&mut self, id: NodeId, mode: UnfoldMode) {
        self.nodes[id.0].status = NodeStatus::Active;

        let children = self.nodes[id.0].children;
        for child in children.into_iter().flatten() {
            self.nodes[child.0].status = NodeStatus::Boundary;
        }

        let node = &self.nodes[id.0];
        for t in node.tris.iter() {
            let record = &mut self.triangles[t];
            for corner in 0..3 {
                let position = record.position(corner);
                if node.bbox.contains(position) {
                    if let Some(child) = node.children[node.bbox.octant_of(position)] {
                        record.proxy[corner] = child;
                    }
                }
            }
        }
        for t in node.sub_tris.iter() {
            self.active.insert(t);
        }

        for child in children.into_iter().flatten() {
            if !self.nodes[child.0].is_foldable() {
                continue;
            }
            match mode {
                UnfoldMode::Threshold { limit } => self.adjust_tree(child, limit),
                UnfoldMode::Full => self.unfold_all(child),
            }
        }
    }

    /// Move the cut below `id` so that exactly the nodes whose radius, and
    /// every ancestor's radius, exceeds `limit` are unfolded.
    pub(crate) fn adjust_tree(&mut self, id: NodeId, limit: f32) {
        let node = &self.nodes[id.0];
        if node.radius > limit {
            if node.status == NodeStatus::Active {
                let children = node.children;
                for child in children.into_iter().flatten() {
                    if self.nodes[child.0].is_foldable() {
                        self.adjust_tree(child, limit);
                    }
                }
            } else {
                self.expand(id, UnfoldMode::Threshold { limit });
            }
        } else if node.status == NodeStatus::Active {
            self.collapse(id);
        }
    }

    /// Unfold every interior node below and including `id`.
    pub(crate) fn unfold_all(&mut self, id: NodeId) {
        let node = &self.nodes[id.0];
        if !node.is_foldable() {
            return;
        }
        if node.status == NodeStatus::Active {
            let children = node.children;
            for child in children.into_iter().flatten() {
                self.unfold_all(child);
            }
        } else {
            self.expand(id, UnfoldMode::Full);
        }
    }
}
