//! Level-of-detail queries: by error threshold or by triangle budget.

use hdscrate_core::{Error, Result};
use tracing::debug;

use crate::node::NodeStatus;
use crate::octree::{Octree, ROOT};
use crate::output::PolygonMesh;

impl Octree {
    /// Refine the cut so that every node whose radius exceeds
    /// `threshold * root radius` is unfolded, and return the visible mesh.
    ///
    /// `0` gives full resolution; `1` or more folds the whole tree.
    /// The result only depends on `threshold`, not on earlier queries.
    pub fn query_by_threshold(&mut self, threshold: f32) -> Result<PolygonMesh> {
        self.apply_threshold(threshold)?;
        Ok(self.to_polygon_mesh())
    }

    /// Like [`Octree::query_by_threshold`], without materializing a mesh.
    ///
    /// A negative or NaN threshold is rejected and the tree is left as is.
    pub fn apply_threshold(&mut self, threshold: f32) -> Result<()> {
        if threshold.is_nan() || threshold < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "Threshold must be a non-negative number, got {}",
                threshold
            )));
        }
        let limit = if threshold.is_infinite() {
            f32::INFINITY
        } else {
            threshold * self.root().radius
        };
        self.refine(limit);
        debug!(
            threshold,
            limit,
            active = self.active.len(),
            "Applied error threshold"
        );
        Ok(())
    }

    /// Restore full resolution, then fold nodes from the tail of the budget
    /// queue until at most `budget` triangles are visible, and return the
    /// visible mesh.
    ///
    /// The queue order is fixed at build time. When it runs out before the
    /// budget is met, the coarsest reachable mesh is returned.
    pub fn query_by_budget(&mut self, budget: usize) -> PolygonMesh {
        self.apply_budget(budget);
        self.to_polygon_mesh()
    }

    /// Like [`Octree::query_by_budget`], without materializing a mesh.
    pub fn apply_budget(&mut self, budget: usize) {
        self.unfold_all(ROOT);
        let full = self.active.len();

        let mut folded = 0;
        for i in (0..self.tbq.len()).rev() {
            if self.active.len() <= budget {
                break;
            }
            let id = self.tbq[i];
            if self.nodes[id.0].status == NodeStatus::Active {
                self.collapse(id);
                folded += 1;
            }
        }
        debug!(
            budget,
            full,
            folded,
            active = self.active.len(),
            "Applied triangle budget"
        );
    }

    /// Triangles that are not visible even at full resolution: those whose
    /// corners collapsed together during the build.
    ///
    /// This moves the tree to full resolution first, so the current active
    /// set is replaced by the threshold-0 one.
    pub fn dismissed_triangle_count(&mut self) -> usize {
        self.refine(0.0);
        self.original_triangle_count() - self.active.len()
    }

    fn refine(&mut self, limit: f32) {
        if self.root().is_foldable() {
            self.adjust_tree(ROOT, limit);
        }
    }
}
