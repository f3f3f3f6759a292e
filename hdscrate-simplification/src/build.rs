//! Construction passes: vertex insertion, triangle classification, radii
//! and the budget queue.

use std::cmp::Ordering;

use hdscrate_core::{Point3f, Vector3f};
use priority_queue::PriorityQueue;
use tracing::trace;

use crate::lists::TriId;
use crate::node::{Aabb, NodeId, OctreeNode};
use crate::octree::{Octree, ROOT};

/// What happened to one inserted corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insertion {
    /// The vertex got its own cell.
    Placed,
    /// Bit-identical to the leaf occupant; nothing changed below the parents.
    Duplicate,
    /// Merged into a leaf at the depth limit.
    Truncated,
}

// ============================================================
// Budget Queue Ordering
// ============================================================

#[derive(Debug, Clone, Copy)]
struct CollapsePriority {
    radius: f32,
    depth: u32,
    node: NodeId,
}

impl PartialEq for CollapsePriority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for CollapsePriority {}

impl PartialOrd for CollapsePriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CollapsePriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: larger radius first, then shallower, then older
        self.radius
            .total_cmp(&other.radius)
            .then_with(|| other.depth.cmp(&self.depth))
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// True when no two corners inside `bbox` share a child octant.
fn corners_split(bbox: &Aabb, positions: &[Point3f; 3]) -> bool {
    let octants = positions.map(|p| bbox.contains(&p).then(|| bbox.octant_of(&p)));
    (0..3).all(|i| {
        (i + 1..3).all(|j| octants[i].is_none() || octants[i] != octants[j])
    })
}

impl Octree {
    fn create_child(&mut self, parent: NodeId, octant: usize) -> NodeId {
        let (bbox, depth) = {
            let p = &self.nodes[parent.0];
            (p.bbox.octant(octant), p.depth + 1)
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(OctreeNode::new(bbox, depth, Some(parent)));
        self.nodes[parent.0].children[octant] = Some(id);
        id
    }

    /// Insert every triangle corner, in ingestion order.
    pub(crate) fn insert_vertices(&mut self) {
        for t in 0..self.triangles.len() {
            for corner in 0..3 {
                let vert = *self.triangles[t].position(corner);
                let norm = *self.triangles[t].normal(corner);
                match self.insert_vertex(ROOT, &vert, &norm, 1) {
                    Insertion::Placed => {}
                    Insertion::Duplicate => self.stats.duplicate_vertices += 1,
                    Insertion::Truncated => {
                        trace!(triangle = t, corner, "vertex merged at depth limit");
                        self.stats.truncated_vertices += 1;
                    }
                }
            }
        }
    }

    /// Insert one vertex below `id`, splitting occupied leaves on the way.
    ///
    /// Interior nodes fold the vertex into their running mean before
    /// descending, so every ancestor represents its whole subtree.
    pub(crate) fn insert_vertex(
        &mut self,
        id: NodeId,
        vert: &Point3f,
        norm: &Vector3f,
        weight: u32,
    ) -> Insertion {
        let max_depth = self.params.max_depth;
        let node = &mut self.nodes[id.0];

        if node.weight == 0 {
            node.absorb(vert, norm, weight);
            return Insertion::Placed;
        }

        if node.is_leaf() {
            if node.rep_vert == *vert {
                return Insertion::Duplicate;
            }
            if node.depth >= max_depth {
                node.absorb(vert, norm, weight);
                return Insertion::Truncated;
            }
            // Push the occupant down so this node becomes interior
            let (occ_vert, occ_norm, occ_weight) = (node.rep_vert, node.rep_norm, node.weight);
            let octant = node.bbox.octant_of(&occ_vert);
            let child = self.create_child(id, octant);
            self.insert_vertex(child, &occ_vert, &occ_norm, occ_weight);
        }

        // Interior here, so depth < max_depth: nodes at the limit never split
        let node = &mut self.nodes[id.0];
        node.absorb(vert, norm, weight);
        let octant = node.bbox.octant_of(vert);
        let existing = node.children[octant];
        let child = match existing {
            Some(child) => child,
            None => self.create_child(id, octant),
        };
        self.insert_vertex(child, vert, norm, weight)
    }

    /// Fill `Tris`/`SubTris` on every node each corner passes through.
    pub(crate) fn classify_triangles(&mut self) {
        for t in 0..self.triangles.len() {
            for corner in 0..3 {
                // A childless root leaves the corner on the root
                self.classify(ROOT, t, corner);
            }
        }
    }

    /// Returns false when `id` has no child for the corner, i.e. the walk
    /// bottomed out here. The caller then records `id` as the corner's leaf,
    /// which is also its proxy at full resolution.
    fn classify(&mut self, id: NodeId, t: TriId, corner: usize) -> bool {
        let positions = *self.triangles[t].positions();
        let node = &mut self.nodes[id.0];
        let num_vert = positions.iter().filter(|p| node.bbox.contains(p)).count();

        match num_vert {
            1 => {
                node.tris.insert(t);
            }
            2 | 3 => {
                if !node.is_leaf() && corners_split(&node.bbox, &positions) {
                    node.sub_tris.insert(t);
                }
            }
            _ => {}
        }

        let Some(child) = node.children[node.bbox.octant_of(&positions[corner])] else {
            return false;
        };
        if !self.classify(child, t, corner) {
            let record = &mut self.triangles[t];
            record.proxy[corner] = child;
            record.leaf[corner] = child;
        }
        true
    }

    /// Set each radius to the farthest vertex below the node, measured from
    /// the node's final representative, clamped to half the box diagonal.
    pub(crate) fn compute_radii(&mut self) {
        for t in 0..self.triangles.len() {
            for corner in 0..3 {
                let vert = *self.triangles[t].position(corner);
                let mut current = Some(ROOT);
                while let Some(id) = current {
                    let node = &mut self.nodes[id.0];
                    node.radius = node.radius.max((vert - node.rep_vert).magnitude());
                    current = node.children[node.bbox.octant_of(&vert)];
                }
            }
        }
        for node in &mut self.nodes {
            node.radius = node.radius.min(0.5 * node.bbox.diagonal());
        }
    }

    pub(crate) fn build_budget_queue(&mut self) {
        let mut queue = PriorityQueue::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if node.is_foldable() {
                let id = NodeId(index);
                queue.push(
                    id,
                    CollapsePriority {
                        radius: node.radius,
                        depth: node.depth,
                        node: id,
                    },
                );
            }
        }

        let mut order = Vec::with_capacity(queue.len());
        while let Some((id, _)) = queue.pop() {
            order.push(id);
        }
        self.tbq = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::HdsParams;
    use hdscrate_core::{SoupTriangle, TriangleSoup};

    fn soup_of(triangles: &[[[f32; 3]; 3]]) -> TriangleSoup {
        TriangleSoup::from_triangles(
            triangles
                .iter()
                .map(|t| SoupTriangle::flat(t.map(|[x, y, z]| Point3f::new(x, y, z))))
                .collect(),
        )
    }

    fn make_unit_cube() -> TriangleSoup {
        let v = |i: usize| {
            Point3f::new((i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32)
        };
        let faces: [[usize; 3]; 12] = [
            [0, 2, 1], [1, 2, 3],
            [4, 5, 6], [5, 7, 6],
            [0, 1, 4], [1, 5, 4],
            [2, 6, 3], [3, 6, 7],
            [0, 4, 2], [2, 4, 6],
            [1, 3, 5], [3, 7, 5],
        ];
        TriangleSoup::from_triangles(
            faces.iter().map(|f| SoupTriangle::flat(f.map(v))).collect(),
        )
    }

    #[test]
    fn test_corners_split() {
        let bbox = Aabb::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0));
        let split = [
            Point3f::new(0.1, 0.1, 0.1),
            Point3f::new(0.9, 0.1, 0.1),
            Point3f::new(0.1, 0.9, 0.1),
        ];
        assert!(corners_split(&bbox, &split));

        let shared = [
            Point3f::new(0.1, 0.1, 0.1),
            Point3f::new(0.2, 0.2, 0.2),
            Point3f::new(0.9, 0.9, 0.9),
        ];
        assert!(!corners_split(&bbox, &shared));

        // Corners outside the box never collide
        let outside = [
            Point3f::new(0.1, 0.1, 0.1),
            Point3f::new(5.0, 5.0, 5.0),
            Point3f::new(6.0, 6.0, 6.0),
        ];
        assert!(corners_split(&bbox, &outside));
    }

    #[test]
    fn test_cube_structure() {
        let octree = Octree::build(&make_unit_cube(), &HdsParams::with_max_depth(3)).unwrap();
        let root = octree.root();

        // One corner per root octant
        assert_eq!(root.children().count(), 8);
        assert_eq!(root.weight(), 36);
        assert_eq!(octree.stats().node_count, 9);
        assert_eq!(octree.stats().leaf_count, 8);
        assert_eq!(octree.stats().duplicate_vertices, 36 - 8);
        assert_eq!(octree.stats().truncated_vertices, 0);

        assert!(root.tris().is_empty());
        assert_eq!(root.sub_tris().len(), 12);
        for child in root.children() {
            let leaf = octree.node(child);
            assert!(leaf.is_leaf());
            assert_eq!(leaf.weight(), 1);
            assert!(leaf.sub_tris().is_empty());
            assert!(!leaf.tris().is_empty());
        }
        assert_eq!(octree.budget_queue(), &[octree.root_id()]);
    }

    #[test]
    fn test_split_pushes_occupant_down() {
        // Both vertices fall in the low octant of the root, so the split recurses
        let soup = soup_of(&[[[0.0, 0.0, 0.0], [0.1, 0.0, 0.0], [1.0, 1.0, 1.0]]]);
        let octree = Octree::build(&soup, &HdsParams::with_max_depth(6)).unwrap();
        assert_eq!(octree.stats().truncated_vertices, 0);

        for corner in 0..3 {
            let leaf = octree.node(octree.triangle(0).leaf(corner));
            assert!(leaf.is_leaf());
            assert_eq!(leaf.rep_vertex(), *octree.triangle(0).position(corner));
        }

        let low = octree.node(octree.root().child(0).unwrap());
        assert!(!low.is_leaf());
        assert_eq!(low.weight(), 2);
        assert!((low.rep_vertex().x - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_depth_limit_merges_vertices() {
        let soup = soup_of(&[[[0.0, 0.0, 0.0], [0.1, 0.0, 0.0], [1.0, 1.0, 1.0]]]);
        let octree = Octree::build(&soup, &HdsParams::with_max_depth(1)).unwrap();
        assert_eq!(octree.stats().truncated_vertices, 1);
        assert_eq!(octree.stats().max_depth_reached, 1);

        let low = octree.node(octree.root().child(0).unwrap());
        assert!(low.is_leaf());
        assert_eq!(low.weight(), 2);
        assert!(!low.is_foldable());
        // Both merged corners share one cell, so no node can ever show the triangle
        assert!(octree.nodes().all(|(_, n)| n.sub_tris().is_empty()));
    }

    #[test]
    fn test_depth_limit_bounds_tree() {
        // Tight cluster that would need far more than two levels to separate
        let soup = soup_of(&[
            [[0.0, 0.0, 0.0], [0.001, 0.0, 0.0], [0.002, 0.0, 0.0]],
            [[0.003, 0.0, 0.0], [0.004, 0.001, 0.0], [1.0, 1.0, 1.0]],
        ]);
        let octree = Octree::build(&soup, &HdsParams::with_max_depth(2)).unwrap();
        assert_eq!(octree.stats().max_depth_reached, 2);
        assert_eq!(octree.stats().truncated_vertices, 4);
        for (_, node) in octree.nodes() {
            assert!(node.depth() <= 2);
            if node.depth() == 2 {
                assert!(node.is_leaf());
            }
        }
        // Ancestors still count every insertion
        assert_eq!(octree.root().weight(), 6);
        let cluster = octree.node(octree.triangle(0).leaf(0));
        assert_eq!(cluster.depth(), 2);
        assert_eq!(cluster.weight(), 5);
        assert_eq!(octree.triangle(1).leaf(1), octree.triangle(0).leaf(0));
    }

    #[test]
    fn test_classification_counts() {
        let octree = Octree::build(&make_unit_cube(), &HdsParams::default()).unwrap();
        for (_, node) in octree.nodes() {
            for t in node.tris().iter() {
                let inside = octree
                    .triangle(t)
                    .positions()
                    .iter()
                    .filter(|p| node.bbox().contains(p))
                    .count();
                assert_eq!(inside, 1);
            }
        }
    }

    #[test]
    fn test_radius_bound() {
        let octree = Octree::build(&make_unit_cube(), &HdsParams::default()).unwrap();
        for (_, node) in octree.nodes() {
            assert!(node.radius() >= 0.0);
            assert!(node.radius() <= 0.5 * node.bbox().diagonal() + 1e-6);
        }
        assert!(octree.root().radius() > 0.0);
    }

    #[test]
    fn test_queue_order() {
        let mut soup = make_unit_cube();
        // A second, smaller cluster of detail near one corner
        soup.push(SoupTriangle::flat([
            Point3f::new(0.9, 0.9, 0.9),
            Point3f::new(0.95, 0.9, 0.9),
            Point3f::new(0.9, 0.95, 0.9),
        ]));
        let octree = Octree::build(&soup, &HdsParams::default()).unwrap();
        let queue = octree.budget_queue();
        assert!(queue.len() > 1);
        assert_eq!(queue[0], octree.root_id());
        for pair in queue.windows(2) {
            let (a, b) = (octree.node(pair[0]), octree.node(pair[1]));
            assert!(a.radius() >= b.radius());
            if a.radius() == b.radius() {
                assert!(a.depth() <= b.depth());
            }
        }
    }
}
