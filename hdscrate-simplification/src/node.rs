//! Octree cells of the hierarchical decimation structure

use crate::lists::TriangleList;
use hdscrate_core::{Point3f, Vector3f};

// ============================================================
// Bounding Box
// ============================================================

/// Axis-aligned box. Containment is half-open, `(min, max]` on every axis,
/// which matches the strict `>` midpoint test used to pick octants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    pub fn new(min: Point3f, max: Point3f) -> Self {
        Aabb { min, max }
    }

    /// Grow the box by `pad` on every side.
    pub fn padded(&self, pad: f32) -> Self {
        Aabb {
            min: Point3f::new(self.min.x - pad, self.min.y - pad, self.min.z - pad),
            max: Point3f::new(self.max.x + pad, self.max.y + pad, self.max.z + pad),
        }
    }

    pub fn center(&self) -> Point3f {
        Point3f::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).magnitude()
    }

    pub fn max_extent(&self) -> f32 {
        let s = self.max - self.min;
        s.x.max(s.y).max(s.z)
    }

    pub fn contains(&self, p: &Point3f) -> bool {
        p.x > self.min.x
            && p.x <= self.max.x
            && p.y > self.min.y
            && p.y <= self.max.y
            && p.z > self.min.z
            && p.z <= self.max.z
    }

    /// Octant of `p` relative to the box midpoint: bit 0 is +X, bit 1 is +Y,
    /// bit 2 is +Z. Ties go to the lower half.
    pub fn octant_of(&self, p: &Point3f) -> usize {
        let c = self.center();
        (p.x > c.x) as usize | ((p.y > c.y) as usize) << 1 | ((p.z > c.z) as usize) << 2
    }

    /// The sub-box for octant `index`, laid out as in [`Aabb::octant_of`].
    pub fn octant(&self, index: usize) -> Aabb {
        let c = self.center();
        let (mn, mx) = (self.min, self.max);
        let pick = |bit: usize, lo: f32, mid: f32, hi: f32| {
            if index & bit == 0 {
                (lo, mid)
            } else {
                (mid, hi)
            }
        };
        let (x0, x1) = pick(1, mn.x, c.x, mx.x);
        let (y0, y1) = pick(2, mn.y, c.y, mx.y);
        let (z0, z1) = pick(4, mn.z, c.z, mx.z);
        Aabb {
            min: Point3f::new(x0, y0, z0),
            max: Point3f::new(x1, y1, z1),
        }
    }
}

// ============================================================
// Octree Node
// ============================================================

/// Index of a node in the octree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a node sits relative to the current cut through the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// On the cut: the node's representative is what gets rendered.
    Boundary,
    /// Unfolded: the node's children stand in for it.
    Active,
    /// Below the cut.
    Inactive,
}

#[derive(Debug, Clone)]
pub struct OctreeNode {
    pub(crate) bbox: Aabb,
    pub(crate) children: [Option<NodeId>; 8],
    pub(crate) parent: Option<NodeId>,
    pub(crate) depth: u32,
    pub(crate) rep_vert: Point3f,
    pub(crate) rep_norm: Vector3f,
    pub(crate) weight: u32,
    pub(crate) radius: f32,
    pub(crate) status: NodeStatus,
    /// Triangles with exactly one corner in this box.
    pub(crate) tris: TriangleList,
    /// Triangles with two or three corners here, at most one per child.
    pub(crate) sub_tris: TriangleList,
}

impl OctreeNode {
    pub(crate) fn new(bbox: Aabb, depth: u32, parent: Option<NodeId>) -> Self {
        OctreeNode {
            bbox,
            children: [None; 8],
            parent,
            depth,
            rep_vert: Point3f::origin(),
            rep_norm: Vector3f::zeros(),
            weight: 0,
            radius: 0.0,
            status: NodeStatus::Inactive,
            tris: TriangleList::new(),
            sub_tris: TriangleList::new(),
        }
    }

    /// Fold a vertex (carrying `weight` insertions) into the running mean.
    pub(crate) fn absorb(&mut self, vert: &Point3f, norm: &Vector3f, weight: u32) {
        if self.weight == 0 {
            self.rep_vert = *vert;
            self.rep_norm = *norm;
            self.weight = weight;
            return;
        }
        let w = self.weight as f32;
        let total = (self.weight + weight) as f32;
        let k = weight as f32;
        self.rep_vert = Point3f::from((self.rep_vert.coords * w + vert.coords * k) / total);
        self.rep_norm = (self.rep_norm * w + norm * k) / total;
        self.weight += weight;
    }

    pub fn bbox(&self) -> &Aabb {
        &self.bbox
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn child(&self, octant: usize) -> Option<NodeId> {
        self.children[octant]
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub fn rep_vertex(&self) -> Point3f {
        self.rep_vert
    }

    pub fn rep_normal(&self) -> Vector3f {
        self.rep_norm
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn status(&self) -> NodeStatus {
        self.status
    }

    pub fn tris(&self) -> &TriangleList {
        &self.tris
    }

    pub fn sub_tris(&self) -> &TriangleList {
        &self.sub_tris
    }

    /// Interior nodes are the ones a fold or unfold can change.
    pub fn is_foldable(&self) -> bool {
        self.weight > 1 && !self.is_leaf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_octant_ties_go_low() {
        let b = unit_box();
        assert_eq!(b.octant_of(&Point3f::new(0.5, 0.5, 0.5)), 0);
        assert_eq!(b.octant_of(&Point3f::new(0.6, 0.5, 0.5)), 1);
        assert_eq!(b.octant_of(&Point3f::new(0.5, 0.6, 0.5)), 2);
        assert_eq!(b.octant_of(&Point3f::new(0.6, 0.6, 0.6)), 7);
    }

    #[test]
    fn test_octant_boxes_partition_parent() {
        let b = unit_box();
        let probes = [
            Point3f::new(0.5, 0.5, 0.5),
            Point3f::new(0.25, 0.75, 0.5),
            Point3f::new(1.0, 1.0, 1.0),
            Point3f::new(0.75, 0.1, 0.9),
        ];
        for p in &probes {
            let owners: Vec<usize> = (0..8).filter(|&i| b.octant(i).contains(p)).collect();
            assert_eq!(owners, vec![b.octant_of(p)], "probe {:?}", p);
        }
    }

    #[test]
    fn test_half_open_containment() {
        let b = unit_box();
        assert!(!b.contains(&Point3f::new(0.0, 0.5, 0.5)));
        assert!(b.contains(&Point3f::new(1.0, 0.5, 0.5)));
        assert!(b.padded(0.1).contains(&Point3f::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_absorb_running_mean() {
        let mut node = OctreeNode::new(unit_box(), 0, None);
        node.absorb(&Point3f::new(0.0, 0.0, 0.0), &Vector3f::x(), 1);
        assert_eq!(node.weight(), 1);
        assert_eq!(node.rep_vertex(), Point3f::new(0.0, 0.0, 0.0));

        node.absorb(&Point3f::new(1.0, 0.0, 0.0), &Vector3f::y(), 1);
        node.absorb(&Point3f::new(2.0, 0.0, 0.0), &Vector3f::y(), 1);
        assert_eq!(node.weight(), 3);
        assert_relative_eq!(node.rep_vertex().x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(node.rep_normal().y, 2.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_diagonal() {
        assert_relative_eq!(unit_box().diagonal(), 3.0_f32.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(unit_box().octant(5).diagonal(), 3.0_f32.sqrt() / 2.0, epsilon = 1e-6);
    }
}
