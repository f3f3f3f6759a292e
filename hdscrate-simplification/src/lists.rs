//! Triangle lists kept by the octree
//!
//! [`TriangleList`] is the per-node bookkeeping list (`Tris`/`SubTris`):
//! ordered by triangle id, never holding the same triangle twice.
//! [`ActiveList`] is the set of triangles currently being rendered.

use std::collections::BTreeSet;

/// Identity of a triangle: its position in the ingestion order.
pub type TriId = usize;

/// Triangles ordered by ascending id, with insert-if-absent semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriangleList {
    ids: BTreeSet<TriId>,
}

impl TriangleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless already present. Returns true if the triangle was added.
    pub fn insert(&mut self, id: TriId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: TriId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = TriId> + '_ {
        self.ids.iter().copied()
    }
}

/// The visible triangle set.
///
/// Membership changes only through folds and unfolds. Iteration is by
/// ascending id so materialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveList {
    ids: BTreeSet<TriId>,
}

impl ActiveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: TriId) -> bool {
        self.ids.insert(id)
    }

    pub(crate) fn remove(&mut self, id: TriId) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: TriId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TriId> + '_ {
        self.ids.iter().copied()
    }
}
