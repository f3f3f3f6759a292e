//! Materializing the active triangle set as polygons

use std::collections::HashMap;

use hdscrate_core::{normalize_or_z, Point3f, TriangleMesh, Vector3f};

use crate::lists::TriId;
use crate::node::NodeId;
use crate::octree::Octree;

/// Plane `normal · p + offset = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3f,
    pub offset: f32,
}

/// Fallback for degenerate triangles: `z = 0`.
impl Default for Plane {
    fn default() -> Self {
        Plane {
            normal: Vector3f::z(),
            offset: 0.0,
        }
    }
}

impl Plane {
    /// Plane through three points, or the default plane when they are
    /// (nearly) collinear.
    pub fn through(v0: &Point3f, v1: &Point3f, v2: &Point3f) -> Self {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let n = e1.cross(&e2).normalize();
        if !n.iter().all(|x| x.is_finite()) {
            return Plane::default();
        }
        Plane {
            normal: n,
            offset: -n.dot(&v0.coords),
        }
    }

    pub fn signed_distance(&self, p: &Point3f) -> f32 {
        self.normal.dot(&p.coords) + self.offset
    }
}

/// One visible triangle, with each corner snapped to its proxy node.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: [Point3f; 3],
    pub normals: [Vector3f; 3],
    pub plane: Plane,
    /// Proxy node of each corner.
    pub nodes: [NodeId; 3],
    /// Source triangle.
    pub triangle: TriId,
}

/// The mesh a query produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonMesh {
    pub polygons: Vec<Polygon>,
}

impl PolygonMesh {
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Polygon> {
        self.polygons.iter()
    }

    /// Convert to an indexed mesh with one vertex per proxy node.
    ///
    /// Corners that snapped to the same node share their output vertex, so
    /// the result is welded wherever the tree merged vertices.
    pub fn to_triangle_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        let mut normals = Vec::new();
        let mut index_of: HashMap<NodeId, usize> = HashMap::new();

        for polygon in &self.polygons {
            let mut face = [0usize; 3];
            for corner in 0..3 {
                face[corner] = *index_of.entry(polygon.nodes[corner]).or_insert_with(|| {
                    normals.push(polygon.normals[corner]);
                    mesh.add_vertex(polygon.vertices[corner])
                });
            }
            mesh.add_face(face);
        }
        mesh.set_normals(normals);
        mesh
    }
}

impl<'a> IntoIterator for &'a PolygonMesh {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

impl Octree {
    /// Build polygons for the current active set, in ascending triangle id.
    pub fn to_polygon_mesh(&self) -> PolygonMesh {
        let mut polygons = Vec::with_capacity(self.active.len());
        for t in self.active.iter() {
            let nodes = self.triangles[t].proxy;
            let vertices = nodes.map(|id| self.nodes[id.0].rep_vert);
            let normals = nodes.map(|id| normalize_or_z(&self.nodes[id.0].rep_norm));
            polygons.push(Polygon {
                plane: Plane::through(&vertices[0], &vertices[1], &vertices[2]),
                vertices,
                normals,
                nodes,
                triangle: t,
            });
        }
        PolygonMesh { polygons }
    }
}
