//! Flat triangle soup: the ingestion format of the simplification engine
//!
//! Every triangle carries its own three positions and three normals, with no
//! vertex sharing. Arbitrary polygons must be triangulated before they get
//! here.

use crate::error::{Error, Result};
use crate::mesh::TriangleMesh;
use crate::point::*;
use serde::{Deserialize, Serialize};

/// One triangle of a soup: three corners, each a position with a normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoupTriangle {
    pub corners: [NormalPoint3f; 3],
}

impl SoupTriangle {
    pub fn new(corners: [NormalPoint3f; 3]) -> Self {
        Self { corners }
    }

    /// Build a triangle whose three corners share the face normal
    pub fn flat(positions: [Point3f; 3]) -> Self {
        let normal = normalize_or_z(&(positions[1] - positions[0]).cross(&(positions[2] - positions[0])));
        Self {
            corners: positions.map(|position| NormalPoint3f::new(position, normal)),
        }
    }

    pub fn positions(&self) -> [Point3f; 3] {
        self.corners.map(|c| c.position)
    }

    pub fn normals(&self) -> [Vector3f; 3] {
        self.corners.map(|c| c.normal)
    }
}

/// An ordered sequence of independent triangles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleSoup {
    pub triangles: Vec<SoupTriangle>,
}

impl TriangleSoup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triangles(triangles: Vec<SoupTriangle>) -> Self {
        Self { triangles }
    }

    /// Expand an indexed mesh into a soup.
    ///
    /// Per-vertex normals are used when the mesh has them, otherwise every
    /// corner takes its face normal.
    pub fn from_mesh(mesh: &TriangleMesh) -> Result<Self> {
        let vertex_count = mesh.vertices.len();
        if let Some((fi, face)) = mesh
            .faces
            .iter()
            .enumerate()
            .find(|(_, face)| face.iter().any(|&vi| vi >= vertex_count))
        {
            return Err(Error::InvalidData(format!(
                "Face {} references vertex {:?} but mesh has {} vertices",
                fi, face, vertex_count
            )));
        }

        if let Some(normals) = mesh.normals.as_ref().filter(|n| n.len() != vertex_count) {
            return Err(Error::InvalidData(format!(
                "Mesh has {} normals for {} vertices",
                normals.len(),
                vertex_count
            )));
        }

        let triangles = match mesh.normals.as_ref() {
            Some(normals) => mesh
                .faces
                .iter()
                .map(|face| {
                    SoupTriangle::new(
                        face.map(|vi| NormalPoint3f::new(mesh.vertices[vi], normals[vi])),
                    )
                })
                .collect(),
            None => mesh
                .faces
                .iter()
                .zip(mesh.calculate_face_normals())
                .map(|(face, normal)| {
                    SoupTriangle::new(face.map(|vi| NormalPoint3f::new(mesh.vertices[vi], normal)))
                })
                .collect(),
        };

        Ok(Self { triangles })
    }

    pub fn push(&mut self, triangle: SoupTriangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterate over every corner of every triangle, in ingestion order
    pub fn corners(&self) -> impl Iterator<Item = &NormalPoint3f> {
        self.triangles.iter().flat_map(|t| t.corners.iter())
    }
}
