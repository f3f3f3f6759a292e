//! Core traits for hdscrate

use crate::{mesh::*, point::*, soup::*};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }
}

fn bounds_of<'a>(mut points: impl Iterator<Item = &'a Point3f>) -> (Point3f, Point3f) {
    let Some(first) = points.next() else {
        return (Point3f::origin(), Point3f::origin());
    };

    let mut min = *first;
    let mut max = *first;

    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);

        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }

    (min, max)
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(self.vertices.iter())
    }
}

impl Drawable for TriangleSoup {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(self.corners().map(|c| &c.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soup_bounding_box() {
        let soup = TriangleSoup::from_triangles(vec![
            SoupTriangle::flat([
                Point3f::new(-1.0, 0.0, 0.0),
                Point3f::new(1.0, 2.0, 0.0),
                Point3f::new(0.0, 0.0, 3.0),
            ]),
        ]);
        let (min, max) = soup.bounding_box();
        assert_eq!(min, Point3f::new(-1.0, 0.0, 0.0));
        assert_eq!(max, Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(soup.center(), Point3f::new(0.0, 1.0, 1.5));
    }

    #[test]
    fn test_empty_bounding_box() {
        let mesh = TriangleMesh::new();
        assert_eq!(mesh.bounding_box(), (Point3f::origin(), Point3f::origin()));
    }
}
