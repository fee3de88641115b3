//! Ear-clipping triangulation of face loops

use super::Face;
use crate::float_types::Real;
use geo::{LineString, Polygon as GeoPolygon, TriangulateEarcut, coord};
use nalgebra::{Point3, Vector3};

impl<S: Clone> Face<S> {
    /// Triangulate the loop into vertex index triples wound the same way as the face.
    ///
    /// The loop is projected onto its Newell plane and ear-clipped, so concave faces
    /// (an L or U left by cutting through a notch) come out without overlap. A loop
    /// with no area falls back to a fan from the first corner.
    pub fn triangulate(&self, vertices: &[Point3<Real>]) -> Vec<[usize; 3]> {
        let n = self.indices.len();
        if n < 3 {
            return Vec::new();
        }
        if n == 3 {
            return vec![[self.indices[0], self.indices[1], self.indices[2]]];
        }

        let Some(normal) = self.newell_normal(vertices).try_normalize(Real::EPSILON) else {
            return self.fan();
        };
        let (u, v) = build_orthonormal_basis(normal);
        let origin = vertices[self.indices[0]];
        let ring: Vec<_> = self
            .indices
            .iter()
            .map(|&i| {
                let offset = vertices[i] - origin;
                coord! { x: offset.dot(&u), y: offset.dot(&v) }
            })
            .collect();

        let raw = GeoPolygon::new(LineString::new(ring), Vec::new()).earcut_triangles_raw();
        // The closed ring repeats the first corner at index n
        let triangles: Vec<[usize; 3]> = raw
            .triangle_indices
            .chunks_exact(3)
            .map(|t| {
                let [a, b, c] = [t[0] % n, t[1] % n, t[2] % n].map(|k| self.indices[k]);
                let area = (vertices[b] - vertices[a]).cross(&(vertices[c] - vertices[a]));
                if area.dot(&normal) < 0.0 { [a, c, b] } else { [a, b, c] }
            })
            .collect();

        if triangles.is_empty() {
            self.fan()
        } else {
            triangles
        }
    }

    fn fan(&self) -> Vec<[usize; 3]> {
        let first = self.indices[0];
        self.indices[1..]
            .windows(2)
            .map(|pair| [first, pair[0], pair[1]])
            .collect()
    }
}

/// Two unit vectors spanning the plane with normal `n`, with `u × v = n`
fn build_orthonormal_basis(n: Vector3<Real>) -> (Vector3<Real>, Vector3<Real>) {
    let other = if n.x.abs() < n.y.abs() && n.x.abs() < n.z.abs() {
        Vector3::x()
    } else if n.y.abs() < n.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };

    let v = n.cross(&other).normalize();
    let u = v.cross(&n).normalize();
    (u, v)
}
