//! Primitive shapes for building test and demo meshes

use crate::float_types::Real;
use crate::mesh::{Face, Mesh};
use nalgebra::Point3;
use std::{fmt::Debug, sync::OnceLock};

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Create an axis-aligned box with one corner at the origin, spanning
    /// `[0, width] × [0, length] × [0, height]`.
    ///
    /// The eight corners are shared by the six quad faces, so the result is a
    /// closed surface.
    pub fn cuboid(width: Real, length: Real, height: Real, metadata: Option<S>) -> Mesh<S> {
        // Define the eight corner vertices once
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),          // 0: origin
            Point3::new(width, 0.0, 0.0),        // 1: +X
            Point3::new(width, length, 0.0),     // 2: +X+Y
            Point3::new(0.0, length, 0.0),       // 3: +Y
            Point3::new(0.0, 0.0, height),       // 4: +Z
            Point3::new(width, 0.0, height),     // 5: +X+Z
            Point3::new(width, length, height),  // 6: +X+Y+Z
            Point3::new(0.0, length, height),    // 7: +Y+Z
        ];

        // Faces with CCW winding seen from outside
        let face_definitions = [
            [0, 3, 2, 1], // Bottom face
            [4, 5, 6, 7], // Top face
            [0, 1, 5, 4], // Front face
            [3, 7, 6, 2], // Back face
            [0, 4, 7, 3], // Left face
            [1, 2, 6, 5], // Right face
        ];

        let faces = face_definitions
            .iter()
            .map(|indices| Face::new(indices.to_vec(), metadata.clone()))
            .collect();

        Mesh {
            vertices,
            faces,
            bounding_box: OnceLock::new(),
        }
    }

    pub fn cube(size: Real, metadata: Option<S>) -> Mesh<S> {
        Self::cuboid(size, size, size, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn cuboid_is_closed_and_outward_facing() {
        let mesh: Mesh<()> = Mesh::cuboid(2.0, 1.0, 3.0, None);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.edges().len(), 12);
        assert!(mesh.is_closed());

        let center = Vector3::new(1.0, 0.5, 1.5);
        for face in &mesh.faces {
            let n = face.newell_normal(&mesh.vertices);
            let on_face = mesh.vertices[face.indices[0]].coords;
            assert!(n.dot(&(on_face - center)) > 0.0, "face {:?} points inward", face.indices);
        }
    }
}
