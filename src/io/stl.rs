//! STL import and export for [`Mesh`]

use crate::errors::GridCutError;
use crate::float_types::Real;
use crate::mesh::{Face, Mesh};
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use std::io::{Cursor, Read, Seek};

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Read an ASCII or binary STL. `stl_io` merges coincident corners, so the result
    /// is an indexed triangle mesh whose faces share vertices.
    ///
    /// Every face gets `metadata`.
    pub fn from_stl<R: Read + Seek>(
        reader: &mut R,
        metadata: Option<S>,
    ) -> Result<Mesh<S>, GridCutError> {
        let stl = stl_io::read_stl(reader)?;

        #[allow(clippy::unnecessary_cast)]
        let vertices = stl
            .vertices
            .iter()
            .map(|v| Point3::new(v[0] as Real, v[1] as Real, v[2] as Real))
            .collect();
        let faces = stl
            .faces
            .iter()
            .map(|tri| Face::new(tri.vertices.to_vec(), metadata.clone()))
            .collect();

        Mesh::from_faces(vertices, faces)
    }

    /// Read an STL from an in-memory buffer
    pub fn from_stl_bytes(bytes: &[u8], metadata: Option<S>) -> Result<Mesh<S>, GridCutError> {
        Self::from_stl(&mut Cursor::new(bytes), metadata)
    }

    /// Triangulate every face into `[a, b, c]` position triples with the face's
    /// unit normal.
    fn facets(&self) -> Vec<(Vector3<Real>, [Point3<Real>; 3])> {
        self.faces
            .iter()
            .flat_map(|face| {
                let normal = face
                    .newell_normal(&self.vertices)
                    .try_normalize(Real::EPSILON)
                    .unwrap_or_else(Vector3::zeros);
                face.triangulate(&self.vertices)
                    .into_iter()
                    .map(move |tri| (normal, tri.map(|i| self.vertices[i])))
            })
            .collect()
    }

    /// Convert this Mesh to an **ASCII STL** string with the given `name`.
    ///
    /// ```rust
    /// # use gridcut::mesh::Mesh;
    /// let mesh = Mesh::<()>::cube(1.0, None);
    /// let text = mesh.to_stl_ascii("cell");
    /// assert!(text.starts_with("solid cell\n"));
    /// assert_eq!(text.matches("facet normal").count(), 12);
    /// ```
    pub fn to_stl_ascii(&self, name: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("solid {name}\n"));

        for (n, tri) in self.facets() {
            out.push_str(&format!(
                "  facet normal {:.6} {:.6} {:.6}\n",
                n.x, n.y, n.z
            ));
            out.push_str("    outer loop\n");
            for p in &tri {
                out.push_str(&format!(
                    "      vertex {:.6} {:.6} {:.6}\n",
                    p.x, p.y, p.z
                ));
            }
            out.push_str("    endloop\n");
            out.push_str("  endfacet\n");
        }

        out.push_str(&format!("endsolid {name}\n"));
        out
    }

    /// Convert this Mesh to a **binary STL** byte vector.
    ///
    /// Binary STL carries no solid name, so `_name` is unused; it is kept for
    /// symmetry with [`Mesh::to_stl_ascii`].
    pub fn to_stl_binary(&self, _name: &str) -> std::io::Result<Vec<u8>> {
        use stl_io::{Normal, Triangle, Vertex, write_stl};

        #[allow(clippy::unnecessary_cast)]
        let triangles: Vec<Triangle> = self
            .facets()
            .into_iter()
            .map(|(n, tri)| Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            })
            .collect();

        let mut cursor = Cursor::new(Vec::new());
        write_stl(&mut cursor, triangles.iter())?;
        Ok(cursor.into_inner())
    }
}
