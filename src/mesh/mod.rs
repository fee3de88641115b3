//! `Mesh` struct: editable indexed polygon geometry and its basic queries

use crate::errors::GridCutError;
use crate::float_types::{
    Real,
    parry3d::bounding_volume::Aabb,
};
use hashbrown::HashMap;
use nalgebra::{Matrix4, Point3, Translation3, Vector3};
use std::{fmt::Debug, sync::OnceLock};

pub mod bisect;
pub mod plane;
pub mod separate;
pub mod shapes;
pub mod split;
pub mod triangulate;

pub use bisect::BisectResult;

/// An undirected edge between two vertex indices, stored with the smaller index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    /// Canonical edge from two indices in any order
    #[inline]
    pub const fn new(a: usize, b: usize) -> Self {
        if a < b { Edge(a, b) } else { Edge(b, a) }
    }

    #[inline]
    pub const fn contains(&self, v: usize) -> bool {
        self.0 == v || self.1 == v
    }

    /// The endpoint that is not `v`
    #[inline]
    pub const fn other(&self, v: usize) -> usize {
        if self.0 == v { self.1 } else { self.0 }
    }
}

/// A polygon face, defined by an ordered loop of indices into the mesh's vertex array.
/// - `S` is the generic metadata type, stored as `Option<S>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Face<S: Clone> {
    /// Indices into the vertex array, counter-clockwise seen from the front
    pub indices: Vec<usize>,

    /// Generic metadata associated with the face, copied to every fragment when it is split
    pub metadata: Option<S>,
}

impl<S: Clone> Face<S> {
    pub const fn new(indices: Vec<usize>, metadata: Option<S>) -> Self {
        Face { indices, metadata }
    }

    /// Return an iterator over the loop's edges, closing back to the first corner
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.indices
            .iter()
            .zip(self.indices.iter().cycle().skip(1))
            .map(|(&a, &b)| Edge::new(a, b))
    }

    /// Face normal by Newell's method; robust for non-planar and non-convex loops.
    /// Not normalized, its length is twice the polygon area.
    pub fn newell_normal(&self, vertices: &[Point3<Real>]) -> Vector3<Real> {
        self.indices
            .iter()
            .zip(self.indices.iter().cycle().skip(1))
            .fold(Vector3::zeros(), |acc, (&a, &b)| {
                acc + vertices[a].coords.cross(&vertices[b].coords)
            })
    }
}

#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// Vertex positions in local space
    pub vertices: Vec<Point3<Real>>,

    /// Polygon faces indexing into `vertices`
    pub faces: Vec<Face<S>>,

    /// Lazily calculated AABB that spans `vertices`.
    pub bounding_box: OnceLock<Aabb>,
}

impl<S: Clone + Send + Sync + Debug> Default for Mesh<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// An empty mesh with no vertices and no faces
    pub const fn new() -> Self {
        Mesh {
            vertices: Vec::new(),
            faces: Vec::new(),
            bounding_box: OnceLock::new(),
        }
    }

    /// Build a mesh from vertices and faces, checking every face has at least three
    /// corners and only references existing vertices.
    pub fn from_faces(
        vertices: Vec<Point3<Real>>,
        faces: Vec<Face<S>>,
    ) -> Result<Self, GridCutError> {
        for (face_idx, face) in faces.iter().enumerate() {
            if face.indices.len() < 3 {
                return Err(GridCutError::DegenerateFace { face: face_idx });
            }
            if let Some(&index) = face.indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(GridCutError::IndexOutOfRange {
                    index,
                    len: vertices.len(),
                });
            }
        }

        Ok(Mesh {
            vertices,
            faces,
            bounding_box: OnceLock::new(),
        })
    }

    /// Build a triangle mesh, giving every face the same metadata
    pub fn from_triangles(
        vertices: Vec<Point3<Real>>,
        triangles: &[[usize; 3]],
        metadata: Option<S>,
    ) -> Result<Self, GridCutError> {
        let faces = triangles
            .iter()
            .map(|tri| Face::new(tri.to_vec(), metadata.clone()))
            .collect();
        Self::from_faces(vertices, faces)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when the mesh has no faces
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// All unique edges used by the faces, sorted
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.faces.iter().flat_map(|f| f.edges()).collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    /// Number of faces using each edge
    pub fn edge_face_counts(&self) -> HashMap<Edge, usize> {
        let mut counts: HashMap<Edge, usize> = HashMap::new();
        for face in &self.faces {
            for edge in face.edges() {
                *counts.entry(edge).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Checks that every edge is shared by exactly two faces, i.e. the surface
    /// has no boundary and no fins.
    pub fn is_closed(&self) -> bool {
        !self.faces.is_empty() && self.edge_face_counts().values().all(|&count| count == 2)
    }

    /// Axis aligned bounding box of the vertices (cached after first call).
    /// An empty mesh reports a degenerate box at the origin.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let Some(first) = self.vertices.first() else {
                return Aabb::new(Point3::origin(), Point3::origin());
            };
            let (mins, maxs) = self.vertices.iter().skip(1).fold(
                (*first, *first),
                |(mins, maxs), v| (mins.inf(v), maxs.sup(v)),
            );
            Aabb::new(mins, maxs)
        })
    }

    /// Reset cached AABB.
    pub fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Apply a 4×4 affine transform to every vertex in place.
    pub fn transform(&mut self, mat: &Matrix4<Real>) {
        for v in &mut self.vertices {
            // If homogeneous w is invalid, fall back to original position.
            *v = Point3::from_homogeneous(mat * v.to_homogeneous()).unwrap_or(*v);
        }
        self.invalidate_bounding_box();
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: Vector3<Real>) {
        self.transform(&Translation3::from(offset).to_homogeneous());
    }

    /// Drop vertices that no face references and renumber the rest, keeping their order.
    pub fn remove_unused_vertices(&mut self) {
        let mut remap = vec![usize::MAX; self.vertices.len()];
        for face in &self.faces {
            for &i in &face.indices {
                remap[i] = 0;
            }
        }

        let mut kept = Vec::with_capacity(self.vertices.len());
        for (old, slot) in remap.iter_mut().enumerate() {
            if *slot != usize::MAX {
                *slot = kept.len();
                kept.push(self.vertices[old]);
            }
        }

        for face in &mut self.faces {
            for i in &mut face.indices {
                *i = remap[*i];
            }
        }
        self.vertices = kept;
        self.invalidate_bounding_box();
    }
}
