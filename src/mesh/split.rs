//! Edge splitting: tear the surface open along a set of edges.

use crate::mesh::separate::DisjointSet;
use crate::mesh::{Edge, Mesh};
use hashbrown::{HashMap, HashSet};
use std::fmt::Debug;
use tracing::debug;

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Split the mesh along `edges` so faces on either side of them no longer share
    /// vertices.
    ///
    /// Around every endpoint, faces stay attached only through edges that are not
    /// being split. Each separate fan of faces beyond the first gets its own copy of
    /// the vertex. Edges that no face uses are ignored.
    ///
    /// Returns the number of vertices created.
    pub fn split_edges(&mut self, edges: &[Edge]) -> usize {
        let split: HashSet<Edge> = edges.iter().copied().collect();
        if split.is_empty() {
            return 0;
        }
        let touched: HashSet<usize> = split.iter().flat_map(|e| [e.0, e.1]).collect();

        // Corners (face, position in loop) sitting on each touched vertex
        let mut corners: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
        for (face_idx, face) in self.faces.iter().enumerate() {
            for (pos, v) in face.indices.iter().enumerate() {
                if touched.contains(v) {
                    corners.entry(*v).or_default().push((face_idx, pos));
                }
            }
        }

        // Visit vertices in index order so the copies are numbered deterministically.
        let mut vertex_order: Vec<usize> = corners.keys().copied().collect();
        vertex_order.sort_unstable();

        // Fans are found on the unmodified faces; the rewrites are applied in one pass.
        let mut created = 0;
        let mut rewrites: Vec<(usize, usize, usize)> = Vec::new();
        for v in vertex_order {
            let fan = &corners[&v];
            if fan.len() < 2 {
                continue;
            }

            let mut groups = DisjointSet::new(fan.len());
            let mut edge_owner: HashMap<Edge, usize> = HashMap::new();
            for (corner, &(face_idx, pos)) in fan.iter().enumerate() {
                let indices = &self.faces[face_idx].indices;
                let n = indices.len();
                let prev = indices[(pos + n - 1) % n];
                let next = indices[(pos + 1) % n];
                for edge in [Edge::new(v, prev), Edge::new(v, next)] {
                    if split.contains(&edge) {
                        continue;
                    }
                    match edge_owner.get(&edge) {
                        Some(&other) => groups.union(corner, other),
                        None => {
                            edge_owner.insert(edge, corner);
                        }
                    }
                }
            }

            // The first group keeps the original vertex.
            let mut group_vertex: HashMap<usize, usize> = HashMap::new();
            for (corner, &(face_idx, pos)) in fan.iter().enumerate() {
                let root = groups.find(corner);
                let target = match group_vertex.get(&root) {
                    Some(&target) => target,
                    None => {
                        let target = if group_vertex.is_empty() {
                            v
                        } else {
                            self.vertices.push(self.vertices[v]);
                            created += 1;
                            self.vertices.len() - 1
                        };
                        group_vertex.insert(root, target);
                        target
                    }
                };
                if target != v {
                    rewrites.push((face_idx, pos, target));
                }
            }
        }

        for (face_idx, pos, target) in rewrites {
            self.faces[face_idx].indices[pos] = target;
        }

        debug!(edges = split.len(), created, "split edges");
        created
    }
}
