//! Loose-part separation: one mesh per connected component.

use crate::mesh::Mesh;
use hashbrown::HashMap;
use std::fmt::Debug;
use std::sync::OnceLock;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Union–find over `0..n` with path halving and union by size.
#[derive(Debug, Clone)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        DisjointSet {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub(crate) fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Face indices grouped by connected component; faces are connected when they
    /// share a vertex. Components are ordered by their lowest face index and list
    /// faces in mesh order.
    pub fn loose_parts(&self) -> Vec<Vec<usize>> {
        let mut sets = DisjointSet::new(self.vertices.len());
        for face in &self.faces {
            for pair in face.indices.windows(2) {
                sets.union(pair[0], pair[1]);
            }
        }

        let mut component_of_root: HashMap<usize, usize> = HashMap::new();
        let mut parts: Vec<Vec<usize>> = Vec::new();
        for (face_idx, face) in self.faces.iter().enumerate() {
            let Some(&first) = face.indices.first() else {
                continue;
            };
            let root = sets.find(first);
            let part = *component_of_root.entry(root).or_insert_with(|| {
                parts.push(Vec::new());
                parts.len() - 1
            });
            parts[part].push(face_idx);
        }
        parts
    }

    /// Split the mesh into one mesh per loose part (see [`Mesh::loose_parts`]).
    ///
    /// Each part gets a compacted vertex array that keeps the original vertex order.
    /// Vertices not used by any face are dropped. An empty mesh yields no parts.
    pub fn separate_loose(&self) -> Vec<Mesh<S>> {
        let parts = self.loose_parts();
        debug!(parts = parts.len(), faces = self.faces.len(), "separating loose parts");

        #[cfg(feature = "parallel")]
        {
            parts
                .into_par_iter()
                .map(|face_ids| self.extract_part(face_ids))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            parts
                .into_iter()
                .map(|face_ids| self.extract_part(face_ids))
                .collect()
        }
    }

    /// Copy the given faces into a new mesh holding only the vertices they use.
    fn extract_part(&self, face_ids: Vec<usize>) -> Mesh<S> {
        let mut used: Vec<usize> = face_ids
            .iter()
            .flat_map(|&i| self.faces[i].indices.iter().copied())
            .collect();
        used.sort_unstable();
        used.dedup();
        let remap: HashMap<usize, usize> =
            used.iter().enumerate().map(|(new, &old)| (old, new)).collect();

        Mesh {
            vertices: used.iter().map(|&i| self.vertices[i]).collect(),
            faces: face_ids
                .into_iter()
                .map(|i| {
                    let mut face = self.faces[i].clone();
                    face.indices.iter_mut().for_each(|v| *v = remap[&*v]);
                    face
                })
                .collect(),
            bounding_box: OnceLock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_set_merges_transitively() {
        let mut sets = DisjointSet::new(5);
        sets.union(0, 1);
        sets.union(3, 4);
        sets.union(1, 4);
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(0), sets.find(2));
    }

    #[test]
    fn separate_two_cubes() {
        let mut a: Mesh<u8> = Mesh::cube(1.0, Some(1));
        let mut b: Mesh<u8> = Mesh::cube(1.0, Some(2));
        b.translate(nalgebra::Vector3::new(3.0, 0.0, 0.0));

        let offset = a.vertices.len();
        a.vertices.extend(b.vertices.iter().copied());
        a.faces.extend(b.faces.drain(..).map(|mut f| {
            f.indices.iter_mut().for_each(|i| *i += offset);
            f
        }));

        let parts = a.separate_loose();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.vertex_count() == 8 && p.face_count() == 6));
        assert!(parts.iter().all(|p| p.is_closed()));
        assert_eq!(parts[0].faces[0].metadata, Some(1));
        assert_eq!(parts[1].faces[0].metadata, Some(2));
        assert_eq!(parts[1].bounding_box().mins.x, 3.0);
    }
}
