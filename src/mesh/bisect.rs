//! Plane bisection: cut every face crossing a plane, keeping all pieces in one mesh.

use crate::float_types::Real;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane, SPANNING};
use crate::mesh::{Edge, Face, Mesh};
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use tracing::{debug, warn};

/// Geometry touched by a [`Mesh::bisect_plane`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BisectResult {
    /// Vertices lying on the plane, both newly created and pre-existing
    pub verts_cut: Vec<usize>,
    /// Edges lying on the plane, both newly created and pre-existing
    pub edges_cut: Vec<Edge>,
    /// Number of vertices inserted on crossing edges
    pub created_vertices: usize,
    /// Number of faces that were split into two or more fragments
    pub split_faces: usize,
}

impl BisectResult {
    /// True if the plane touched any geometry
    pub fn is_empty(&self) -> bool {
        self.verts_cut.is_empty() && self.edges_cut.is_empty()
    }
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Cut the mesh with `plane`.
    ///
    /// Every edge whose endpoints lie strictly on opposite sides receives one new
    /// vertex on the plane, shared by all faces using that edge. Faces with corners
    /// on both sides are split along the plane; each fragment keeps the face metadata.
    /// Faces that only touch the plane are left as they are.
    ///
    /// Nothing is disconnected here: fragments on either side still share the cut
    /// vertices. Use [`Mesh::split_edges`] on [`BisectResult::edges_cut`] for that.
    pub fn bisect_plane(&mut self, plane: &Plane) -> BisectResult {
        let mut sides: Vec<i8> = self
            .vertices
            .iter()
            .map(|v| plane.orient_point(v))
            .collect();

        let spans = sides.contains(&FRONT) && sides.contains(&BACK);
        let mut created_vertices = 0;
        let mut split_faces = 0;

        if spans {
            let mut edge_cache: HashMap<Edge, usize> = HashMap::new();
            let faces = std::mem::take(&mut self.faces);
            let mut new_faces = Vec::with_capacity(faces.len());

            for face in faces {
                let mut loop_indices = Vec::with_capacity(face.indices.len() + 2);
                let mut face_type = 0;

                for (k, &i) in face.indices.iter().enumerate() {
                    let j = face.indices[(k + 1) % face.indices.len()];
                    face_type |= sides[i];
                    loop_indices.push(i);

                    if (sides[i] | sides[j]) == SPANNING {
                        let edge = Edge::new(i, j);
                        let new_idx = *edge_cache.entry(edge).or_insert_with(|| {
                            let p = Self::edge_plane_point(plane, &self.vertices, edge);
                            self.vertices.push(p);
                            sides.push(COPLANAR);
                            created_vertices += 1;
                            self.vertices.len() - 1
                        });
                        loop_indices.push(new_idx);
                    }
                }

                if face_type == SPANNING {
                    let fragments = Self::split_loop(
                        plane,
                        &self.vertices,
                        &sides,
                        &loop_indices,
                        face.newell_normal(&self.vertices),
                    );
                    if fragments.len() > 1 {
                        split_faces += 1;
                    }
                    new_faces.extend(
                        fragments
                            .into_iter()
                            .map(|indices| Face::new(indices, face.metadata.clone())),
                    );
                } else {
                    new_faces.push(Face::new(loop_indices, face.metadata));
                }
            }

            self.faces = new_faces;
            self.invalidate_bounding_box();
        }

        let mut used = vec![false; self.vertices.len()];
        for face in &self.faces {
            for &i in &face.indices {
                used[i] = true;
            }
        }
        let verts_cut: Vec<usize> = (0..self.vertices.len())
            .filter(|&i| used[i] && sides[i] == COPLANAR)
            .collect();
        let edges_cut: Vec<Edge> = self
            .edges()
            .into_iter()
            .filter(|e| sides[e.0] == COPLANAR && sides[e.1] == COPLANAR)
            .collect();

        debug!(
            normal = ?plane.normal(),
            offset = plane.offset(),
            created_vertices,
            split_faces,
            edges_cut = edges_cut.len(),
            "bisected mesh"
        );

        BisectResult {
            verts_cut,
            edges_cut,
            created_vertices,
            split_faces,
        }
    }

    /// Point where `edge` meets `plane`, snapped onto the plane.
    /// Always interpolates from the lower index so the result does not depend on
    /// which face reached the edge first.
    fn edge_plane_point(plane: &Plane, vertices: &[Point3<Real>], edge: Edge) -> Point3<Real> {
        let a = vertices[edge.0];
        let b = vertices[edge.1];
        let da = plane.signed_distance(&a);
        let db = plane.signed_distance(&b);
        let t = da / (da - db);
        let p = a + (b - a) * t;
        p - plane.normal() * plane.signed_distance(&p)
    }

    /// Split one polygon loop whose corners lie on both sides of the plane.
    ///
    /// `loop_indices` already contains a vertex on every crossing edge. The corners
    /// where the boundary passes through the plane are sorted along the cut line
    /// (`plane.normal × face_normal`) and joined pairwise, so non-convex loops that
    /// cross the plane several times are split into every piece.
    fn split_loop(
        plane: &Plane,
        vertices: &[Point3<Real>],
        sides: &[i8],
        loop_indices: &[usize],
        face_normal: Vector3<Real>,
    ) -> Vec<Vec<usize>> {
        let n = loop_indices.len();
        let side_at = |k: usize| sides[loop_indices[k % n]];

        // Walk runs of on-plane corners and keep the ones where the boundary changes side.
        let mut crossings: Vec<usize> = Vec::new();
        let Some(start) = (0..n).find(|&k| side_at(k) != COPLANAR) else {
            return vec![loop_indices.to_vec()];
        };
        let mut k = start + 1;
        while k < start + n {
            if side_at(k) != COPLANAR {
                k += 1;
                continue;
            }
            let run_first = k;
            while side_at(k) == COPLANAR {
                k += 1;
            }
            let run_last = k - 1;
            let before = side_at(run_first + n - 1);
            let after = side_at(k);
            if before == after {
                continue;
            }

            let crossing = if run_first == run_last {
                run_first
            } else {
                // Boundary runs along the plane; the cut leaves from the end of the
                // run that borders the interior on the far side.
                let a = vertices[loop_indices[run_first % n]];
                let b = vertices[loop_indices[run_last % n]];
                let inward = face_normal.cross(&(b - a));
                let interior = Plane::classify_distance(plane.normal().dot(&inward));
                if interior == before { run_last } else { run_first }
            };
            crossings.push(loop_indices[crossing % n]);
        }

        if crossings.len() < 2 {
            return vec![loop_indices.to_vec()];
        }
        if crossings.len() % 2 == 1 {
            warn!(
                crossings = crossings.len(),
                "odd number of plane crossings in face, ignoring the last one"
            );
            crossings.pop();
        }

        let direction = plane.normal().cross(&face_normal);
        crossings.sort_by(|&a, &b| {
            direction
                .dot(&vertices[a].coords)
                .total_cmp(&direction.dot(&vertices[b].coords))
        });

        let mut pieces: Vec<Vec<usize>> = vec![loop_indices.to_vec()];
        for pair in crossings.chunks_exact(2) {
            let (a, b) = (pair[0], pair[1]);
            let Some(piece_idx) = pieces
                .iter()
                .position(|p| p.contains(&a) && p.contains(&b))
            else {
                continue;
            };
            if let Some((left, right)) = Self::cut_loop(&pieces[piece_idx], a, b) {
                pieces[piece_idx] = left;
                pieces.push(right);
            }
        }

        pieces.retain(|p| {
            if p.len() < 3 {
                warn!(len = p.len(), "dropping degenerate face fragment");
                return false;
            }
            true
        });
        pieces
    }

    /// Cut a loop along the chord between corners `a` and `b`.
    /// Returns `None` when they are the same corner or already neighbours.
    fn cut_loop(loop_indices: &[usize], a: usize, b: usize) -> Option<(Vec<usize>, Vec<usize>)> {
        let n = loop_indices.len();
        let pa = loop_indices.iter().position(|&v| v == a)?;
        let pb = loop_indices.iter().position(|&v| v == b)?;
        let (lo, hi) = if pa < pb { (pa, pb) } else { (pb, pa) };
        if hi - lo < 2 || lo + n - hi < 2 {
            return None;
        }

        let left = loop_indices[lo..=hi].to_vec();
        let right = loop_indices[hi..]
            .iter()
            .chain(loop_indices[..=lo].iter())
            .copied()
            .collect();
        Some((left, right))
    }
}
