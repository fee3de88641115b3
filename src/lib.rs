//! Slice a mesh along axis-aligned planes at integer coordinates into a grid of
//! disconnected cell pieces, then move each piece's pivot onto its grid cell.
//!
//! The pipeline mirrors a classic modelling-tool workflow:
//! 1. apply pending object transforms,
//! 2. bisect along X, Y and Z at every offset of a [`CutRange`], splitting the cut edges,
//! 3. separate the result into loose parts,
//! 4. set each part's origin to the floor of its bounding-box center.
//!
//! ```
//! use gridcut::{CutRange, Object, Scene, grid_cut, mesh::Mesh};
//!
//! let mut scene: Scene<()> = Scene::new();
//! let cube = Mesh::cuboid(1.5, 1.5, 1.5, None);
//! let id = scene.add_object(Object::new_mesh("Cube", cube));
//! scene.select(id);
//!
//! let report = grid_cut(&mut scene, CutRange::default()).unwrap();
//! assert!(report.pieces.len() > 1);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for multithreading

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod grid_cut;
pub mod io;
pub mod mesh;
pub mod object;
pub mod scene;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::GridCutError;
pub use grid_cut::{Axis, CutRange, GridCut, GridCutReport, Piece, cut, fix_pivots, grid_cut, perform_cuts};
pub use object::{ApplyTransform, Object, ObjectData, Transform};
pub use scene::{ObjectId, Scene};
