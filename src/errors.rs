//! Errors raised by mesh editing and the grid-cut pipeline

use crate::float_types::Real;

/// All the ways a grid cut can fail.
///
/// Each variant corresponds to a condition the cutting pipeline cannot work
/// around; the first one encountered aborts the operation.
#[derive(Debug, thiserror::Error)]
pub enum GridCutError {
    /// (NoActiveObject) The scene has no active object to operate on
    #[error("(NoActiveObject) The scene has no active object")]
    NoActiveObject,
    /// (NotAMesh) The object holds something other than mesh data
    #[error("(NotAMesh) Object '{name}' is not a mesh")]
    NotAMesh { name: String },
    /// (EmptySelection) No objects are selected
    #[error("(EmptySelection) No objects are selected")]
    EmptySelection,
    /// (InvalidRange) A cut range with a zero step never terminates
    #[error("(InvalidRange) Cut range {start}..{stop} has a zero step")]
    InvalidRange { start: i64, stop: i64 },
    /// (IndexOutOfRange) A face references a vertex that does not exist
    #[error("(IndexOutOfRange) Vertex index {index} is out of range (vertices.len = {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// (DegenerateFace) A face has fewer than three corners
    #[error("(DegenerateFace) Face {face} has fewer than 3 vertices")]
    DegenerateFace { face: usize },
    /// (SingularTransform) A transform cannot be inverted, e.g. a zero scale axis
    #[error("(SingularTransform) Object '{name}' has a non-invertible transform (scale {scale})")]
    SingularTransform { name: String, scale: Real },
    /// Error bubbled up while reading or writing mesh files
    #[error("std::io::Error: {0}")]
    Io(#[from] std::io::Error),
}
