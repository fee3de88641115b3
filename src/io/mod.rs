//! Mesh file import/export. Formats are behind cargo feature-flags.

#[cfg(feature = "stl-io")]
pub mod stl;
