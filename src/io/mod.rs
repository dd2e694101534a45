//! I/O adapters: reading and writing the mesh interchange format.

pub mod format;

pub use format::{MeshFormatError, MeshReader, MeshWriter};
