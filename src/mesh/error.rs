//! Error types raised by the mesh graph's public API.
//!
//! These only fire on programmer-error paths — an out-of-range handle
//! reaching a public method. The contraction loop itself never triggers
//! them since it only ever touches handles it produced.

use thiserror::Error;

use super::handle::{EdgeId, FaceId, VertexId};

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("invalid vertex id: {0}")]
    InvalidVertexId(VertexId),

    #[error("invalid edge id: {0}")]
    InvalidEdgeId(EdgeId),

    #[error("invalid face id: {0}")]
    InvalidFaceId(FaceId),
}
