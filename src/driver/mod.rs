//! CLI driver: single-file, batch, and evaluation modes over the
//! simplification core.
//!
//! Grounded in the teacher's `io::batch::BatchConverter` (rayon-parallel
//! per-file conversion, `thiserror` error enum) and `main.rs` (panic hook,
//! `RUST_LOG`-driven `env_logger` setup) — the teacher has no CLI of its
//! own, so the `clap::Subcommand` surface is grounded on
//! `astraweave-secrets`'s `aw_secrets` binary instead.

pub mod batch;
pub mod eval;
pub mod single;

use thiserror::Error;

use crate::io::MeshFormatError;
use crate::mesh::MeshError;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Format(#[from] MeshFormatError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no input files found in {0}")]
    EmptyBatch(String),

    #[error("neither --target nor --ratio was given")]
    MissingReductionSpec,

    #[error("ratio must be in (0, 1], got {0}")]
    InvalidRatio(f64),
}

pub use batch::run_batch;
pub use eval::run_eval;
pub use single::run_simplify;

/// Computes the target vertex count from an explicit target or a ratio of
/// the current vertex count, per the `simplify` subcommand's contract.
pub(crate) fn resolve_target(
    current: usize,
    target: Option<usize>,
    ratio: Option<f64>,
) -> Result<usize, DriverError> {
    if let Some(t) = target {
        return Ok(t);
    }
    if let Some(r) = ratio {
        if r <= 0.0 || r > 1.0 {
            return Err(DriverError::InvalidRatio(r));
        }
        return Ok((current as f64 * r).round() as usize);
    }
    Err(DriverError::MissingReductionSpec)
}
