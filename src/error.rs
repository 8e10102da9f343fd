//! Crate error type.
//!
//! Two failure classes exist, mirroring the pipeline's error contract:
//! configuration problems surface at construction time, stage problems
//! surface from [`Pipeline::run`](crate::Pipeline::run) and abort the whole
//! run. Degraded-but-working paths (unavailable English backend, a quote
//! pattern that fails to compile) are not errors; they log and continue.

use thiserror::Error;

/// Convenience alias used across the crate's public API.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The homophone map could not be loaded: missing file or malformed
    /// JSON. Raised while the pipeline is being built, never deferred to
    /// the first run — homophone replacement must be deterministic, so a
    /// silently empty map is not an acceptable fallback.
    #[error("homophone map: {reason}")]
    HomophoneMap { reason: anyhow::Error },

    /// A stage failed mid-run. The run is aborted as a whole and no
    /// partial output is returned.
    #[error("stage `{stage}` failed: {reason}")]
    Stage { stage: String, reason: anyhow::Error },
}

impl Error {
    /// Name of the failing stage, when this is a stage failure.
    pub fn stage_name(&self) -> Option<&str> {
        match self {
            Error::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }
}
