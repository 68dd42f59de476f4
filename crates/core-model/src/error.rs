//! Pipeline error taxonomy. `InvalidCad`, `Timeout` and `Cancelled` are the
//! variants callers should handle; the rest are internal and get absorbed
//! into warnings before `analyze()` returns.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid CAD input: {0}")]
    InvalidCad(String),

    #[error("analysis exceeded its deadline")]
    Timeout,

    #[error("analysis was cancelled")]
    Cancelled,

    #[error("degenerate geometry on layer {layer}: {reason}")]
    GeometryDegenerate { layer: String, reason: String },

    #[error("unsupported entity type: {0}")]
    EntityUnsupported(String),
}

impl PipelineError {
    /// Internal, non-fatal variants get downgraded to a warning string
    /// rather than aborting the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::GeometryDegenerate { .. } | PipelineError::EntityUnsupported(_)
        )
    }
}
