//! Errors surfaced by a brand research run.
use crate::transport::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResearchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered but reported `success: false` for a stage.
    #[error("Node {stage} execution failed: {message}")]
    StageFailed { stage: String, message: String },

    #[error("brand research workflow was not started: {message}")]
    StartRejected { message: String },

    #[error("start response did not include an execution_id")]
    MissingExecutionId,

    #[error("brand research service unavailable")]
    ServiceUnavailable,
}
