use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::openai::OpenAiError;
use crate::workflow::ApplicationStatus;

/// Errors surfaced by workflow engine operations.
///
/// `Generation` and `InvalidSchedule` are recovered inside the engine
/// (fallback letter, reconciliation scan) and never reach the caller of the
/// public operations; the remaining variants are returned as-is.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no workflow found for application {0}")]
    NotFound(String),

    #[error("a workflow already exists for application {0}")]
    DuplicateWorkflow(String),

    #[error("application {id} is archived; cannot transition to {requested}")]
    InvalidTransition {
        id: String,
        requested: ApplicationStatus,
    },

    #[error("timer target {at} is not in the future (now: {now})")]
    InvalidSchedule {
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("cover letter generation failed: {0}")]
    Generation(#[from] OpenAiError),
}
