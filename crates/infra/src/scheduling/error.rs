//! Scheduler error types

use thiserror::Error;
use tokio::task::JoinError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A background task panicked
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),

    /// A background task was aborted before it finished
    #[error("Task was cancelled before completion")]
    TaskCancelled,
}

impl From<JoinError> for SchedulerError {
    fn from(err: JoinError) -> Self {
        if err.is_cancelled() {
            SchedulerError::TaskCancelled
        } else {
            SchedulerError::TaskJoinFailed(err.to_string())
        }
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
