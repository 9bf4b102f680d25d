use shared::error::InputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("a sort is already running; wait for it to finish")]
    AlreadyRunning,
    #[error("sort task ended abnormally: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl SessionError {
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionError::AlreadyRunning)
    }
}
