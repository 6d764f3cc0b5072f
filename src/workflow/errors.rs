use thiserror::Error;

/// Errors raised by the dialog state machine and confirmation gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("invalid transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    #[error("a confirmation prompt is already open")]
    PromptAlreadyOpen,

    #[error("the dialog is busy saving")]
    Busy,
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl WorkflowError {
    /// Create an invalid transition error from a state and the event that
    /// was rejected in it
    pub fn invalid_transition(from: impl ToString, event: impl std::fmt::Debug) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            event: format!("{event:?}"),
        }
    }
}
