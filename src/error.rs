use crate::config::ConfigurationError;
use crate::service::ServiceError;
use crate::workflow::WorkflowError;
use thiserror::Error;

/// Crate-level error unifying the library's failure domains.
#[derive(Debug, Error)]
pub enum CondoError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

pub type Result<T> = std::result::Result<T, CondoError>;
