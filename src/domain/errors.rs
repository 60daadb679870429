use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Verification(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Stable name of the error class, rendered to clients next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "ValidationError",
            DomainError::NotFound(_) => "NotFoundError",
            DomainError::Configuration(_) => "ConfigurationError",
            DomainError::Verification(_) => "VerificationError",
            DomainError::ServiceUnavailable(_) => "ServiceUnavailable",
            DomainError::Unauthorized(_) => "Unauthorized",
            DomainError::Internal(_) => "Internal",
        }
    }
}
