pub mod auth_service;
pub mod catalog_service;
pub mod order_service;
pub mod payment_handoff;
pub mod payment_reconciler;

use crate::domain::errors::DomainError;

/// Run blocking repository work off the async executor.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, DomainError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
}
