// Module declarations
pub mod account_service;
pub mod auth_service;
pub mod avatar_service;
pub mod directory_service;

// Public re-exports
pub use account_service::AccountService;
pub use auth_service::AuthService;
pub use avatar_service::AvatarService;
pub use directory_service::DirectoryService;

use std::future::Future;
use std::time::Duration;

use crate::error::{IdentityError, Result};

/// Run a collaborator call under a bounded timeout.
///
/// Timeouts surface as a retryable `Timeout`; retrying is the caller's
/// decision, never automatic.
pub(crate) async fn bounded<T, E, F>(what: &str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: Into<IdentityError>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(IdentityError::Timeout(format!(
            "{} timed out after {:?}",
            what, limit
        ))),
    }
}
