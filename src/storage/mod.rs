pub mod media;
pub mod memory;

pub use media::{LocalMediaStorage, MediaStorage, MediaStream};
pub use memory::MemoryStorage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::account::Account;

/// Storage Result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Error types for store operations
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store's atomic uniqueness constraint rejected a write
    #[error("Unique constraint violated on {field}")]
    UniqueViolation { field: String },

    /// Schema-level rejection (required field, malformed value)
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Connection(_) | StorageError::Timeout(_))
    }

    /// Get error category for metrics
    pub fn category(&self) -> &'static str {
        match self {
            StorageError::NotFound(_) => "not_found",
            StorageError::UniqueViolation { .. } => "unique_violation",
            StorageError::Validation(_) => "validation",
            StorageError::Connection(_) => "connection",
            StorageError::Timeout(_) => "timeout",
            StorageError::Internal(_) => "internal",
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            std::io::ErrorKind::TimedOut => Self::Timeout(err.to_string()),
            _ => Self::Internal(format!("I/O error: {}", err)),
        }
    }
}

/// Filter, sort and pagination parameters for directory queries.
///
/// `search` matches case-insensitive substrings over name, username, email and
/// phone; pages are 1-indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountQuery {
    pub limit: u32,
    pub page: u32,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub order_desc: bool,
}

impl Default for AccountQuery {
    fn default() -> Self {
        Self {
            limit: crate::constants::DEFAULT_PAGE_SIZE,
            page: 1,
            search: None,
            order_by: None,
            order_desc: false,
        }
    }
}

/// One page of raw account rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountPage {
    pub accounts: Vec<Account>,
    /// size of the full filtered set
    pub total: u64,
    /// 1-indexed page number
    pub page: u32,
}

/// Persistent store interface for account records.
///
/// Lookups and listings exclude soft-deleted accounts. Uniqueness of username
/// and email is enforced atomically at write time; callers rely on
/// `UniqueViolation` instead of check-then-write.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Health check with connection validation
    async fn health_check(&self) -> Result<bool>;

    /// Close all connections gracefully
    async fn close(&self) -> Result<()>;

    /// Persist a new account
    async fn create_account(&self, account: &Account) -> Result<()>;

    /// Get account by ID
    async fn get_account(&self, id: &str) -> Result<Option<Account>>;

    /// Get account by username
    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>>;

    /// Get account by email
    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Replace an existing account record
    async fn update_account(&self, account: &Account) -> Result<()>;

    /// Flip the active flag
    async fn set_active(&self, id: &str, active: bool) -> Result<()>;

    /// Replace the stored password hash
    async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<()>;

    /// Record the avatar filename and public URL
    async fn set_avatar(&self, id: &str, filename: &str, url: &str) -> Result<()>;

    /// Soft-delete: hide the account from lookups and listings
    async fn mark_deleted(&self, id: &str) -> Result<()>;

    /// All non-deleted accounts
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Filtered, sorted, paginated listing of non-deleted accounts
    async fn search_accounts(&self, query: &AccountQuery) -> Result<AccountPage>;
}
