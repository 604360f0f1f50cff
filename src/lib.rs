// Re-export core functionality for external use
pub use async_trait::async_trait;

// Core module definitions
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod roles;
pub mod services;
pub mod sessions;
pub mod storage;
pub mod utils;

// Unified error handling
pub use error::{IdentityError, Result};

// Essential re-exports for convenience
pub use config::settings::Config;

pub use models::account::{
    Account, AccountProfile, AccountUpdate, AvatarUpload, Deletion, DirectoryPage, LoginToken,
    NewAccount, NewRegistration, Registration, StatusMessage,
};

// Storage abstractions
pub use storage::{
    media::{LocalMediaStorage, MediaStorage, MediaStream},
    memory::MemoryStorage,
    AccountPage, AccountQuery, Storage, StorageError,
};

// Collaborator interfaces
pub use email::{EmailMessage, Mailer, MemoryMailer, SmtpMailer};
pub use roles::{Role, RoleDirectory, StaticRoleDirectory};
pub use sessions::{
    LoginFailureTracker, MemoryLoginFailureTracker, MemorySessionRegistry, RequestContext,
    Session, SessionRegistry,
};

// Token issuance
pub use auth::token::{Claims, TokenError, TokenIssuer};

// Services
pub use services::{AccountService, AuthService, AvatarService, DirectoryService};

// Version and build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Account, AccountProfile, AccountQuery, AccountService, AuthService, AvatarService,
        Config, DirectoryService, IdentityError, Mailer, MediaStorage, RequestContext, Result,
        RoleDirectory, SessionRegistry, Storage, TokenIssuer, NAME, VERSION,
    };

    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, warn};
}

// Constants
pub mod constants {
    /// Default page size for directory pagination
    pub const DEFAULT_PAGE_SIZE: u32 = 50;

    /// Maximum page size
    pub const MAX_PAGE_SIZE: u32 = 1000;
}
