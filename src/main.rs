use std::env;
use std::sync::Arc;

use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use identity_server::{
    config::settings::Config,
    email::{Mailer, SmtpMailer},
    error::{IdentityError, Result},
    roles::StaticRoleDirectory,
    services::{AccountService, AuthService, AvatarService, DirectoryService},
    sessions::{MemoryLoginFailureTracker, MemorySessionRegistry},
    storage::{memory::MemoryStorage, LocalMediaStorage, Storage},
    TokenIssuer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize structured logging
    init_tracing()?;

    let config = Config::load();
    validate_config(&config)?;

    info!("Starting {} v{}", identity_server::NAME, identity_server::VERSION);

    // The built-in memory store backs development runs; deployments embed the
    // library and inject their own store
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    warn!("Using in-memory account store; data will not survive a restart");

    let roles = Arc::new(StaticRoleDirectory::with_defaults());
    let sessions = Arc::new(MemorySessionRegistry::new());
    let login_failures = Arc::new(MemoryLoginFailureTracker::new());
    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::from_config(&config.smtp)?);
    let tokens = Arc::new(TokenIssuer::new(&config.auth.jwt_secret));

    let _accounts = AccountService::new(
        Arc::clone(&storage),
        roles.clone(),
        Arc::clone(&mailer),
        Arc::clone(&tokens),
        &config,
    );
    let _auth = AuthService::new(
        Arc::clone(&storage),
        roles.clone(),
        sessions,
        login_failures,
        Arc::clone(&tokens),
        &config,
    );
    let _directory = DirectoryService::new(Arc::clone(&storage), roles.clone(), &config);
    let _avatars = AvatarService::new(
        Arc::clone(&storage),
        Arc::new(LocalMediaStorage::new(config.media.avatar_dir())),
        &config,
    );

    storage
        .health_check()
        .await
        .map_err(|e| IdentityError::Storage(format!("Storage health check failed: {}", e)))?;

    info!(
        "Identity services ready (app={}, web={}, media={})",
        config.app.name, config.app.web_url, config.media.root
    );

    // Services are driven by an embedding transport layer; keep the process
    // alive until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| IdentityError::Internal(format!("Signal handler failed: {}", e)))?;

    info!("Shutting down");
    storage
        .close()
        .await
        .map_err(|e| IdentityError::Storage(format!("Storage shutdown failed: {}", e)))?;
    Ok(())
}

/// Initialize structured logging
fn init_tracing() -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "identity_server=info,info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .compact(),
        );

    // JSON logging for production
    if env::var("LOG_FORMAT").unwrap_or_default() == "json" {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false);

        subscriber.with(json_layer).init();
    } else {
        subscriber.init();
    }

    info!("Structured logging initialized with level: {}", log_level);
    Ok(())
}

/// Validate configuration before wiring anything
fn validate_config(config: &Config) -> Result<()> {
    if config.auth.jwt_secret.is_empty() {
        return Err(IdentityError::Config(
            "JWT signing secret cannot be empty".to_string(),
        ));
    }

    if config.auth.login_expiry_days <= 0
        || config.auth.registration_expiry_days <= 0
        || config.auth.recovery_expiry_days <= 0
    {
        return Err(IdentityError::Config(
            "Token expiry durations must be positive".to_string(),
        ));
    }

    if config.app.web_url.is_empty() || config.app.api_url.is_empty() {
        return Err(IdentityError::Config(
            "Application URLs cannot be empty".to_string(),
        ));
    }

    if config.media.root.is_empty() {
        return Err(IdentityError::Config(
            "Media root cannot be empty".to_string(),
        ));
    }

    Ok(())
}
