// Shared harness for integration tests: all services wired over the
// in-memory store and in-memory collaborators, no external side effects.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use identity_server::{
    config::settings::Config,
    email::MemoryMailer,
    models::account::{NewAccount, NewRegistration},
    roles::StaticRoleDirectory,
    services::{AccountService, AuthService, DirectoryService},
    sessions::{MemoryLoginFailureTracker, MemorySessionRegistry},
    storage::memory::MemoryStorage,
    TokenIssuer,
};

pub struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub roles: Arc<StaticRoleDirectory>,
    pub sessions: Arc<MemorySessionRegistry>,
    pub failures: Arc<MemoryLoginFailureTracker>,
    pub mailer: Arc<MemoryMailer>,
    pub tokens: Arc<TokenIssuer>,
    pub accounts: AccountService,
    pub auth: AuthService,
    pub directory: DirectoryService,
    pub config: Config,
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.app.name = "Acme".to_string();
    config.app.web_url = "http://web.test".to_string();
    config.app.api_url = "http://api.test".to_string();
    config.app.operation_timeout_secs = 5;
    config.auth.jwt_secret = "test-secret".to_string();
    config.smtp.from = "no-reply@acme.test".to_string();
    config
}

pub fn harness() -> Harness {
    harness_with_roles(Arc::new(StaticRoleDirectory::with_defaults()))
}

pub fn harness_with_roles(roles: Arc<StaticRoleDirectory>) -> Harness {
    let config = test_config();
    let storage = Arc::new(MemoryStorage::new());
    let sessions = Arc::new(MemorySessionRegistry::new());
    let failures = Arc::new(MemoryLoginFailureTracker::new());
    let mailer = Arc::new(MemoryMailer::new());
    let tokens = Arc::new(TokenIssuer::new(&config.auth.jwt_secret));

    let accounts = AccountService::new(
        storage.clone(),
        roles.clone(),
        mailer.clone(),
        tokens.clone(),
        &config,
    );
    let auth = AuthService::new(
        storage.clone(),
        roles.clone(),
        sessions.clone(),
        failures.clone(),
        tokens.clone(),
        &config,
    );
    let directory = DirectoryService::new(storage.clone(), roles.clone(), &config);

    Harness {
        storage,
        roles,
        sessions,
        failures,
        mailer,
        tokens,
        accounts,
        auth,
        directory,
        config,
    }
}

/// Registration input with sensible defaults
pub fn registration(username: &str, email: &str, password: &str) -> NewRegistration {
    NewRegistration {
        username: username.to_string(),
        password: password.to_string(),
        name: format!("{} Example", username),
        email: email.to_string(),
        phone: "555-0100".to_string(),
    }
}

/// Administrative account input bound to the seeded "user" role
pub fn new_account(username: &str, email: &str, password: &str, active: bool) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        password: password.to_string(),
        name: format!("{} Example", username),
        email: email.to_string(),
        phone: "555-0100".to_string(),
        role_id: "role-user".to_string(),
        group_ids: Vec::new(),
        active,
    }
}

/// Poll a condition until it holds or a one second deadline passes.
/// Background dispatch runs on spawned tasks, so tests wait instead of
/// assuming ordering.
pub async fn wait_until<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = Instant::now() + Duration::from_secs(1);
    loop {
        if check().await {
            return true;
        }
        if Instant::now() > deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
