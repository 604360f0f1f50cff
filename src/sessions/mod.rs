//! Session registry and login-failure tracking collaborators.
//!
//! Both are external concerns: the registry persists session records keyed by
//! account and request context, the tracker feeds abuse detection. The
//! in-memory implementations back tests and development runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as TokioMutex;
use uuid::Uuid;

use crate::error::Result;
use crate::models::account::Account;

/// Caller-side request metadata attached to sessions and failure records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// unique ID
    pub id: String,
    /// owning account
    pub account_id: String,
    /// client address at login
    pub ip: Option<String>,
    /// client user agent at login
    pub user_agent: Option<String>,
    /// session creation time
    pub created_at: DateTime<Utc>,
}

/// Session persistence interface
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Create and persist a session for the account
    async fn create_session(&self, account: &Account, context: &RequestContext)
        -> Result<Session>;
}

/// Login-failure notification interface, fire-and-forget for callers
#[async_trait]
pub trait LoginFailureTracker: Send + Sync {
    /// Record one failed credential check for the username
    async fn record_failure(&self, username: &str, context: &RequestContext) -> Result<()>;
}

/// In-memory session registry
pub struct MemorySessionRegistry {
    sessions: TokioMutex<Vec<Session>>,
}

impl MemorySessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: TokioMutex::new(Vec::new()),
        }
    }

    /// Snapshot of all sessions created so far
    pub async fn sessions(&self) -> Vec<Session> {
        self.sessions.lock().await.clone()
    }
}

impl Default for MemorySessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRegistry for MemorySessionRegistry {
    async fn create_session(
        &self,
        account: &Account,
        context: &RequestContext,
    ) -> Result<Session> {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            account_id: account.id.clone(),
            ip: context.ip.clone(),
            user_agent: context.user_agent.clone(),
            created_at: Utc::now(),
        };

        let mut sessions = self.sessions.lock().await;
        sessions.push(session.clone());
        Ok(session)
    }
}

/// One recorded credential failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginFailure {
    pub username: String,
    pub ip: Option<String>,
    pub at: DateTime<Utc>,
}

/// In-memory login-failure tracker
pub struct MemoryLoginFailureTracker {
    failures: TokioMutex<Vec<LoginFailure>>,
}

impl MemoryLoginFailureTracker {
    pub fn new() -> Self {
        Self {
            failures: TokioMutex::new(Vec::new()),
        }
    }

    /// Snapshot of all recorded failures
    pub async fn failures(&self) -> Vec<LoginFailure> {
        self.failures.lock().await.clone()
    }
}

impl Default for MemoryLoginFailureTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoginFailureTracker for MemoryLoginFailureTracker {
    async fn record_failure(&self, username: &str, context: &RequestContext) -> Result<()> {
        let mut failures = self.failures.lock().await;
        failures.push(LoginFailure {
            username: username.to_string(),
            ip: context.ip.clone(),
            at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account() -> Account {
        Account {
            id: "a1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Alice".to_string(),
            phone: String::new(),
            avatar: None,
            avatar_url: None,
            role_id: "role-user".to_string(),
            group_ids: Vec::new(),
            active: true,
            deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_session_carries_request_context() {
        let registry = MemorySessionRegistry::new();
        let context = RequestContext {
            ip: Some("10.0.0.1".to_string()),
            user_agent: Some("test-agent".to_string()),
        };

        let session = registry.create_session(&account(), &context).await.unwrap();

        assert_eq!(session.account_id, "a1");
        assert_eq!(session.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(registry.sessions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_tracker_records_username() {
        let tracker = MemoryLoginFailureTracker::new();
        tracker
            .record_failure("alice", &RequestContext::default())
            .await
            .unwrap();

        let failures = tracker.failures().await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].username, "alice");
    }
}
