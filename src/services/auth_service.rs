//! Authentication gateway: credential check, session creation, login token.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::auth::password;
use crate::auth::token::{Claims, TokenIssuer};
use crate::config::settings::Config;
use crate::error::{IdentityError, Result};
use crate::models::account::LoginToken;
use crate::roles::{self, RoleDirectory};
use crate::services::bounded;
use crate::sessions::{LoginFailureTracker, RequestContext, SessionRegistry};
use crate::storage::Storage;

/// Authentication service
pub struct AuthService {
    storage: Arc<dyn Storage>,
    roles: Arc<dyn RoleDirectory>,
    sessions: Arc<dyn SessionRegistry>,
    login_failures: Arc<dyn LoginFailureTracker>,
    tokens: Arc<TokenIssuer>,
    login_expiry: chrono::Duration,
    op_timeout: Duration,
}

impl AuthService {
    pub fn new(
        storage: Arc<dyn Storage>,
        roles: Arc<dyn RoleDirectory>,
        sessions: Arc<dyn SessionRegistry>,
        login_failures: Arc<dyn LoginFailureTracker>,
        tokens: Arc<TokenIssuer>,
        config: &Config,
    ) -> Self {
        Self {
            storage,
            roles,
            sessions,
            login_failures,
            tokens,
            login_expiry: config.auth.login_expiry(),
            op_timeout: config.app.operation_timeout(),
        }
    }

    /// Authenticate a username/password pair and issue a login token.
    ///
    /// Lookup is by username among non-deleted accounts. The `active` flag is
    /// not consulted here. A failed credential check notifies the
    /// login-failure tracker before the error is returned.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        context: &RequestContext,
    ) -> Result<LoginToken> {
        debug!("Login attempt for {}", username);

        let account = bounded(
            "account lookup",
            self.op_timeout,
            self.storage.get_account_by_username(username),
        )
        .await?
        .ok_or_else(|| IdentityError::UnknownUser(username.to_string()))?;

        if !password::verify_password(password, &account.password_hash)? {
            self.notify_failure(username, context);
            return Err(IdentityError::InvalidCredential);
        }

        let profile = roles::resolve(self.roles.as_ref(), account).await?;

        // A session-registry failure degrades to a token without a session
        // reference; it never fails the login itself
        let session_id = match bounded(
            "session creation",
            self.op_timeout,
            self.sessions.create_session(&profile.account, context),
        )
        .await
        {
            Ok(session) => Some(session.id),
            Err(e) => {
                warn!(
                    "Session creation failed for {}: {}",
                    profile.account.username, e
                );
                None
            }
        };

        let claims = Claims::login(&profile, session_id);
        let token = self.tokens.issue(&claims, self.login_expiry)?;

        debug!("Issued login token for {}", profile.account.username);
        Ok(LoginToken { token })
    }

    // Fire-and-forget abuse notification; errors are isolated and logged
    fn notify_failure(&self, username: &str, context: &RequestContext) {
        let tracker = Arc::clone(&self.login_failures);
        let username = username.to_string();
        let context = context.clone();
        tokio::spawn(async move {
            if let Err(e) = tracker.record_failure(&username, &context).await {
                error!("Failed to record login failure for {}: {}", username, e);
            }
        });
    }
}
