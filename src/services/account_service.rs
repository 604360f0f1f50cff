//! Account lifecycle: registration, administrative creation, updates,
//! soft deletion, activation, password change and recovery.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::auth::password;
use crate::auth::token::{Claims, TokenIssuer};
use crate::config::settings::Config;
use crate::email::{templates, EmailMessage, Mailer};
use crate::error::{IdentityError, Result};
use crate::models::account::{
    Account, AccountProfile, AccountUpdate, Deletion, NewAccount, NewRegistration, Registration,
    StatusMessage,
};
use crate::roles::{self, RoleDirectory, DEFAULT_ROLE};
use crate::services::bounded;
use crate::storage::{Storage, StorageError};

/// Account lifecycle service
pub struct AccountService {
    storage: Arc<dyn Storage>,
    roles: Arc<dyn RoleDirectory>,
    mailer: Arc<dyn Mailer>,
    tokens: Arc<TokenIssuer>,
    app_name: String,
    web_url: String,
    mail_from: String,
    registration_expiry: chrono::Duration,
    recovery_expiry: chrono::Duration,
    op_timeout: Duration,
}

impl AccountService {
    pub fn new(
        storage: Arc<dyn Storage>,
        roles: Arc<dyn RoleDirectory>,
        mailer: Arc<dyn Mailer>,
        tokens: Arc<TokenIssuer>,
        config: &Config,
    ) -> Self {
        Self {
            storage,
            roles,
            mailer,
            tokens,
            app_name: config.app.name.clone(),
            web_url: config.app.web_url.clone(),
            mail_from: config.smtp.from.clone(),
            registration_expiry: config.auth.registration_expiry(),
            recovery_expiry: config.auth.recovery_expiry(),
            op_timeout: config.app.operation_timeout(),
        }
    }

    /// Self-service registration.
    ///
    /// The account is created inactive under the default "user" role; an
    /// activation email is dispatched in the background and the result is
    /// returned as soon as the account is persisted. Duplicate username or
    /// email surfaces as a field-level duplicate error from the store's
    /// atomic uniqueness check.
    pub async fn register(&self, registration: NewRegistration) -> Result<Registration> {
        let role = bounded(
            "role lookup",
            self.op_timeout,
            self.roles.find_role_by_name(DEFAULT_ROLE),
        )
        .await?
        .ok_or_else(|| IdentityError::RoleNotFound(DEFAULT_ROLE.to_string()))?;

        let password_hash = password::hash_password(&registration.password)?;

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            username: registration.username,
            email: registration.email,
            password_hash,
            name: registration.name,
            phone: registration.phone,
            avatar: None,
            avatar_url: None,
            role_id: role.id.clone(),
            group_ids: Vec::new(),
            active: false,
            deleted: false,
            created_at: now,
            updated_at: now,
        };

        bounded(
            "account creation",
            self.op_timeout,
            self.storage.create_account(&account),
        )
        .await?;

        match self
            .tokens
            .issue(&Claims::registration(&account, &role.name), self.registration_expiry)
        {
            Ok(token) => {
                let url = format!("{}/activation-user/{}", self.web_url, token);
                self.dispatch(templates::activation(
                    &self.app_name,
                    &self.mail_from,
                    &account.email,
                    &url,
                ));
            }
            // The account exists and can be activated via a regenerated
            // link, so a failed token issue only costs the notification
            Err(e) => error!(
                "Failed to issue activation token for {}: {}",
                account.username, e
            ),
        }

        info!("Registered account {} ({})", account.username, account.id);
        Ok(Registration {
            id: account.id,
            email: account.email,
        })
    }

    /// Administrative account creation: role and active flag supplied by the
    /// caller, no activation token or email.
    pub async fn create_user(&self, new_account: NewAccount) -> Result<AccountProfile> {
        let password_hash = password::hash_password(&new_account.password)?;

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            username: new_account.username,
            email: new_account.email,
            password_hash,
            name: new_account.name,
            phone: new_account.phone,
            avatar: None,
            avatar_url: None,
            role_id: new_account.role_id,
            group_ids: new_account.group_ids,
            active: new_account.active,
            deleted: false,
            created_at: now,
            updated_at: now,
        };

        bounded(
            "account creation",
            self.op_timeout,
            self.storage.create_account(&account),
        )
        .await?;

        info!("Created account {} ({})", account.username, account.id);
        roles::resolve(self.roles.as_ref(), account).await
    }

    /// Apply a partial update, refreshing the update timestamp
    pub async fn update_user(&self, id: &str, update: AccountUpdate) -> Result<AccountProfile> {
        let mut account = bounded(
            "account lookup",
            self.op_timeout,
            self.storage.get_account(id),
        )
        .await?
        .ok_or_else(|| IdentityError::NotFound(format!("No account with id {}", id)))?;

        if let Some(username) = update.username {
            account.username = username;
        }
        if let Some(name) = update.name {
            account.name = name;
        }
        if let Some(email) = update.email {
            account.email = email;
        }
        if let Some(phone) = update.phone {
            account.phone = phone;
        }
        if let Some(role_id) = update.role_id {
            account.role_id = role_id;
        }
        if let Some(group_ids) = update.group_ids {
            account.group_ids = group_ids;
        }
        if let Some(active) = update.active {
            account.active = active;
        }
        account.updated_at = Utc::now();

        bounded(
            "account update",
            self.op_timeout,
            self.storage.update_account(&account),
        )
        .await?;

        roles::resolve(self.roles.as_ref(), account).await
    }

    /// Soft-delete: the account disappears from lookups and listings
    pub async fn delete_user(&self, id: &str) -> Result<Deletion> {
        bounded(
            "account deletion",
            self.op_timeout,
            self.storage.mark_deleted(id),
        )
        .await?;

        info!("Soft-deleted account {}", id);
        Ok(Deletion {
            id: id.to_string(),
            delete_success: true,
        })
    }

    /// Flip an account to active. Idempotent: re-activating an already
    /// active account succeeds. Missing accounts and failed writes are
    /// distinguishable failure kinds.
    pub async fn activate(&self, id: &str) -> Result<StatusMessage> {
        match tokio::time::timeout(self.op_timeout, self.storage.set_active(id, true)).await {
            Ok(Ok(())) => {
                info!("Activated account {}", id);
                Ok(StatusMessage::ok("Account activated"))
            }
            Ok(Err(StorageError::NotFound(msg))) => Err(IdentityError::NotFound(msg)),
            Ok(Err(e)) => Err(IdentityError::UpdateFailed(format!(
                "Activation failed: {}",
                e
            ))),
            Err(_) => Err(IdentityError::Timeout(format!(
                "Activation timed out after {:?}",
                self.op_timeout
            ))),
        }
    }

    /// Replace the stored password hash after a confirmation check.
    ///
    /// A confirmation mismatch is a soft status, not an error, and leaves the
    /// stored hash untouched. The current password is not required.
    pub async fn change_password(
        &self,
        id: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<StatusMessage> {
        if new_password != confirmation {
            return Ok(StatusMessage::failed("Passwords do not match"));
        }

        let password_hash = password::hash_password(new_password)?;

        match tokio::time::timeout(
            self.op_timeout,
            self.storage.set_password_hash(id, &password_hash),
        )
        .await
        {
            Ok(Ok(())) => {
                info!("Password changed for account {}", id);
                Ok(StatusMessage::ok("Password changed successfully"))
            }
            Ok(Err(StorageError::NotFound(msg))) => Err(IdentityError::NotFound(msg)),
            Ok(Err(e)) => Err(IdentityError::UpdateFailed(format!(
                "Password change failed: {}",
                e
            ))),
            Err(_) => Err(IdentityError::Timeout(format!(
                "Password change timed out after {:?}",
                self.op_timeout
            ))),
        }
    }

    /// Issue a recovery token for a known email and dispatch the reset link.
    ///
    /// The success status is returned without waiting on delivery.
    pub async fn request_recovery(&self, email: &str) -> Result<StatusMessage> {
        let account = bounded(
            "account lookup",
            self.op_timeout,
            self.storage.get_account_by_email(email),
        )
        .await?
        .ok_or_else(|| IdentityError::UnknownEmail(email.to_string()))?;

        let role = bounded(
            "role lookup",
            self.op_timeout,
            self.roles.find_role(&account.role_id),
        )
        .await?
        .ok_or_else(|| IdentityError::RoleNotFound(account.role_id.clone()))?;

        let token = self
            .tokens
            .issue(&Claims::recovery(&account, &role.name), self.recovery_expiry)?;
        let url = format!("{}/reset-password/{}", self.web_url, token);

        self.dispatch(templates::recovery(
            &self.app_name,
            &self.mail_from,
            &account.email,
            &url,
        ));

        debug!("Recovery requested for {}", account.username);
        Ok(StatusMessage::ok("A recovery email has been sent"))
    }

    // Background dispatch: delivery neither gates nor fails the primary
    // operation; failures and timeouts are logged under the dispatch category
    fn dispatch(&self, message: EmailMessage) {
        let mailer = Arc::clone(&self.mailer);
        let limit = self.op_timeout;
        tokio::spawn(async move {
            let to = message.to.clone();
            let subject = message.subject.clone();
            match tokio::time::timeout(limit, mailer.send(message)).await {
                Ok(Ok(())) => debug!("Dispatched '{}' to {}", subject, to),
                Ok(Err(e)) => error!("Dispatch of '{}' to {} failed: {}", subject, to, e),
                Err(_) => error!("Dispatch of '{}' to {} timed out", subject, to),
            }
        });
    }
}
