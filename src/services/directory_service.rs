//! Directory queries: filtered, sorted, paginated account listings and
//! single-account lookups, all with role and group references resolved.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::settings::Config;
use crate::error::{IdentityError, Result};
use crate::models::account::{Account, AccountProfile, DirectoryPage};
use crate::roles::{self, RoleDirectory};
use crate::services::bounded;
use crate::storage::{AccountQuery, Storage};

/// Directory query service
pub struct DirectoryService {
    storage: Arc<dyn Storage>,
    roles: Arc<dyn RoleDirectory>,
    op_timeout: Duration,
}

impl DirectoryService {
    pub fn new(storage: Arc<dyn Storage>, roles: Arc<dyn RoleDirectory>, config: &Config) -> Self {
        Self {
            storage,
            roles,
            op_timeout: config.app.operation_timeout(),
        }
    }

    /// Paginated listing. Deleted accounts are excluded by construction;
    /// `total` counts the full filtered set, not the page.
    pub async fn paginate(&self, query: AccountQuery) -> Result<DirectoryPage> {
        debug!(
            "Directory query: limit={} page={} search={:?} order_by={:?}",
            query.limit, query.page, query.search, query.order_by
        );

        let page = bounded(
            "directory search",
            self.op_timeout,
            self.storage.search_accounts(&query),
        )
        .await?;

        let users = self.resolve_all(page.accounts).await?;
        Ok(DirectoryPage {
            users,
            total: page.total,
            page: page.page,
        })
    }

    /// All non-deleted accounts, resolved
    pub async fn find_users(&self) -> Result<Vec<AccountProfile>> {
        let accounts = bounded(
            "account listing",
            self.op_timeout,
            self.storage.list_accounts(),
        )
        .await?;
        self.resolve_all(accounts).await
    }

    /// Single account by id, resolved
    pub async fn find_user(&self, id: &str) -> Result<AccountProfile> {
        let account = bounded(
            "account lookup",
            self.op_timeout,
            self.storage.get_account(id),
        )
        .await?
        .ok_or_else(|| IdentityError::NotFound(format!("No account with id {}", id)))?;

        roles::resolve(self.roles.as_ref(), account).await
    }

    /// Single account by username, resolved
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<AccountProfile>> {
        let account = bounded(
            "account lookup",
            self.op_timeout,
            self.storage.get_account_by_username(username),
        )
        .await?;

        match account {
            Some(account) => Ok(Some(roles::resolve(self.roles.as_ref(), account).await?)),
            None => Ok(None),
        }
    }

    async fn resolve_all(&self, accounts: Vec<Account>) -> Result<Vec<AccountProfile>> {
        let mut users = Vec::with_capacity(accounts.len());
        for account in accounts {
            users.push(roles::resolve(self.roles.as_ref(), account).await?);
        }
        Ok(users)
    }
}
