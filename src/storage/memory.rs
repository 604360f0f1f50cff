//! In-memory store implementation (useful for testing and development).
//!
//! A single mutex over the account table makes the uniqueness check and the
//! insert one atomic step, which is the property the services depend on.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex as TokioMutex;
use tracing::debug;

use crate::models::account::Account;
use crate::storage::{AccountPage, AccountQuery, Result, Storage, StorageError};
use crate::utils::validator;

struct StorageData {
    accounts: HashMap<String, Account>, // id -> account
}

impl StorageData {
    fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    fn live(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values().filter(|a| !a.deleted)
    }

    // Schema rules the real store would enforce at write time
    fn validate(account: &Account) -> Result<()> {
        if !validator::validate_username(&account.username) {
            return Err(StorageError::Validation(format!(
                "Invalid username: {}",
                account.username
            )));
        }
        if !validator::validate_email(&account.email) {
            return Err(StorageError::Validation(format!(
                "Invalid email: {}",
                account.email
            )));
        }
        if account.password_hash.is_empty() {
            return Err(StorageError::Validation(
                "Password hash is required".to_string(),
            ));
        }
        Ok(())
    }

    // Uniqueness among non-deleted accounts, excluding the record itself
    fn check_unique(&self, account: &Account) -> Result<()> {
        for other in self.live() {
            if other.id == account.id {
                continue;
            }
            if other.username == account.username {
                return Err(StorageError::UniqueViolation {
                    field: "username".to_string(),
                });
            }
            if other.email.eq_ignore_ascii_case(&account.email) {
                return Err(StorageError::UniqueViolation {
                    field: "email".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// In-memory storage implementation
pub struct MemoryStorage {
    data: TokioMutex<StorageData>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            data: TokioMutex::new(StorageData::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_accounts(accounts: &mut [Account], order_by: Option<&str>, order_desc: bool) {
    // Unknown field names fall back to store-default order, as the
    // original store did
    let field = match order_by {
        Some(f @ ("name" | "username" | "email" | "phone" | "created_at" | "updated_at")) => f,
        _ => {
            accounts.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            return;
        }
    };

    accounts.sort_by(|a, b| {
        let ordering = match field {
            "name" => a.name.cmp(&b.name),
            "username" => a.username.cmp(&b.username),
            "email" => a.email.cmp(&b.email),
            "phone" => a.phone.cmp(&b.phone),
            "created_at" => a.created_at.cmp(&b.created_at),
            _ => a.updated_at.cmp(&b.updated_at),
        };
        if order_desc {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn matches_search(account: &Account, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    account.name.to_lowercase().contains(&needle)
        || account.username.to_lowercase().contains(&needle)
        || account.email.to_lowercase().contains(&needle)
        || account.phone.to_lowercase().contains(&needle)
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Create a new account, enforcing uniqueness atomically
    async fn create_account(&self, account: &Account) -> Result<()> {
        let mut data = self.data.lock().await;

        StorageData::validate(account)?;
        data.check_unique(account)?;

        debug!("Creating account {} ({})", account.username, account.id);
        data.accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    /// Get account by ID
    async fn get_account(&self, id: &str) -> Result<Option<Account>> {
        let data = self.data.lock().await;
        Ok(data.accounts.get(id).filter(|a| !a.deleted).cloned())
    }

    /// Get account by username
    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        let data = self.data.lock().await;
        let found = data.live().find(|a| a.username == username).cloned();
        Ok(found)
    }

    /// Get account by email
    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let data = self.data.lock().await;
        let found = data
            .live()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned();
        Ok(found)
    }

    /// Replace an existing account record
    async fn update_account(&self, account: &Account) -> Result<()> {
        let mut data = self.data.lock().await;

        if !data.accounts.contains_key(&account.id) {
            return Err(StorageError::NotFound(format!(
                "No account with id {}",
                account.id
            )));
        }

        StorageData::validate(account)?;
        data.check_unique(account)?;

        data.accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<()> {
        let mut data = self.data.lock().await;
        match data.accounts.get_mut(id).filter(|a| !a.deleted) {
            Some(account) => {
                account.active = active;
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("No account with id {}", id))),
        }
    }

    async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        match data.accounts.get_mut(id).filter(|a| !a.deleted) {
            Some(account) => {
                account.password_hash = password_hash.to_string();
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("No account with id {}", id))),
        }
    }

    async fn set_avatar(&self, id: &str, filename: &str, url: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        match data.accounts.get_mut(id).filter(|a| !a.deleted) {
            Some(account) => {
                account.avatar = Some(filename.to_string());
                account.avatar_url = Some(url.to_string());
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("No account with id {}", id))),
        }
    }

    async fn mark_deleted(&self, id: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        match data.accounts.get_mut(id).filter(|a| !a.deleted) {
            Some(account) => {
                account.deleted = true;
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("No account with id {}", id))),
        }
    }

    /// All non-deleted accounts in store-default order
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let data = self.data.lock().await;
        let mut accounts: Vec<Account> = data.live().cloned().collect();
        sort_accounts(&mut accounts, None, false);
        Ok(accounts)
    }

    /// Filtered, sorted, paginated listing
    async fn search_accounts(&self, query: &AccountQuery) -> Result<AccountPage> {
        let data = self.data.lock().await;

        let mut accounts: Vec<Account> = match &query.search {
            Some(needle) => data
                .live()
                .filter(|a| matches_search(a, needle))
                .cloned()
                .collect(),
            None => data.live().cloned().collect(),
        };

        sort_accounts(&mut accounts, query.order_by.as_deref(), query.order_desc);

        let total = accounts.len() as u64;
        let page = query.page.max(1);
        let limit = query.limit as usize;
        let start = (page as usize - 1) * limit;
        let accounts = if start >= accounts.len() || limit == 0 {
            Vec::new()
        } else {
            accounts[start..(start + limit).min(accounts.len())].to_vec()
        };

        Ok(AccountPage {
            accounts,
            total,
            page,
        })
    }
}
