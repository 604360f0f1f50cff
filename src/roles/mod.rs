//! Role and group lookup collaborator.
//!
//! Roles and groups are opaque references on the account record; this module
//! owns the resolver boundary the services use to turn those references into
//! named objects. The backing directory is external, so only the trait and a
//! seedable in-memory implementation live here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::account::{Account, AccountProfile};

/// Role assigned to self-registered accounts
pub const DEFAULT_ROLE: &str = "user";

/// named role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// named group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// Lookup interface for roles and groups
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Find a role by its unique name
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>>;

    /// Find a role by its reference
    async fn find_role(&self, id: &str) -> Result<Option<Role>>;

    /// Resolve a set of group references; unknown references are skipped
    async fn find_groups(&self, ids: &[String]) -> Result<Vec<Group>>;
}

/// Resolve an account's role and group references into a profile.
///
/// A dangling role reference resolves to `None` rather than failing; callers
/// that require the role decide how to surface its absence.
pub async fn resolve(directory: &dyn RoleDirectory, account: Account) -> Result<AccountProfile> {
    let role = directory.find_role(&account.role_id).await?;
    let groups = directory.find_groups(&account.group_ids).await?;
    Ok(AccountProfile {
        account,
        role,
        groups,
    })
}

/// Fixed in-memory role directory, seeded at construction
pub struct StaticRoleDirectory {
    roles: Vec<Role>,
    groups: Vec<Group>,
}

impl StaticRoleDirectory {
    pub fn new(roles: Vec<Role>, groups: Vec<Group>) -> Self {
        Self { roles, groups }
    }

    /// Directory seeded with the built-in "user" and "admin" roles
    pub fn with_defaults() -> Self {
        Self::new(
            vec![
                Role {
                    id: "role-user".to_string(),
                    name: DEFAULT_ROLE.to_string(),
                },
                Role {
                    id: "role-admin".to_string(),
                    name: "admin".to_string(),
                },
            ],
            Vec::new(),
        )
    }

    /// Empty directory, useful for exercising missing-role paths
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

#[async_trait]
impl RoleDirectory for StaticRoleDirectory {
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        Ok(self.roles.iter().find(|r| r.name == name).cloned())
    }

    async fn find_role(&self, id: &str) -> Result<Option<Role>> {
        Ok(self.roles.iter().find(|r| r.id == id).cloned())
    }

    async fn find_groups(&self, ids: &[String]) -> Result<Vec<Group>> {
        Ok(self
            .groups
            .iter()
            .filter(|g| ids.contains(&g.id))
            .cloned()
            .collect())
    }
}
