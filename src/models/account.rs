use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roles::{Group, Role};

/// user account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// unique ID
    pub id: String,
    /// unique login name
    pub username: String,
    /// unique email address
    pub email: String,
    /// password hash, never the plaintext
    pub password_hash: String,
    /// display name
    pub name: String,
    /// phone number
    pub phone: String,
    /// stored avatar filename
    pub avatar: Option<String>,
    /// public avatar URL with cache-busting suffix
    pub avatar_url: Option<String>,
    /// opaque role reference, resolved by the role directory
    pub role_id: String,
    /// opaque group references
    pub group_ids: Vec<String>,
    /// active status
    pub active: bool,
    /// soft-delete flag
    pub deleted: bool,
    /// account creation time
    pub created_at: DateTime<Utc>,
    /// update time
    pub updated_at: DateTime<Utc>,
}

/// An account with its role and group references resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountProfile {
    pub account: Account,
    pub role: Option<Role>,
    pub groups: Vec<Group>,
}

/// Self-service registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegistration {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Administrative account creation input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// role reference supplied directly by the caller
    pub role_id: String,
    pub group_ids: Vec<String>,
    pub active: bool,
}

/// Partial account update; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdate {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role_id: Option<String>,
    pub group_ids: Option<Vec<String>>,
    pub active: Option<bool>,
}

/// Outcome of a successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    pub email: String,
}

/// Bearer token handed back by a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginToken {
    pub token: String,
}

/// Outcome of an avatar upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarUpload {
    pub filename: String,
    pub url: String,
}

/// Outcome of a soft delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deletion {
    pub id: String,
    pub delete_success: bool,
}

/// One page of resolved directory results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryPage {
    pub users: Vec<AccountProfile>,
    /// size of the full filtered set, not the page
    pub total: u64,
    /// 1-indexed page number
    pub page: u32,
}

/// Soft status result for operations that report rather than fail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: bool,
    pub message: String,
}

impl StatusMessage {
    /// Successful outcome with a message
    pub fn ok<T: Into<String>>(message: T) -> Self {
        Self {
            status: true,
            message: message.into(),
        }
    }

    /// Failed outcome with a message
    pub fn failed<T: Into<String>>(message: T) -> Self {
        Self {
            status: false,
            message: message.into(),
        }
    }
}
