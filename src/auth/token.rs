//! Signed, expiring claim sets.
//!
//! Tokens are opaque bearer credentials: validity is decided by signature and
//! expiry alone, nothing is persisted and nothing can be revoked early.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{IdentityError, Result};
use crate::models::account::{Account, AccountProfile};

/// Token verification failures
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// Role claim embedded in tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleClaim {
    pub name: String,
}

/// Claim set embedded in signed tokens.
///
/// Login tokens carry the full profile; registration and recovery tokens only
/// carry id, username and role name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<RoleClaim>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<String>,
    /// issued-at, seconds since epoch; stamped by the issuer
    #[serde(default)]
    pub iat: i64,
    /// expiry, seconds since epoch; stamped by the issuer
    #[serde(default)]
    pub exp: i64,
}

impl Claims {
    /// Full-profile claims for a login token
    pub fn login(profile: &AccountProfile, session_id: Option<String>) -> Self {
        Self {
            id: profile.account.id.clone(),
            username: profile.account.username.clone(),
            name: Some(profile.account.name.clone()),
            email: Some(profile.account.email.clone()),
            phone: Some(profile.account.phone.clone()),
            role: profile.role.as_ref().map(|r| RoleClaim {
                name: r.name.clone(),
            }),
            groups: profile.account.group_ids.clone(),
            avatar_url: profile.account.avatar_url.clone(),
            session_id,
            iat: 0,
            exp: 0,
        }
    }

    /// Minimal claims proving the right to activate a pending account
    pub fn registration(account: &Account, role_name: &str) -> Self {
        Self::minimal(account, role_name)
    }

    /// Minimal claims proving the right to reset an account's password
    pub fn recovery(account: &Account, role_name: &str) -> Self {
        Self::minimal(account, role_name)
    }

    fn minimal(account: &Account, role_name: &str) -> Self {
        Self {
            id: account.id.clone(),
            username: account.username.clone(),
            name: None,
            email: None,
            phone: None,
            role: Some(RoleClaim {
                name: role_name.to_string(),
            }),
            groups: Vec::new(),
            avatar_url: None,
            session_id: None,
            iat: 0,
            exp: 0,
        }
    }
}

/// Issues and verifies HS256-signed tokens with a process-wide secret
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; an expired token must not pass inside a grace window
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign the claims with `iat` now and `exp` now + `ttl`
    pub fn issue(&self, claims: &Claims, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let mut claims = claims.clone();
        claims.iat = now.timestamp();
        claims.exp = (now + ttl).timestamp();

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| IdentityError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Decode and validate a token, returning its claims
    pub fn verify(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed(e.to_string()),
            })
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
            phone: "555-0100".to_string(),
            avatar: None,
            avatar_url: None,
            role_id: "role-user".to_string(),
            group_ids: vec!["g1".to_string()],
            active: true,
            deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let issuer = TokenIssuer::new("test-secret");
        let claims = Claims::registration(&account(), "user");

        let token = issuer.issue(&claims, Duration::days(1)).unwrap();
        let decoded = issuer.verify(&token).unwrap();

        assert_eq!(decoded.id, "a1");
        assert_eq!(decoded.username, "alice");
        assert_eq!(decoded.role.unwrap().name, "user");
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issuer = TokenIssuer::new("test-secret");
        let claims = Claims::registration(&account(), "user");

        let token = issuer.issue(&claims, Duration::seconds(-5)).unwrap();

        assert_eq!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_key_is_invalid_signature() {
        let issuer = TokenIssuer::new("test-secret");
        let other = TokenIssuer::new("other-secret");
        let claims = Claims::registration(&account(), "user");

        let token = issuer.issue(&claims, Duration::days(1)).unwrap();

        assert_eq!(other.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let issuer = TokenIssuer::new("test-secret");

        match issuer.verify("not.a.token") {
            Err(TokenError::Malformed(_)) => {}
            other => panic!("expected malformed, got {:?}", other),
        }
    }
}
