//! Password hashing and credential verification.
//!
//! Hashes are bcrypt strings that embed their own salt and cost, so a stored
//! hash stays verifiable after the work factor changes.

use crate::error::{IdentityError, Result};

/// bcrypt work factor applied to newly created hashes
pub const WORK_FACTOR: u32 = 10;

/// Derive a salted one-way hash from a plaintext secret
pub fn hash_password(plain: &str) -> Result<String> {
    bcrypt::hash(plain, WORK_FACTOR)
        .map_err(|e| IdentityError::Internal(format!("Password hashing failed: {}", e)))
}

/// Check a plaintext secret against a stored hash.
///
/// A mismatch is `Ok(false)`; only an undecodable stored hash is an error.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(plain, hash)
        .map_err(|e| IdentityError::Internal(format!("Stored hash is not decodable: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("right-pw").unwrap();

        assert_ne!(hash, "right-pw");
        assert!(verify_password("right-pw", &hash).unwrap());
        assert!(!verify_password("right-pwx", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same-secret").unwrap();
        let second = hash_password("same-secret").unwrap();

        // Same input, different salt, both verifiable
        assert_ne!(first, second);
        assert!(verify_password("same-secret", &first).unwrap());
        assert!(verify_password("same-secret", &second).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
