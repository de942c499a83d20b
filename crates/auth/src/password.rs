//! One-way password hashing.

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("password hashing failed: {0}")]
pub struct HashError(String);

/// Salted one-way hash + verify for operator passwords.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// `false` for a mismatch and for a stored value that is not a valid hash.
    fn verify(&self, password: &str, stored_hash: &str) -> bool;
}

/// argon2id with default parameters and a random salt per hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| HashError(e.to_string()))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "stored credential is not a valid password hash");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted() {
        let hasher = Argon2Hasher::default();
        let a = hasher.hash("s3cret").unwrap();
        let b = hasher.hash("s3cret").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("s3cret", &a));
        assert!(hasher.verify("s3cret", &b));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        let hasher = Argon2Hasher::default();
        assert!(!hasher.verify("s3cret", "not-a-hash"));
    }
}
