use serde::{Deserialize, Serialize};

use tutorbook_core::{ensure_max_len, DomainError, DomainResult};

use crate::CredentialHasher;

/// Login name of a front-desk operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub const MAX_LEN: usize = 100;

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid("username must not be empty"));
        }
        ensure_max_len("username", trimmed, Self::MAX_LEN)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Username {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored operator account. `password_hash` is a PHC string, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: Username,
    pub password_hash: String,
}

impl Account {
    /// Hash `password` and build the account to store.
    pub fn register(
        username: Username,
        password: &str,
        hasher: &dyn CredentialHasher,
    ) -> DomainResult<Self> {
        if password.is_empty() {
            return Err(DomainError::invalid("password must not be empty"));
        }
        let password_hash = hasher
            .hash(password)
            .map_err(|e| DomainError::invalid(e.to_string()))?;
        Ok(Self {
            username,
            password_hash,
        })
    }
}

/// Check a login attempt against the stored account, failing closed.
///
/// A missing account and a wrong password are indistinguishable to the caller.
pub fn verify_login(account: Option<&Account>, password: &str, hasher: &dyn CredentialHasher) -> bool {
    match account {
        Some(account) => hasher.verify(password, &account.password_hash),
        None => false,
    }
}
