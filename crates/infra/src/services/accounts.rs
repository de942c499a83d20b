use std::sync::Arc;

use tracing::{info, instrument};

use tutorbook_auth::{verify_login, Account, CredentialHasher, Username};
use tutorbook_core::DomainError;

use crate::store::{AccountStore, StoreError};

use super::{ServiceError, ServiceResult};

/// Registration and login for front-desk operators.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { accounts, hasher }
    }

    /// Store a new account with a hashed password.
    ///
    /// A taken username is reported by the store's uniqueness check and
    /// surfaces as `Conflict`.
    #[instrument(skip(self, password), err)]
    pub async fn register(&self, username: &str, password: &str) -> ServiceResult<Username> {
        let username = Username::parse(username)?;

        // argon2 is CPU-bound; keep it off the async workers.
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let name = username.clone();
        let account = tokio::task::spawn_blocking(move || {
            Account::register(name, &password, hasher.as_ref())
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("password hashing task failed: {e}")))??;

        match self.accounts.insert_account(account).await {
            Ok(()) => {
                info!(%username, "account registered");
                Ok(username)
            }
            Err(StoreError::Conflict(_)) => Err(DomainError::conflict(format!(
                "username '{username}' is already registered"
            ))
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    /// `true` only when the account exists and the password matches its hash.
    #[instrument(skip(self, password), err)]
    pub async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<bool> {
        let Ok(username) = Username::parse(username) else {
            return Ok(false);
        };
        let account = self.accounts.find_account(&username).await?;

        let hasher = self.hasher.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            verify_login(account.as_ref(), &password, hasher.as_ref())
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("password verification task failed: {e}")))
    }
}
