//! `tutorbook-auth`: operator accounts and credential hashing.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod account;
pub mod password;

pub use account::{verify_login, Account, Username};
pub use password::{Argon2Hasher, CredentialHasher, HashError};
