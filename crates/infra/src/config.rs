//! Process configuration loaded from the environment at startup.
//!
//! | variable | default |
//! |---|---|
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `STORAGE_BACKEND` | `memory` (`memory` \| `postgres`) |
//! | `DATABASE_URL` | required for `postgres` |
//! | `CORS_ALLOWED_ORIGINS` | `http://localhost:3000,http://localhost:3001` |
//! | `NOTIFIER` | `log` (`log` \| `twilio`) |
//! | `TWILIO_ACCOUNT_SID` / `TWILIO_AUTH_TOKEN` / `TWILIO_FROM_NUMBER` | required for `twilio` |
//! | `NOTIFY_TIMEOUT_MS` | `5000` |

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::info;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";
const DEFAULT_NOTIFY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres { database_url: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl core::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierKind {
    /// Log messages instead of sending them.
    Log,
    Twilio(TwilioConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub cors_allowed_origins: Vec<String>,
    pub notifier: NotifierKind,
    pub notify_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            storage: StorageBackend::Memory,
            cors_allowed_origins: split_origins(DEFAULT_CORS_ORIGINS),
            notifier: NotifierKind::Log,
            notify_timeout: Duration::from_millis(DEFAULT_NOTIFY_TIMEOUT_MS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| {
                info!("{key} not set, using default: {default}");
                default.to_string()
            })
        };
        let required = |key: &str| -> anyhow::Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} must be set"))
        };

        let bind_addr = var("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse()
            .context("BIND_ADDR is not a socket address")?;

        let storage = match var("STORAGE_BACKEND", "memory").trim().to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "postgres" => StorageBackend::Postgres {
                database_url: required("DATABASE_URL")?,
            },
            other => bail!("STORAGE_BACKEND must be one of: memory, postgres (got '{other}')"),
        };

        let notifier = match var("NOTIFIER", "log").trim().to_lowercase().as_str() {
            "log" => NotifierKind::Log,
            "twilio" => NotifierKind::Twilio(TwilioConfig {
                account_sid: required("TWILIO_ACCOUNT_SID")?,
                auth_token: required("TWILIO_AUTH_TOKEN")?,
                from_number: required("TWILIO_FROM_NUMBER")?,
            }),
            other => bail!("NOTIFIER must be one of: log, twilio (got '{other}')"),
        };

        let notify_timeout_ms: u64 = var("NOTIFY_TIMEOUT_MS", &DEFAULT_NOTIFY_TIMEOUT_MS.to_string())
            .parse()
            .context("NOTIFY_TIMEOUT_MS is not a whole number of milliseconds")?;
        if notify_timeout_ms == 0 {
            bail!("NOTIFY_TIMEOUT_MS must be greater than zero");
        }

        let cors_allowed_origins = split_origins(&var("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ORIGINS));

        Ok(Self {
            bind_addr,
            storage,
            cors_allowed_origins,
            notifier,
            notify_timeout: Duration::from_millis(notify_timeout_ms),
        })
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
