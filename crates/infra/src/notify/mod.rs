//! Outbound guardian notifications (SMS).
//!
//! The notifier is built once at startup from configuration and shared as
//! `Arc<dyn Notifier>`. Callers treat every send as best-effort.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::NotifierKind;

pub mod log;
pub mod twilio;

pub use log::LogNotifier;
pub use twilio::TwilioNotifier;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification timed out after {0:?}")]
    Timeout(Duration),

    #[error("notification transport failed: {0}")]
    Transport(String),

    #[error("provider rejected notification: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), NotifyError>;
}

/// Single send attempt bounded by `timeout`.
pub async fn send_bounded(
    notifier: &dyn Notifier,
    to: &str,
    body: &str,
    timeout: Duration,
) -> Result<(), NotifyError> {
    match tokio::time::timeout(timeout, notifier.send(to, body)).await {
        Ok(result) => result,
        Err(_) => Err(NotifyError::Timeout(timeout)),
    }
}

/// Construct the configured notifier.
pub fn build_notifier(kind: &NotifierKind, timeout: Duration) -> anyhow::Result<Arc<dyn Notifier>> {
    match kind {
        NotifierKind::Log => Ok(Arc::new(LogNotifier)),
        NotifierKind::Twilio(cfg) => Ok(Arc::new(TwilioNotifier::new(cfg, timeout)?)),
    }
}
