use async_trait::async_trait;

use super::{Notifier, NotifyError};

/// Development notifier: writes the message to the log instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(to, body, "notification (log only)");
        Ok(())
    }
}
