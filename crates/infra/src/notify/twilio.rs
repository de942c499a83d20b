//! Twilio Programmable Messaging client.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::TwilioConfig;

use super::{Notifier, NotifyError};

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Sends SMS through Twilio's REST API (`Messages.json`, form-encoded).
#[derive(Debug, Clone)]
pub struct TwilioNotifier {
    client: reqwest::Client,
    messages_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioNotifier {
    pub fn new(cfg: &TwilioConfig, timeout: Duration) -> Result<Self, NotifyError> {
        Self::with_api_base(cfg, timeout, DEFAULT_API_BASE)
    }

    /// Point the client at a different API host (used by tests).
    pub fn with_api_base(
        cfg: &TwilioConfig,
        timeout: Duration,
        api_base: &str,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            messages_url: format!(
                "{}/2010-04-01/Accounts/{}/Messages.json",
                api_base.trim_end_matches('/'),
                cfg.account_sid
            ),
            account_sid: cfg.account_sid.clone(),
            auth_token: cfg.auth_token.clone(),
            from_number: cfg.from_number.clone(),
        })
    }

    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        let res = self
            .client
            .post(&self.messages_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected(format!("{status}: {detail}")));
        }
        Ok(())
    }
}
