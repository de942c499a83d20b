use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use tutorbook_core::{Batch, DomainError};

use crate::notify::{send_bounded, Notifier};
use crate::store::StudentStore;

use super::ServiceResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BroadcastSummary {
    pub recipients: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Free-text announcements to every guardian in a batch.
#[derive(Clone)]
pub struct BroadcastService {
    students: Arc<dyn StudentStore>,
    notifier: Arc<dyn Notifier>,
    notify_timeout: Duration,
}

impl BroadcastService {
    pub fn new(
        students: Arc<dyn StudentStore>,
        notifier: Arc<dyn Notifier>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            students,
            notifier,
            notify_timeout,
        }
    }

    /// One bounded attempt per student; failures are counted, not returned.
    #[instrument(skip(self, message), err)]
    pub async fn broadcast(&self, batch: &str, message: &str) -> ServiceResult<BroadcastSummary> {
        let batch = Batch::parse(batch)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(DomainError::invalid("message must not be empty").into());
        }

        let students = self.students.students_in_batch(&batch).await?;
        let mut summary = BroadcastSummary {
            recipients: students.len(),
            ..BroadcastSummary::default()
        };

        for student in &students {
            match send_bounded(
                self.notifier.as_ref(),
                &student.phone_number,
                message,
                self.notify_timeout,
            )
            .await
            {
                Ok(()) => summary.delivered += 1,
                Err(e) => {
                    warn!(index_number = %student.index_number, error = %e, "broadcast message failed");
                    summary.failed += 1;
                }
            }
        }

        info!(
            recipients = summary.recipients,
            delivered = summary.delivered,
            failed = summary.failed,
            "broadcast finished"
        );
        Ok(summary)
    }
}
