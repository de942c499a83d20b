use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, instrument, warn};

use tutorbook_core::{Batch, DomainError, IndexNumber, Subject};
use tutorbook_roster::{guardian_message, record_scan, AttendanceRecord};

use crate::notify::{send_bounded, Notifier};
use crate::store::{AttendanceStore, StudentStore};

use super::ServiceResult;

/// A card scan at the front desk.
#[derive(Debug, Clone)]
pub struct MarkAttendance {
    pub batch: String,
    pub index_number: String,
    pub subject: String,
    /// Server-local time of the scan.
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkOutcome {
    pub record: AttendanceRecord,
    /// Always true once the record is stored; delivery is not reported.
    pub notification_attempted: bool,
}

#[derive(Clone)]
pub struct AttendanceService {
    students: Arc<dyn StudentStore>,
    ledger: Arc<dyn AttendanceStore>,
    notifier: Arc<dyn Notifier>,
    notify_timeout: Duration,
}

impl AttendanceService {
    pub fn new(
        students: Arc<dyn StudentStore>,
        ledger: Arc<dyn AttendanceStore>,
        notifier: Arc<dyn Notifier>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            students,
            ledger,
            notifier,
            notify_timeout,
        }
    }

    /// Record a scan and notify the guardian.
    ///
    /// Fails with `NotFound` for an unknown `(index_number, batch)` and with
    /// `InvalidRequest` for an unknown subject or one the student has not
    /// taken; in both cases nothing is appended. Once the ledger append
    /// succeeds the call succeeds, whatever happens to the SMS.
    #[instrument(
        skip(self, cmd),
        fields(batch = %cmd.batch, index_number = %cmd.index_number, subject = %cmd.subject),
        err
    )]
    pub async fn mark(&self, cmd: MarkAttendance) -> ServiceResult<MarkOutcome> {
        let subject: Subject = cmd.subject.parse()?;
        let batch = Batch::parse(&cmd.batch)?;
        let index_number = IndexNumber::parse(&cmd.index_number)?;

        let student = self
            .students
            .find_student(&index_number, &batch)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("student {index_number} in batch {batch}"))
            })?;

        let entry = record_scan(&student, subject, cmd.recorded_at)?;
        let record = self.ledger.append(entry).await?;
        info!(record_id = %record.id, "attendance recorded");

        let body = guardian_message(&student.name, record.recorded_at);
        if let Err(e) = send_bounded(
            self.notifier.as_ref(),
            &student.phone_number,
            &body,
            self.notify_timeout,
        )
        .await
        {
            warn!(error = %e, "guardian notification failed; attendance kept");
        }

        Ok(MarkOutcome {
            record,
            notification_attempted: true,
        })
    }
}
