use std::sync::Arc;

use chrono::NaiveDate;
use tracing::instrument;

use tutorbook_core::{Batch, Subject};
use tutorbook_roster::{absentees, AttendanceRecord, Student};

use crate::store::{AttendanceStore, StudentStore};

use super::ServiceResult;

/// Read-side queries over the directory and the ledger.
#[derive(Clone)]
pub struct RosterQueryService {
    students: Arc<dyn StudentStore>,
    ledger: Arc<dyn AttendanceStore>,
}

impl RosterQueryService {
    pub fn new(students: Arc<dyn StudentStore>, ledger: Arc<dyn AttendanceStore>) -> Self {
        Self { students, ledger }
    }

    /// Students of `batch` enrolled in `subject` with no scan on `date`.
    ///
    /// Directory order is preserved; an empty batch yields an empty list.
    #[instrument(skip(self), err)]
    pub async fn absentees(
        &self,
        batch: &str,
        subject: &str,
        date: NaiveDate,
    ) -> ServiceResult<Vec<Student>> {
        let subject: Subject = subject.parse()?;
        let batch = Batch::parse(batch)?;

        let students = self.students.students_in_batch(&batch).await?;
        let present = self
            .ledger
            .present_index_numbers(&batch, subject, date)
            .await?;
        Ok(absentees(students, subject, &present))
    }

    /// Every scan for the triple, duplicates included.
    #[instrument(skip(self), err)]
    pub async fn attendance_records(
        &self,
        batch: &str,
        subject: &str,
        date: NaiveDate,
    ) -> ServiceResult<Vec<AttendanceRecord>> {
        let subject: Subject = subject.parse()?;
        let batch = Batch::parse(batch)?;
        Ok(self.ledger.records_on(&batch, subject, date).await?)
    }

    pub async fn students(&self, batch: Option<&str>) -> ServiceResult<Vec<Student>> {
        match batch {
            Some(raw) => {
                let batch = Batch::parse(raw)?;
                Ok(self.students.students_in_batch(&batch).await?)
            }
            None => Ok(self.students.all_students().await?),
        }
    }

    pub async fn batches(&self) -> ServiceResult<Vec<Batch>> {
        Ok(self.students.batches().await?)
    }
}
