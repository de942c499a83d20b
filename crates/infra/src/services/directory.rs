use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use tutorbook_roster::{parse_row, ImportPolicy, ImportSummary, NewStudent, Student};

use crate::store::StudentStore;

use super::ServiceResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedStudent {
    pub student: Student,
    pub created: bool,
}

/// Writes to the student directory.
#[derive(Clone)]
pub struct DirectoryService {
    students: Arc<dyn StudentStore>,
}

impl DirectoryService {
    pub fn new(students: Arc<dyn StudentStore>) -> Self {
        Self { students }
    }

    /// Ingest tabular rows under `policy`.
    ///
    /// Short or malformed rows are skipped and counted. A storage failure
    /// aborts the run; rows written before it stay written.
    #[instrument(skip(self, rows), fields(rows = rows.len()), err)]
    pub async fn import(
        &self,
        rows: Vec<Vec<String>>,
        policy: ImportPolicy,
    ) -> ServiceResult<ImportSummary> {
        let mut summary = ImportSummary::default();

        for (line, cells) in rows.iter().enumerate() {
            let row = match parse_row(cells.as_slice()) {
                Ok(row) => row,
                Err(e) => {
                    debug!(line, error = %e, "skipping import row");
                    summary.skipped += 1;
                    continue;
                }
            };

            let created = match policy {
                ImportPolicy::Upsert => self.upsert(row).await?.created,
                ImportPolicy::InsertOnly => {
                    self.students.insert_student(row).await?;
                    true
                }
            };
            if created {
                summary.inserted += 1;
            } else {
                summary.updated += 1;
            }
        }

        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            skipped = summary.skipped,
            ?policy,
            "student import finished"
        );
        Ok(summary)
    }

    /// Add or update a single student keyed by `(index_number, batch)`.
    #[instrument(skip(self, row), fields(index_number = %row.index_number, batch = %row.batch), err)]
    pub async fn save_student(&self, row: NewStudent) -> ServiceResult<SavedStudent> {
        self.upsert(row).await
    }

    async fn upsert(&self, row: NewStudent) -> ServiceResult<SavedStudent> {
        match self
            .students
            .find_student(&row.index_number, &row.batch)
            .await?
        {
            Some(mut existing) => {
                existing.apply_profile(&row);
                self.students.update_student(&existing).await?;
                Ok(SavedStudent {
                    student: existing,
                    created: false,
                })
            }
            None => {
                let student = self.students.insert_student(row).await?;
                Ok(SavedStudent {
                    student,
                    created: true,
                })
            }
        }
    }
}
