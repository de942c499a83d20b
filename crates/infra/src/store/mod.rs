//! Storage boundary for the student directory, the attendance ledger and
//! operator accounts.
//!
//! Services only see these traits; `InMemoryStore` backs dev/tests and
//! `PostgresStore` backs production.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use tutorbook_auth::{Account, Username};
use tutorbook_core::{Batch, IndexNumber, Subject};
use tutorbook_roster::{AttendanceRecord, NewAttendance, NewStudent, Student};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Anything else the backend reported (connection, decode, poisoned lock).
    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Oldest student row matching the key, if any.
    async fn find_student(
        &self,
        index_number: &IndexNumber,
        batch: &Batch,
    ) -> Result<Option<Student>, StoreError>;

    /// Students of one batch in insertion order.
    async fn students_in_batch(&self, batch: &Batch) -> Result<Vec<Student>, StoreError>;

    async fn all_students(&self) -> Result<Vec<Student>, StoreError>;

    /// Distinct batch labels, ascending.
    async fn batches(&self) -> Result<Vec<Batch>, StoreError>;

    async fn insert_student(&self, row: NewStudent) -> Result<Student, StoreError>;

    /// Persist the mutable fields of an existing row (matched by `id`).
    async fn update_student(&self, student: &Student) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn append(&self, entry: NewAttendance) -> Result<AttendanceRecord, StoreError>;

    /// Every record for the triple, duplicates included, by ascending id.
    async fn records_on(
        &self,
        batch: &Batch,
        subject: Subject,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn present_index_numbers(
        &self,
        batch: &Batch,
        subject: Subject,
        date: NaiveDate,
    ) -> Result<HashSet<IndexNumber>, StoreError> {
        let records = self.records_on(batch, subject, date).await?;
        Ok(tutorbook_roster::present_index_numbers(&records))
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `StoreError::Conflict` when the username is taken.
    async fn insert_account(&self, account: Account) -> Result<(), StoreError>;

    async fn find_account(&self, username: &Username) -> Result<Option<Account>, StoreError>;
}
