use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;

use tutorbook_auth::{Account, Username};
use tutorbook_core::{Batch, IndexNumber, RecordId, StudentId, Subject};
use tutorbook_roster::{AttendanceRecord, NewAttendance, NewStudent, Student};

use super::{AccountStore, AttendanceStore, StoreError, StudentStore};

#[derive(Debug, Default)]
struct Tables {
    students: Vec<Student>,
    attendance: Vec<AttendanceRecord>,
    accounts: HashMap<Username, Account>,
    last_student_id: i64,
    last_record_id: i64,
}

/// In-memory store for tests/dev. Rows live for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl StudentStore for InMemoryStore {
    async fn find_student(
        &self,
        index_number: &IndexNumber,
        batch: &Batch,
    ) -> Result<Option<Student>, StoreError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables
            .students
            .iter()
            .find(|s| &s.index_number == index_number && &s.batch == batch)
            .cloned())
    }

    async fn students_in_batch(&self, batch: &Batch) -> Result<Vec<Student>, StoreError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables
            .students
            .iter()
            .filter(|s| &s.batch == batch)
            .cloned()
            .collect())
    }

    async fn all_students(&self) -> Result<Vec<Student>, StoreError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables.students.clone())
    }

    async fn batches(&self) -> Result<Vec<Batch>, StoreError> {
        let tables = self.inner.read().map_err(poisoned)?;
        let mut batches: Vec<Batch> = tables.students.iter().map(|s| s.batch.clone()).collect();
        batches.sort();
        batches.dedup();
        Ok(batches)
    }

    async fn insert_student(&self, row: NewStudent) -> Result<Student, StoreError> {
        let mut tables = self.inner.write().map_err(poisoned)?;
        tables.last_student_id += 1;
        let student = row.into_student(StudentId::new(tables.last_student_id));
        tables.students.push(student.clone());
        Ok(student)
    }

    async fn update_student(&self, student: &Student) -> Result<(), StoreError> {
        let mut tables = self.inner.write().map_err(poisoned)?;
        match tables.students.iter_mut().find(|s| s.id == student.id) {
            Some(existing) => {
                *existing = student.clone();
                Ok(())
            }
            None => Err(StoreError::Backend(format!("no student row with id {}", student.id))),
        }
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn append(&self, entry: NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let mut tables = self.inner.write().map_err(poisoned)?;
        tables.last_record_id += 1;
        let record = entry.into_record(RecordId::new(tables.last_record_id));
        tables.attendance.push(record.clone());
        Ok(record)
    }

    async fn records_on(
        &self,
        batch: &Batch,
        subject: Subject,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables
            .attendance
            .iter()
            .filter(|r| r.matches(batch, subject, date))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let mut tables = self.inner.write().map_err(poisoned)?;
        match tables.accounts.entry(account.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "username '{}' already exists",
                account.username
            ))),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }

    async fn find_account(&self, username: &Username) -> Result<Option<Account>, StoreError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables.accounts.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_row(idx: &str, batch: &str) -> NewStudent {
        NewStudent {
            index_number: IndexNumber::parse(idx).unwrap(),
            name: format!("Student {idx}"),
            phone_number: "+94770000000".to_string(),
            batch: Batch::parse(batch).unwrap(),
            chemistry_enrolled: true,
            physics_enrolled: false,
        }
    }

    fn test_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn ids_are_assigned_in_sequence() {
        let store = InMemoryStore::new();
        let a = store.insert_student(test_row("S1", "B1")).await.unwrap();
        let b = store.insert_student(test_row("S2", "B1")).await.unwrap();
        assert_eq!(a.id, StudentId::new(1));
        assert_eq!(b.id, StudentId::new(2));
    }

    #[tokio::test]
    async fn find_student_returns_oldest_duplicate() {
        let store = InMemoryStore::new();
        let first = store.insert_student(test_row("S1", "B1")).await.unwrap();
        store.insert_student(test_row("S1", "B1")).await.unwrap();

        let found = store
            .find_student(&IndexNumber::parse("S1").unwrap(), &Batch::parse("B1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn batch_lookup_is_exact() {
        let store = InMemoryStore::new();
        store.insert_student(test_row("S1", "B1")).await.unwrap();
        store.insert_student(test_row("S1", "B2")).await.unwrap();
        store.insert_student(test_row("S2", "B1")).await.unwrap();

        let b1 = store.students_in_batch(&Batch::parse("B1").unwrap()).await.unwrap();
        assert_eq!(b1.len(), 2);
        let batches = store.batches().await.unwrap();
        assert_eq!(batches, vec![Batch::parse("B1").unwrap(), Batch::parse("B2").unwrap()]);
    }

    #[tokio::test]
    async fn update_of_unknown_row_fails() {
        let store = InMemoryStore::new();
        let ghost = test_row("S1", "B1").into_student(StudentId::new(42));
        assert!(matches!(
            store.update_student(&ghost).await,
            Err(StoreError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn records_on_filters_the_triple() {
        let store = InMemoryStore::new();
        let batch = Batch::parse("B1").unwrap();
        let at = test_day().and_hms_opt(10, 0, 0).unwrap();
        for (b, subject, when) in [
            ("B1", Subject::Chemistry, at),
            ("B1", Subject::Chemistry, at),
            ("B1", Subject::Physics, at),
            ("B2", Subject::Chemistry, at),
            ("B1", Subject::Chemistry, at + chrono::Duration::days(1)),
        ] {
            store
                .append(NewAttendance {
                    batch: Batch::parse(b).unwrap(),
                    index_number: IndexNumber::parse("S1").unwrap(),
                    subject,
                    recorded_at: when,
                })
                .await
                .unwrap();
        }

        let records = store.records_on(&batch, Subject::Chemistry, test_day()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].id < records[1].id);

        let present = store
            .present_index_numbers(&batch, Subject::Chemistry, test_day())
            .await
            .unwrap();
        assert_eq!(present.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = InMemoryStore::new();
        let account = Account {
            username: Username::parse("desk1").unwrap(),
            password_hash: "$argon2id$placeholder".to_string(),
        };
        store.insert_account(account.clone()).await.unwrap();
        assert!(matches!(
            store.insert_account(account).await,
            Err(StoreError::Conflict(_))
        ));
    }
}
