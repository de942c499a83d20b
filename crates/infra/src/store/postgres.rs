//! Postgres-backed store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | any other | `Backend` |
//! | everything else | N/A | `Backend` |
//!
//! Timestamps are stored as `TIMESTAMP` (no zone) holding server-local time,
//! so a day query is a half-open range on `recorded_at`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::instrument;

use tutorbook_auth::{Account, Username};
use tutorbook_core::{Batch, IndexNumber, RecordId, StudentId, Subject};
use tutorbook_roster::{AttendanceRecord, NewAttendance, NewStudent, Student};

use super::{AccountStore, AttendanceStore, StoreError, StudentStore};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS students (
        id              BIGSERIAL PRIMARY KEY,
        index_number    VARCHAR(20)  NOT NULL,
        name            VARCHAR(100) NOT NULL,
        phone_no        VARCHAR(20)  NOT NULL,
        batch           VARCHAR(10)  NOT NULL,
        chemistry_taken BOOLEAN      NOT NULL DEFAULT FALSE,
        physics_taken   BOOLEAN      NOT NULL DEFAULT FALSE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS students_batch_index_idx ON students (batch, index_number)",
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id           BIGSERIAL PRIMARY KEY,
        batch        VARCHAR(10) NOT NULL,
        index_number VARCHAR(20) NOT NULL,
        subject      VARCHAR(16) NOT NULL CHECK (subject IN ('chemistry', 'physics')),
        recorded_at  TIMESTAMP   NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS attendance_day_idx ON attendance (batch, subject, recorded_at)",
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        username      VARCHAR(100) PRIMARY KEY,
        password_hash TEXT         NOT NULL
    )
    "#,
];

const STUDENT_COLUMNS: &str =
    "id, index_number, name, phone_no, batch, chemistry_taken, physics_taken";

/// Postgres-backed store for students, attendance and accounts.
///
/// `PgPool` is internally reference counted, so cloning the store is cheap.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }

    /// Wait for checked-out connections to return, then close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[async_trait]
impl StudentStore for PostgresStore {
    async fn find_student(
        &self,
        index_number: &IndexNumber,
        batch: &Batch,
    ) -> Result<Option<Student>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students \
             WHERE index_number = $1 AND batch = $2 ORDER BY id ASC LIMIT 1"
        ))
        .bind(index_number.as_str())
        .bind(batch.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_student", e))?;

        row.as_ref().map(student_from_row).transpose()
    }

    async fn students_in_batch(&self, batch: &Batch) -> Result<Vec<Student>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE batch = $1 ORDER BY id ASC"
        ))
        .bind(batch.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("students_in_batch", e))?;

        rows.iter().map(student_from_row).collect()
    }

    async fn all_students(&self) -> Result<Vec<Student>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("all_students", e))?;

        rows.iter().map(student_from_row).collect()
    }

    async fn batches(&self) -> Result<Vec<Batch>, StoreError> {
        let rows = sqlx::query("SELECT DISTINCT batch FROM students ORDER BY batch ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("batches", e))?;

        rows.iter()
            .map(|r| {
                let raw: String = r.try_get("batch").map_err(|e| map_sqlx_error("batches", e))?;
                Batch::parse(&raw).map_err(|e| StoreError::Backend(e.to_string()))
            })
            .collect()
    }

    async fn insert_student(&self, row: NewStudent) -> Result<Student, StoreError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO students (index_number, name, phone_no, batch, chemistry_taken, physics_taken)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(row.index_number.as_str())
        .bind(&row.name)
        .bind(&row.phone_number)
        .bind(row.batch.as_str())
        .bind(row.chemistry_enrolled)
        .bind(row.physics_enrolled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_student", e))?;

        let id: i64 = inserted
            .try_get("id")
            .map_err(|e| map_sqlx_error("insert_student", e))?;
        Ok(row.into_student(StudentId::new(id)))
    }

    async fn update_student(&self, student: &Student) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET name = $2, phone_no = $3, chemistry_taken = $4, physics_taken = $5
            WHERE id = $1
            "#,
        )
        .bind(student.id.get())
        .bind(&student.name)
        .bind(&student.phone_number)
        .bind(student.chemistry_enrolled)
        .bind(student.physics_enrolled)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_student", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Backend(format!("no student row with id {}", student.id)));
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceStore for PostgresStore {
    async fn append(&self, entry: NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO attendance (batch, index_number, subject, recorded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(entry.batch.as_str())
        .bind(entry.index_number.as_str())
        .bind(entry.subject.as_str())
        .bind(entry.recorded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("append_attendance", e))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("append_attendance", e))?;
        Ok(entry.into_record(RecordId::new(id)))
    }

    async fn records_on(
        &self,
        batch: &Batch,
        subject: Subject,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let (start, end) = day_bounds(date)?;
        let rows = sqlx::query(
            r#"
            SELECT id, batch, index_number, subject, recorded_at
            FROM attendance
            WHERE batch = $1 AND subject = $2 AND recorded_at >= $3 AND recorded_at < $4
            ORDER BY id ASC
            "#,
        )
        .bind(batch.as_str())
        .bind(subject.as_str())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("records_on", e))?;

        rows.iter().map(record_from_row).collect()
    }

    async fn present_index_numbers(
        &self,
        batch: &Batch,
        subject: Subject,
        date: NaiveDate,
    ) -> Result<HashSet<IndexNumber>, StoreError> {
        let (start, end) = day_bounds(date)?;
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT index_number
            FROM attendance
            WHERE batch = $1 AND subject = $2 AND recorded_at >= $3 AND recorded_at < $4
            "#,
        )
        .bind(batch.as_str())
        .bind(subject.as_str())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("present_index_numbers", e))?;

        rows.iter()
            .map(|r| {
                let raw: String = r
                    .try_get("index_number")
                    .map_err(|e| map_sqlx_error("present_index_numbers", e))?;
                IndexNumber::parse(&raw).map_err(|e| StoreError::Backend(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO accounts (username, password_hash) VALUES ($1, $2)")
            .bind(account.username.as_str())
            .bind(&account.password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_account", e))?;
        Ok(())
    }

    async fn find_account(&self, username: &Username) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query("SELECT username, password_hash FROM accounts WHERE username = $1")
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_account", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw_username: String = row
            .try_get("username")
            .map_err(|e| map_sqlx_error("find_account", e))?;
        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| map_sqlx_error("find_account", e))?;
        Ok(Some(Account {
            username: Username::parse(&raw_username)
                .map_err(|e| StoreError::Backend(e.to_string()))?,
            password_hash,
        }))
    }
}

fn day_bounds(date: NaiveDate) -> Result<(chrono::NaiveDateTime, chrono::NaiveDateTime), StoreError> {
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| StoreError::Backend(format!("date out of range: {date}")))?;
    Ok((date.and_time(chrono::NaiveTime::MIN), next.and_time(chrono::NaiveTime::MIN)))
}

fn student_from_row(row: &PgRow) -> Result<Student, StoreError> {
    let decode = |e| map_sqlx_error("decode_student", e);
    let index_number: String = row.try_get("index_number").map_err(decode)?;
    let batch: String = row.try_get("batch").map_err(decode)?;
    Ok(Student {
        id: StudentId::new(row.try_get("id").map_err(decode)?),
        index_number: IndexNumber::parse(&index_number)
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        name: row.try_get("name").map_err(decode)?,
        phone_number: row.try_get("phone_no").map_err(decode)?,
        batch: Batch::parse(&batch).map_err(|e| StoreError::Backend(e.to_string()))?,
        chemistry_enrolled: row.try_get("chemistry_taken").map_err(decode)?,
        physics_enrolled: row.try_get("physics_taken").map_err(decode)?,
    })
}

fn record_from_row(row: &PgRow) -> Result<AttendanceRecord, StoreError> {
    let decode = |e| map_sqlx_error("decode_attendance", e);
    let batch: String = row.try_get("batch").map_err(decode)?;
    let index_number: String = row.try_get("index_number").map_err(decode)?;
    let subject: String = row.try_get("subject").map_err(decode)?;
    Ok(AttendanceRecord {
        id: RecordId::new(row.try_get("id").map_err(decode)?),
        batch: Batch::parse(&batch).map_err(|e| StoreError::Backend(e.to_string()))?,
        index_number: IndexNumber::parse(&index_number)
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        subject: subject
            .parse()
            .map_err(|e: tutorbook_core::DomainError| StoreError::Backend(e.to_string()))?,
        recorded_at: row.try_get("recorded_at").map_err(decode)?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn close_shuts_the_pool() {
        // Lazy pools never dial out, so no server is needed.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://tutorbook@localhost/tutorbook")
            .unwrap();
        let store = PostgresStore::new(pool);
        let shared = store.clone();

        assert!(!shared.is_closed());
        store.close().await;
        assert!(shared.is_closed());
    }

    #[test]
    fn day_bounds_cover_one_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let (start, end) = day_bounds(day).unwrap();
        assert_eq!(start.to_string(), "2024-02-28 00:00:00");
        assert_eq!(end.to_string(), "2024-02-29 00:00:00");
    }

    #[test]
    fn pool_closed_maps_to_backend() {
        assert!(matches!(
            map_sqlx_error("append_attendance", sqlx::Error::PoolClosed),
            StoreError::Backend(_)
        ));
    }
}
