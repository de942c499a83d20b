use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use tutorbook_core::{Batch, DomainResult, IndexNumber, RecordId, Subject};

use crate::Student;

/// One scan in the append-only attendance ledger.
///
/// `recorded_at` is server-local wall-clock time; presence on a day is the
/// calendar date of this timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub batch: Batch,
    pub index_number: IndexNumber,
    pub subject: Subject,
    pub recorded_at: NaiveDateTime,
}

impl AttendanceRecord {
    pub fn date(&self) -> NaiveDate {
        self.recorded_at.date()
    }

    pub fn matches(&self, batch: &Batch, subject: Subject, date: NaiveDate) -> bool {
        &self.batch == batch && self.subject == subject && self.date() == date
    }
}

/// A ledger entry ready to be appended (not yet assigned a record id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttendance {
    pub batch: Batch,
    pub index_number: IndexNumber,
    pub subject: Subject,
    pub recorded_at: NaiveDateTime,
}

impl NewAttendance {
    pub fn into_record(self, id: RecordId) -> AttendanceRecord {
        AttendanceRecord {
            id,
            batch: self.batch,
            index_number: self.index_number,
            subject: self.subject,
            recorded_at: self.recorded_at,
        }
    }
}

/// Validate a scan for `student` and build the ledger entry for it.
///
/// Fails with `InvalidRequest` when the student has not taken `subject`.
pub fn record_scan(
    student: &Student,
    subject: Subject,
    recorded_at: NaiveDateTime,
) -> DomainResult<NewAttendance> {
    student.ensure_enrolled(subject)?;
    Ok(NewAttendance {
        batch: student.batch.clone(),
        index_number: student.index_number.clone(),
        subject,
        recorded_at,
    })
}

/// SMS body sent to the guardian when a scan is recorded.
pub fn guardian_message(student_name: &str, recorded_at: NaiveDateTime) -> String {
    format!(
        "Your daughter {} is in the tuition at {}.",
        student_name,
        recorded_at.format("%I:%M %p")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewStudent;
    use tutorbook_core::{DomainError, StudentId};

    fn test_student(chem: bool, phys: bool) -> Student {
        NewStudent {
            index_number: IndexNumber::parse("S1").unwrap(),
            name: "Nimali".to_string(),
            phone_number: "+94770000001".to_string(),
            batch: Batch::parse("B1").unwrap(),
            chemistry_enrolled: chem,
            physics_enrolled: phys,
        }
        .into_student(StudentId::new(1))
    }

    fn test_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(15, 5, 0)
            .unwrap()
    }

    #[test]
    fn record_scan_copies_student_key() {
        let student = test_student(true, false);
        let entry = record_scan(&student, Subject::Chemistry, test_time()).unwrap();
        assert_eq!(entry.batch, student.batch);
        assert_eq!(entry.index_number, student.index_number);
        assert_eq!(entry.subject, Subject::Chemistry);
        assert_eq!(entry.recorded_at, test_time());
    }

    #[test]
    fn record_scan_rejects_subject_not_taken() {
        let student = test_student(true, false);
        let err = record_scan(&student, Subject::Physics, test_time()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));
    }

    #[test]
    fn matches_uses_calendar_date() {
        let student = test_student(true, true);
        let record = record_scan(&student, Subject::Physics, test_time())
            .unwrap()
            .into_record(RecordId::new(1));
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        assert!(record.matches(&student.batch, Subject::Physics, day));
        assert!(!record.matches(&student.batch, Subject::Physics, next_day));
        assert!(!record.matches(&student.batch, Subject::Chemistry, day));
        assert!(!record.matches(&Batch::parse("B2").unwrap(), Subject::Physics, day));
    }

    #[test]
    fn guardian_message_uses_twelve_hour_clock() {
        assert_eq!(
            guardian_message("Nimali", test_time()),
            "Your daughter Nimali is in the tuition at 03:05 PM."
        );
    }
}
