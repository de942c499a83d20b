//! Roster domain module (students, attendance ledger entries, absentees).
//!
//! This crate contains the attendance rules as deterministic domain logic
//! (no IO, no HTTP, no storage). Stores and notifiers live in `tutorbook-infra`.

pub mod absentees;
pub mod attendance;
pub mod import;
pub mod student;

pub use absentees::{absentees, present_index_numbers};
pub use attendance::{guardian_message, record_scan, AttendanceRecord, NewAttendance};
pub use import::{parse_flag, parse_row, ImportPolicy, ImportSummary, IMPORT_ROW_WIDTH};
pub use student::{NewStudent, Student};
