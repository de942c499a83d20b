//! `tutorbook-core`: shared value types for the tuition attendance domain.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod subject;

pub use error::{DomainError, DomainResult};
pub use id::{ensure_max_len, Batch, IndexNumber, RecordId, StudentId};
pub use subject::Subject;
