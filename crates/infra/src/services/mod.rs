//! Application services: validate against the domain, persist through the
//! store traits, and fire notifications.

use thiserror::Error;

use tutorbook_core::DomainError;

use crate::store::StoreError;

pub mod accounts;
pub mod attendance;
pub mod broadcast;
pub mod directory;
pub mod roster;

pub use accounts::AccountService;
pub use attendance::{AttendanceService, MarkAttendance, MarkOutcome};
pub use broadcast::{BroadcastService, BroadcastSummary};
pub use directory::{DirectoryService, SavedStudent};
pub use roster::RosterQueryService;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced by the services to the HTTP layer.
///
/// Notification failures never appear here; they are logged and dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// A background task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}
