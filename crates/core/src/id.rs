//! Identifiers and labels used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Cohort label students attend tuition with (e.g. `"2025"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch(String);

/// Enrollment identifier printed on a student's card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexNumber(String);

/// Store-assigned surrogate key of a student row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(i64);

/// Sequence number of an attendance record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

macro_rules! impl_label_newtype {
    ($t:ty, $name:literal, $max:expr) => {
        impl $t {
            /// Longest accepted label, in characters (the storage column width).
            pub const MAX_LEN: usize = $max;

            /// Build a label, trimming surrounding whitespace.
            ///
            /// Fails if nothing is left after trimming or the label is longer
            /// than `MAX_LEN`.
            pub fn parse(raw: &str) -> Result<Self, DomainError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid(concat!($name, " must not be empty")));
                }
                ensure_max_len($name, trimmed, Self::MAX_LEN)?;
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

macro_rules! impl_seq_newtype {
    ($t:ty) => {
        impl $t {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

/// Reject `value` when it has more than `max` characters.
pub fn ensure_max_len(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::invalid(format!(
            "{field} is {len} characters long, at most {max} allowed"
        )));
    }
    Ok(())
}

impl_label_newtype!(Batch, "batch", 10);
impl_label_newtype!(IndexNumber, "index number", 20);
impl_seq_newtype!(StudentId);
impl_seq_newtype!(RecordId);
