//! Subjects taught at the center.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Closed set of subjects a student can enroll in.
///
/// Parsing is case-insensitive; anything outside the set is rejected rather
/// than treated as "not enrolled".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Chemistry,
    Physics,
}

impl Subject {
    pub const ALL: [Subject; 2] = [Subject::Chemistry, Subject::Physics];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Chemistry => "chemistry",
            Subject::Physics => "physics",
        }
    }
}

impl core::fmt::Display for Subject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chemistry" => Ok(Subject::Chemistry),
            "physics" => Ok(Subject::Physics),
            other => Err(DomainError::invalid(format!(
                "unknown subject '{other}'; must be one of: chemistry, physics"
            ))),
        }
    }
}
