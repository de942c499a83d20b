//! Directory import rows and policies.
//!
//! A row is six string cells:
//! `indexNumber, name, phone, batch, chemistryFlag, physicsFlag`.
//! A flag cell is true only when it reads `1`.

use serde::{Deserialize, Serialize};

use tutorbook_core::{Batch, DomainError, DomainResult, IndexNumber};

use crate::NewStudent;

/// Minimum number of cells a row must carry.
pub const IMPORT_ROW_WIDTH: usize = 6;

/// How an import treats rows whose `(index_number, batch)` already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Overwrite the existing student's profile in place, insert otherwise.
    #[default]
    Upsert,
    /// Always insert a new row.
    InsertOnly,
}

/// Outcome counts of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

pub fn parse_flag(cell: &str) -> bool {
    cell.trim() == "1"
}

/// Turn raw cells into a student row.
///
/// Extra cells beyond the sixth are ignored.
pub fn parse_row<S: AsRef<str>>(cells: &[S]) -> DomainResult<NewStudent> {
    if cells.len() < IMPORT_ROW_WIDTH {
        return Err(DomainError::invalid(format!(
            "row has {} cells, expected at least {}",
            cells.len(),
            IMPORT_ROW_WIDTH
        )));
    }
    let cell = |i: usize| cells[i].as_ref();

    NewStudent::new(
        IndexNumber::parse(cell(0))?,
        cell(1),
        cell(2),
        Batch::parse(cell(3))?,
        parse_flag(cell(4)),
        parse_flag(cell(5)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_row() {
        let row = parse_row(&["S1", " Nimali ", "+9477", "2025", "1", "0"]).unwrap();
        assert_eq!(row.index_number.as_str(), "S1");
        assert_eq!(row.name, "Nimali");
        assert_eq!(row.batch.as_str(), "2025");
        assert!(row.chemistry_enrolled);
        assert!(!row.physics_enrolled);
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = parse_row(&["S1", "Nimali", "+9477", "2025", "1"]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));
    }

    #[test]
    fn blank_key_cells_are_rejected() {
        assert!(parse_row(&["", "Nimali", "+9477", "2025", "1", "1"]).is_err());
        assert!(parse_row(&["S1", "Nimali", "+9477", " ", "1", "1"]).is_err());
    }

    #[test]
    fn cells_wider_than_storage_are_rejected() {
        let err = parse_row(&["P2", "Kasun", "+9477", "BATCH-2025-A", "1", "0"]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));
        let long_name = "x".repeat(crate::student::MAX_NAME_LEN + 1);
        assert!(parse_row(&["P2", long_name.as_str(), "+9477", "B1", "1", "0"]).is_err());
    }

    #[test]
    fn only_one_means_enrolled() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn default_policy_is_upsert() {
        assert_eq!(ImportPolicy::default(), ImportPolicy::Upsert);
    }
}
