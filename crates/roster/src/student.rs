use serde::{Deserialize, Serialize};

use tutorbook_core::{ensure_max_len, Batch, DomainError, DomainResult, IndexNumber, StudentId, Subject};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 20;

/// A student enrolled at the center.
///
/// Identity for lookups is `(index_number, batch)`; `id` is the store's
/// surrogate key and only orders rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub index_number: IndexNumber,
    pub name: String,
    pub phone_number: String,
    pub batch: Batch,
    pub chemistry_enrolled: bool,
    pub physics_enrolled: bool,
}

impl Student {
    pub fn is_enrolled(&self, subject: Subject) -> bool {
        match subject {
            Subject::Chemistry => self.chemistry_enrolled,
            Subject::Physics => self.physics_enrolled,
        }
    }

    pub fn ensure_enrolled(&self, subject: Subject) -> DomainResult<()> {
        if !self.is_enrolled(subject) {
            return Err(DomainError::invalid(format!(
                "student {} has not taken {}",
                self.index_number, subject
            )));
        }
        Ok(())
    }

    /// Overwrite the mutable profile fields from an incoming row.
    ///
    /// Index number and batch are the lookup key and stay untouched.
    pub fn apply_profile(&mut self, row: &NewStudent) {
        self.name = row.name.clone();
        self.phone_number = row.phone_number.clone();
        self.chemistry_enrolled = row.chemistry_enrolled;
        self.physics_enrolled = row.physics_enrolled;
    }
}

/// A student row that has not been assigned a store id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub index_number: IndexNumber,
    pub name: String,
    pub phone_number: String,
    pub batch: Batch,
    pub chemistry_enrolled: bool,
    pub physics_enrolled: bool,
}

impl NewStudent {
    /// Build a row, trimming `name` and `phone_number` and checking them
    /// against the storage column widths.
    pub fn new(
        index_number: IndexNumber,
        name: &str,
        phone_number: &str,
        batch: Batch,
        chemistry_enrolled: bool,
        physics_enrolled: bool,
    ) -> DomainResult<Self> {
        let name = name.trim();
        let phone_number = phone_number.trim();
        ensure_max_len("name", name, MAX_NAME_LEN)?;
        ensure_max_len("phone number", phone_number, MAX_PHONE_LEN)?;
        Ok(Self {
            index_number,
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            batch,
            chemistry_enrolled,
            physics_enrolled,
        })
    }

    pub fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            index_number: self.index_number,
            name: self.name,
            phone_number: self.phone_number,
            batch: self.batch,
            chemistry_enrolled: self.chemistry_enrolled,
            physics_enrolled: self.physics_enrolled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_row(chem: bool, phys: bool) -> NewStudent {
        NewStudent {
            index_number: IndexNumber::parse("S1").unwrap(),
            name: "Nimali".to_string(),
            phone_number: "+94770000001".to_string(),
            batch: Batch::parse("B1").unwrap(),
            chemistry_enrolled: chem,
            physics_enrolled: phys,
        }
    }

    #[test]
    fn enrollment_follows_flags() {
        let student = test_row(true, false).into_student(StudentId::new(1));
        assert!(student.is_enrolled(Subject::Chemistry));
        assert!(!student.is_enrolled(Subject::Physics));
        assert!(student.ensure_enrolled(Subject::Chemistry).is_ok());
        assert!(matches!(
            student.ensure_enrolled(Subject::Physics),
            Err(DomainError::InvalidRequest(_))
        ));
    }

    #[test]
    fn new_rejects_values_wider_than_storage() {
        let build = |name: &str, phone: &str| {
            NewStudent::new(
                IndexNumber::parse("S1").unwrap(),
                name,
                phone,
                Batch::parse("B1").unwrap(),
                true,
                false,
            )
        };

        let row = build(" Nimali ", " +94770000001 ").unwrap();
        assert_eq!(row.name, "Nimali");
        assert_eq!(row.phone_number, "+94770000001");

        assert!(matches!(
            build(&"n".repeat(MAX_NAME_LEN + 1), "+9477"),
            Err(DomainError::InvalidRequest(_))
        ));
        assert!(matches!(
            build("Nimali", "+94 77 000 0001 ext 12"),
            Err(DomainError::InvalidRequest(_))
        ));
    }

    #[test]
    fn apply_profile_keeps_identity() {
        let mut student = test_row(true, false).into_student(StudentId::new(4));
        let mut update = test_row(false, true);
        update.name = "Nimali Perera".to_string();
        update.phone_number = "+94770000099".to_string();

        student.apply_profile(&update);

        assert_eq!(student.id, StudentId::new(4));
        assert_eq!(student.index_number.as_str(), "S1");
        assert_eq!(student.name, "Nimali Perera");
        assert_eq!(student.phone_number, "+94770000099");
        assert!(!student.chemistry_enrolled);
        assert!(student.physics_enrolled);
    }
}
