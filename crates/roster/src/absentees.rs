//! Absentee computation (set difference over the directory and the ledger).

use std::collections::HashSet;

use tutorbook_core::{IndexNumber, Subject};

use crate::{AttendanceRecord, Student};

/// Distinct index numbers that appear in `records`.
pub fn present_index_numbers<'a, I>(records: I) -> HashSet<IndexNumber>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    records.into_iter().map(|r| r.index_number.clone()).collect()
}

/// Students enrolled in `subject` whose index number is not in `present`.
///
/// Input order is preserved. Students who never took `subject` are excluded
/// up front rather than reported absent.
pub fn absentees(
    students: Vec<Student>,
    subject: Subject,
    present: &HashSet<IndexNumber>,
) -> Vec<Student> {
    students
        .into_iter()
        .filter(|s| s.is_enrolled(subject) && !present.contains(&s.index_number))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewStudent;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use tutorbook_core::{Batch, RecordId, StudentId};

    fn test_student(id: i64, idx: &str, chem: bool, phys: bool) -> Student {
        NewStudent {
            index_number: IndexNumber::parse(idx).unwrap(),
            name: format!("Student {idx}"),
            phone_number: "+94770000000".to_string(),
            batch: Batch::parse("B1").unwrap(),
            chemistry_enrolled: chem,
            physics_enrolled: phys,
        }
        .into_student(StudentId::new(id))
    }

    fn test_record(id: i64, idx: &str, subject: Subject) -> AttendanceRecord {
        AttendanceRecord {
            id: RecordId::new(id),
            batch: Batch::parse("B1").unwrap(),
            index_number: IndexNumber::parse(idx).unwrap(),
            subject,
            recorded_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    fn indexes(students: &[Student]) -> Vec<&str> {
        students.iter().map(|s| s.index_number.as_str()).collect()
    }

    #[test]
    fn duplicate_scans_collapse_to_one_presence() {
        let records = vec![
            test_record(1, "S1", Subject::Chemistry),
            test_record(2, "S1", Subject::Chemistry),
        ];
        let present = present_index_numbers(&records);
        assert_eq!(present.len(), 1);
    }

    #[test]
    fn worked_example_chemistry_and_physics() {
        let students = vec![
            test_student(1, "S1", true, false),
            test_student(2, "S2", true, true),
        ];
        let present = present_index_numbers(&[test_record(1, "S1", Subject::Chemistry)]);

        let chem = absentees(students.clone(), Subject::Chemistry, &present);
        assert_eq!(indexes(&chem), vec!["S2"]);

        // S1 never took physics, so it is filtered out before the difference.
        let phys = absentees(students, Subject::Physics, &HashSet::new());
        assert_eq!(indexes(&phys), vec!["S2"]);
    }

    #[test]
    fn preserves_directory_order() {
        let students = vec![
            test_student(1, "S3", true, false),
            test_student(2, "S1", true, false),
            test_student(3, "S2", true, false),
        ];
        let out = absentees(students, Subject::Chemistry, &HashSet::new());
        assert_eq!(indexes(&out), vec!["S3", "S1", "S2"]);
    }

    #[test]
    fn empty_directory_yields_empty_list() {
        let out = absentees(Vec::new(), Subject::Physics, &HashSet::new());
        assert!(out.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: absentees and present students partition the students
        /// enrolled in the subject.
        #[test]
        fn absentees_and_present_cover_enrolled(
            flags in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 0..40),
            physics in any::<bool>(),
        ) {
            let subject = if physics { Subject::Physics } else { Subject::Chemistry };
            let students: Vec<Student> = flags
                .iter()
                .enumerate()
                .map(|(i, (chem, phys, _))| test_student(i as i64 + 1, &format!("S{i}"), *chem, *phys))
                .collect();
            let records: Vec<AttendanceRecord> = flags
                .iter()
                .enumerate()
                .filter(|(_, (_, _, scanned))| *scanned)
                .map(|(i, _)| test_record(i as i64 + 1, &format!("S{i}"), subject))
                .collect();
            let present = present_index_numbers(&records);

            let absent = absentees(students.clone(), subject, &present);

            let enrolled: HashSet<IndexNumber> = students
                .iter()
                .filter(|s| s.is_enrolled(subject))
                .map(|s| s.index_number.clone())
                .collect();
            let absent_set: HashSet<IndexNumber> =
                absent.iter().map(|s| s.index_number.clone()).collect();
            let present_enrolled: HashSet<IndexNumber> =
                enrolled.intersection(&present).cloned().collect();

            prop_assert!(absent_set.is_disjoint(&present));
            let union: HashSet<IndexNumber> =
                absent_set.union(&present_enrolled).cloned().collect();
            prop_assert_eq!(union, enrolled);
        }
    }
}
