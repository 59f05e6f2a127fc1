use crate::{
    enrollment_status::EnrollmentStatus,
    error::{CatalogError, EnrollmentError, RequisiteKind},
};
use std::collections::HashSet;
use uuid::Uuid;

/// Minimal view of a unit needed to evaluate requisites
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitRef {
    pub id: Uuid,
    pub code: String,
}

impl UnitRef {
    pub fn new(id: Uuid, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
        }
    }
}

/// Units a student has attempted, bucketed by what requisite checks need
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentHistory {
    /// Units with at least one COMPLETED enrollment
    completed: HashSet<Uuid>,
    /// Units with an ENROLLED or COMPLETED enrollment
    held: HashSet<Uuid>,
    /// Every unit with an enrollment in any status
    attempted: HashSet<Uuid>,
}

impl StudentHistory {
    /// Builds the history from `(unit_id, status)` pairs of the student's enrollments
    pub fn from_enrollments<I>(enrollments: I) -> Self
    where
        I: IntoIterator<Item = (Uuid, EnrollmentStatus)>,
    {
        let mut history = Self::default();
        for (unit_id, status) in enrollments {
            history.record(unit_id, status);
        }
        history
    }

    pub fn record(&mut self, unit_id: Uuid, status: EnrollmentStatus) {
        self.attempted.insert(unit_id);
        if status == EnrollmentStatus::Completed {
            self.completed.insert(unit_id);
        }
        if status.holds_unit() {
            self.held.insert(unit_id);
        }
    }

    pub fn has_completed(&self, unit_id: &Uuid) -> bool {
        self.completed.contains(unit_id)
    }

    pub fn holds(&self, unit_id: &Uuid) -> bool {
        self.held.contains(unit_id)
    }

    pub fn has_attempted(&self, unit_id: &Uuid) -> bool {
        self.attempted.contains(unit_id)
    }

    /// Prerequisites from `required` the student has not completed, in input order
    pub fn missing_prerequisites<'a>(&self, required: &'a [UnitRef]) -> Vec<&'a UnitRef> {
        required
            .iter()
            .filter(|unit| !self.has_completed(&unit.id))
            .collect()
    }
}

/// Every prerequisite needs a COMPLETED enrollment in some offering of that unit
pub fn check_prerequisites(
    required: &[UnitRef],
    history: &StudentHistory,
) -> Result<(), EnrollmentError> {
    let missing = history.missing_prerequisites(required);
    if missing.is_empty() {
        return Ok(());
    }

    Err(EnrollmentError::MissingPrerequisite {
        units: missing.into_iter().map(|unit| unit.code.clone()).collect(),
    })
}

/// No anti-requisite may be currently ENROLLED or already COMPLETED
pub fn check_anti_requisites(
    anti_requisites: &[UnitRef],
    history: &StudentHistory,
) -> Result<(), EnrollmentError> {
    match anti_requisites.iter().find(|unit| history.holds(&unit.id)) {
        Some(conflict) => Err(EnrollmentError::AntiRequisiteConflict {
            unit: conflict.code.clone(),
        }),
        None => Ok(()),
    }
}

/// Refuses a requisite link from a unit to itself
pub fn check_requisite_link(
    unit: &UnitRef,
    other: &UnitRef,
    kind: RequisiteKind,
) -> Result<(), CatalogError> {
    if unit.id == other.id {
        return Err(CatalogError::SelfRequisite {
            kind,
            code: unit.code.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(code: &str) -> UnitRef {
        UnitRef::new(Uuid::new_v4(), code)
    }

    #[test]
    fn test_history_buckets() {
        let (a, b, c) = (unit("A"), unit("B"), unit("C"));
        let history = StudentHistory::from_enrollments([
            (a.id, EnrollmentStatus::Completed),
            (b.id, EnrollmentStatus::Enrolled),
            (c.id, EnrollmentStatus::Withdrawn),
        ]);

        assert!(history.has_completed(&a.id));
        assert!(!history.has_completed(&b.id));
        assert!(history.holds(&a.id));
        assert!(history.holds(&b.id));
        assert!(!history.holds(&c.id));
        assert!(history.has_attempted(&c.id));
    }

    #[test]
    fn test_prerequisites_reports_all_missing() {
        let (a, b, c) = (unit("COS10001"), unit("COS10009"), unit("MTH10001"));
        let history = StudentHistory::from_enrollments([(b.id, EnrollmentStatus::Completed)]);

        let err = check_prerequisites(&[a.clone(), b.clone(), c.clone()], &history).unwrap_err();
        assert_eq!(
            err,
            EnrollmentError::MissingPrerequisite {
                units: vec!["COS10001".to_string(), "MTH10001".to_string()]
            }
        );
    }

    #[test]
    fn test_failed_attempt_does_not_satisfy_prerequisite() {
        let a = unit("COS10001");
        let history = StudentHistory::from_enrollments([
            (a.id, EnrollmentStatus::Failed),
            (a.id, EnrollmentStatus::Enrolled),
        ]);

        assert!(check_prerequisites(std::slice::from_ref(&a), &history).is_err());
    }

    #[test]
    fn test_no_prerequisites() {
        assert!(check_prerequisites(&[], &StudentHistory::default()).is_ok());
    }

    #[test]
    fn test_anti_requisite_conflicts() {
        let (a, b) = (unit("COS20007"), unit("COS20019"));

        let enrolled = StudentHistory::from_enrollments([(a.id, EnrollmentStatus::Enrolled)]);
        assert_eq!(
            check_anti_requisites(&[b.clone(), a.clone()], &enrolled),
            Err(EnrollmentError::AntiRequisiteConflict {
                unit: "COS20007".to_string()
            })
        );

        let pending = StudentHistory::from_enrollments([(a.id, EnrollmentStatus::Pending)]);
        assert!(check_anti_requisites(&[a.clone()], &pending).is_ok());

        let failed = StudentHistory::from_enrollments([(a.id, EnrollmentStatus::Failed)]);
        assert!(check_anti_requisites(&[a], &failed).is_ok());
    }

    #[test]
    fn test_self_link_rejected() {
        let a = unit("COS20007");
        let b = unit("COS10001");

        assert!(check_requisite_link(&a, &b, RequisiteKind::Prerequisite).is_ok());
        assert_eq!(
            check_requisite_link(&a, &a, RequisiteKind::Prerequisite),
            Err(CatalogError::SelfRequisite {
                kind: RequisiteKind::Prerequisite,
                code: "COS20007".to_string()
            })
        );
    }
}
