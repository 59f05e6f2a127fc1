use crate::enrollment_status::EnrollmentStatus;
use serde::Serialize;
use strum::Display;
use thiserror::Error;

/// Lifecycle operations that can be refused by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    #[strum(serialize = "withdraw")]
    Withdraw,
    #[strum(serialize = "approve")]
    Approve,
    #[strum(serialize = "record a result for")]
    RecordResult,
}

/// Which side of the enrollment window an attempt fell on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
pub enum WindowClosed {
    #[error("Enrollment period has not started yet.")]
    NotStarted,
    #[error("Enrollment period has ended.")]
    Ended,
}

/// Reasons an enrollment operation is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnrollmentError {
    #[error("Missing prerequisites: {}", .units.join(", "))]
    MissingPrerequisite { units: Vec<String> },

    #[error("Cannot enroll: already completed/enrolled in anti-requisite {unit}")]
    AntiRequisiteConflict { unit: String },

    #[error(transparent)]
    EnrollmentWindowClosed(#[from] WindowClosed),

    #[error("This offering has reached its maximum capacity of {capacity}.")]
    CapacityExceeded { capacity: i32 },

    #[error("Cannot {action} an enrollment that is {from}")]
    IllegalStateTransition {
        from: EnrollmentStatus,
        action: LifecycleAction,
    },

    #[error("Student is already enrolled in this offering.")]
    UniquenessViolation,
}

impl EnrollmentError {
    /// Stable machine readable code for API consumers
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingPrerequisite { .. } => "missing_prerequisite",
            Self::AntiRequisiteConflict { .. } => "anti_requisite_conflict",
            Self::EnrollmentWindowClosed(WindowClosed::NotStarted) => "enrollment_not_started",
            Self::EnrollmentWindowClosed(WindowClosed::Ended) => "enrollment_ended",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::IllegalStateTransition { .. } => "illegal_state_transition",
            Self::UniquenessViolation => "already_enrolled",
        }
    }
}

/// Invariant violations when editing catalog data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("A unit cannot be its own {kind}: {code}")]
    SelfRequisite { kind: RequisiteKind, code: String },

    #[error("Enrollment start must be before enrollment end.")]
    InvalidEnrollmentWindow,

    #[error("Capacity cannot be negative: {0}")]
    NegativeCapacity(i32),
}

/// The two kinds of requisite links between units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum RequisiteKind {
    #[strum(serialize = "prerequisite")]
    Prerequisite,
    #[strum(serialize = "anti-requisite")]
    AntiRequisite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = EnrollmentError::MissingPrerequisite {
            units: vec!["COS10001".to_string(), "COS10009".to_string()],
        };
        assert_eq!(err.to_string(), "Missing prerequisites: COS10001, COS10009");

        let err = EnrollmentError::IllegalStateTransition {
            from: EnrollmentStatus::Withdrawn,
            action: LifecycleAction::Withdraw,
        };
        assert_eq!(
            err.to_string(),
            "Cannot withdraw an enrollment that is WITHDRAWN"
        );

        let err: EnrollmentError = WindowClosed::Ended.into();
        assert_eq!(err.to_string(), "Enrollment period has ended.");
        assert_eq!(err.code(), "enrollment_ended");
    }

    #[test]
    fn test_catalog_messages() {
        let err = CatalogError::SelfRequisite {
            kind: RequisiteKind::AntiRequisite,
            code: "COS20007".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "A unit cannot be its own anti-requisite: COS20007"
        );
    }
}
