use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumProperty, EnumString};

#[cfg(feature = "database")]
use sea_orm::entity::prelude::*;

/// Lifecycle state of a student's enrollment in a semester offering
///
/// `Pending` is the initial state. `Completed`, `Failed` and `Withdrawn` are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumProperty,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(
    feature = "database",
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    #[cfg_attr(feature = "database", sea_orm(string_value = "PENDING"))]
    #[strum(props(label = "Pending Approval", card = "selected"))]
    Pending,
    #[cfg_attr(feature = "database", sea_orm(string_value = "ENROLLED"))]
    #[strum(props(label = "Enrolled", card = "enrolled"))]
    Enrolled,
    #[cfg_attr(feature = "database", sea_orm(string_value = "WITHDRAWN"))]
    #[strum(props(label = "Withdrawn", card = "withdrawn"))]
    Withdrawn,
    #[cfg_attr(feature = "database", sea_orm(string_value = "COMPLETED"))]
    #[strum(props(label = "Completed", card = "passed"))]
    Completed,
    #[cfg_attr(feature = "database", sea_orm(string_value = "FAILED"))]
    #[strum(props(label = "Failed", card = "failed"))]
    Failed,
}

impl EnrollmentStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Enrolled,
        Self::Withdrawn,
        Self::Completed,
        Self::Failed,
    ];

    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Human readable label, e.g. "Pending Approval"
    pub fn label(&self) -> &'static str {
        self.get_str("label").unwrap_or_default()
    }

    /// Label used on dashboard offering cards ("passed", "selected", ...)
    pub fn card_label(&self) -> &'static str {
        self.get_str("card").unwrap_or_default()
    }

    /// No further transition is defined out of a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Withdrawn)
    }

    /// Whether this status carries a grade outcome that belongs on a transcript
    pub fn is_graded(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the student currently holds (or has held) the unit, for anti-requisite checks
    pub fn holds_unit(&self) -> bool {
        matches!(self, Self::Enrolled | Self::Completed)
    }

    /// Whether the enrollment still occupies the student's plan for this semester
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Enrolled)
    }
}
