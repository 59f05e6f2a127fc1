use chrono::{DateTime, Utc};
use database::entities::{intakes, semester_offerings, units};
use models::requisite::UnitRef;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct UnitResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub credit_points: i32,
    pub department: Option<String>,
    pub convenor_id: Option<Uuid>,
    pub is_active: bool,
}

impl From<units::Model> for UnitResponse {
    fn from(unit: units::Model) -> Self {
        Self {
            id: unit.id,
            code: unit.code,
            name: unit.name,
            description: unit.description,
            credit_points: unit.credit_points,
            department: unit.department,
            convenor_id: unit.convenor_id,
            is_active: unit.is_active,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UnitQueryParams {
    /// Hide retired units (default true)
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

pub(crate) fn default_active_only() -> bool {
    true
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OfferingQueryParams {
    /// Only offerings of this unit
    pub unit_id: Option<Uuid>,
    /// Only offerings running in this intake
    pub intake_id: Option<Uuid>,
    /// Hide closed offerings (default true)
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IntakeResponse {
    pub id: Uuid,
    pub year: i32,
    pub semester: String,
    /// e.g. `Semester 1 2026`
    pub name: String,
}

impl From<intakes::Model> for IntakeResponse {
    fn from(intake: intakes::Model) -> Self {
        Self {
            id: intake.id,
            year: intake.year,
            semester: intake.semester.as_str().to_string(),
            name: format!("{} {}", intake.semester.as_full_str(), intake.year),
        }
    }
}

/// Row of the offering list; see [`OfferingResponse`] for requisites
#[derive(Debug, Serialize, ToSchema)]
pub struct OfferingListItem {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub intake_id: Option<Uuid>,
    pub year: i32,
    pub semester: String,
    pub enrollment_start: DateTime<Utc>,
    pub enrollment_end: DateTime<Utc>,
    pub capacity: i32,
    pub current_enrollment: i32,
    pub is_active: bool,
}

impl From<(semester_offerings::Model, units::Model)> for OfferingListItem {
    fn from((offering, unit): (semester_offerings::Model, units::Model)) -> Self {
        Self {
            id: offering.id,
            unit_id: unit.id,
            unit_code: unit.code,
            unit_name: unit.name,
            intake_id: offering.intake_id,
            year: offering.year,
            semester: offering.semester.as_str().to_string(),
            enrollment_start: offering.enrollment_start,
            enrollment_end: offering.enrollment_end,
            capacity: offering.capacity,
            current_enrollment: offering.current_enrollment,
            is_active: offering.is_active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OfferingResponse {
    pub id: Uuid,
    pub unit: UnitResponse,
    pub year: i32,
    /// Short code such as `S1`
    pub semester: String,
    pub semester_name: String,
    pub enrollment_start: DateTime<Utc>,
    pub enrollment_end: DateTime<Utc>,
    /// 0 means unlimited
    pub capacity: i32,
    pub current_enrollment: i32,
    pub is_active: bool,
    pub notes: Option<String>,
    pub prerequisites: Vec<String>,
    pub anti_requisites: Vec<String>,
}

impl OfferingResponse {
    pub fn new(
        offering: semester_offerings::Model,
        unit: units::Model,
        prerequisites: Vec<UnitRef>,
        anti_requisites: Vec<UnitRef>,
    ) -> Self {
        Self {
            id: offering.id,
            unit: unit.into(),
            year: offering.year,
            semester: offering.semester.as_str().to_string(),
            semester_name: offering.semester.as_full_str().to_string(),
            enrollment_start: offering.enrollment_start,
            enrollment_end: offering.enrollment_end,
            capacity: offering.capacity,
            current_enrollment: offering.current_enrollment,
            is_active: offering.is_active,
            notes: offering.notes,
            prerequisites: prerequisites.into_iter().map(|unit| unit.code).collect(),
            anti_requisites: anti_requisites.into_iter().map(|unit| unit.code).collect(),
        }
    }
}
