use crate::error::ApiError;
use chrono::{DateTime, Utc};
use database::services::{
    dashboard::{
        AvailableOffering, DashboardStats, EnrollmentCard, OfferingSummary, StatusBreakdown,
        StudentDashboard, TeachingSummary,
    },
    enrollment::EnrollmentContext,
};
use models::enrollment_status::EnrollmentStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Parses a status such as `COMPLETED`, case-insensitively
pub fn parse_status(value: &str) -> Result<EnrollmentStatus, ApiError> {
    EnrollmentStatus::from_str(&value.trim().to_uppercase())
        .map_err(|_| ApiError::BadRequest(format!("Unknown enrollment status '{value}'")))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub offering_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub year: i32,
    pub semester: String,
    pub status: String,
    pub status_label: String,
    pub grade: Option<String>,
    pub marks: Option<f64>,
    pub withdrawn_date: Option<DateTime<Utc>>,
    pub completion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EnrollmentContext> for EnrollmentResponse {
    fn from(context: EnrollmentContext) -> Self {
        let EnrollmentContext {
            enrollment,
            offering,
            unit,
        } = context;

        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            offering_id: offering.id,
            unit_code: unit.code,
            unit_name: unit.name,
            year: offering.year,
            semester: offering.semester.as_str().to_string(),
            status: enrollment.status.as_str().to_string(),
            status_label: enrollment.status.label().to_string(),
            grade: enrollment.grade,
            marks: enrollment.marks,
            withdrawn_date: enrollment.withdrawn_date,
            completion_date: enrollment.completion_date,
            created_at: enrollment.created_at,
            updated_at: enrollment.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EnrollmentQueryParams {
    /// Staff only; students always see their own enrollments
    pub student_id: Option<Uuid>,
    pub offering_id: Option<Uuid>,
    /// e.g. `PENDING`
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEnrollmentRequest {
    pub offering_id: Uuid,
    /// Staff may enroll another student; defaults to the caller
    pub student_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ApproveEnrollmentRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordResultRequest {
    /// `COMPLETED` or `FAILED`
    #[schema(example = "COMPLETED")]
    pub outcome: String,
    #[schema(example = "HD")]
    pub grade: Option<String>,
    pub marks: Option<f64>,
    pub completion_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    #[schema(example = "ENROLLED")]
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentCardResponse {
    pub enrollment_id: Uuid,
    pub offering_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub credit_points: i32,
    pub year: i32,
    pub semester: String,
    pub status: String,
    pub status_label: String,
    /// Card style: selected, enrolled, withdrawn, passed or failed
    pub card_label: String,
    pub grade: Option<String>,
    pub marks: Option<f64>,
}

impl From<EnrollmentCard> for EnrollmentCardResponse {
    fn from(card: EnrollmentCard) -> Self {
        Self {
            enrollment_id: card.enrollment_id,
            offering_id: card.offering_id,
            unit_code: card.unit_code,
            unit_name: card.unit_name,
            credit_points: card.credit_points,
            year: card.year,
            semester: card.semester.as_str().to_string(),
            status: card.status.as_str().to_string(),
            status_label: card.status_label.to_string(),
            card_label: card.card_label.to_string(),
            grade: card.grade,
            marks: card.marks,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableOfferingResponse {
    pub offering_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub credit_points: i32,
    pub year: i32,
    pub semester: String,
    pub enrollment_end: DateTime<Utc>,
    pub remaining_seats: Option<i32>,
    pub prerequisites_met: bool,
    pub missing_prerequisites: Vec<String>,
    pub can_enroll: bool,
    pub is_elective: bool,
}

impl From<AvailableOffering> for AvailableOfferingResponse {
    fn from(offering: AvailableOffering) -> Self {
        Self {
            offering_id: offering.offering_id,
            unit_code: offering.unit_code,
            unit_name: offering.unit_name,
            credit_points: offering.credit_points,
            year: offering.year,
            semester: offering.semester.as_str().to_string(),
            enrollment_end: offering.enrollment_end,
            remaining_seats: offering.remaining_seats,
            prerequisites_met: offering.prerequisites_met,
            missing_prerequisites: offering.missing_prerequisites,
            can_enroll: offering.can_enroll,
            is_elective: offering.is_elective,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStatsResponse {
    pub total_completed: usize,
    pub total_failed: usize,
    pub total_withdrawn: usize,
    pub current_enrolled: usize,
    pub pending_approval: usize,
    pub available_count: usize,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_completed: stats.total_completed,
            total_failed: stats.total_failed,
            total_withdrawn: stats.total_withdrawn,
            current_enrolled: stats.current_enrolled,
            pending_approval: stats.pending_approval,
            available_count: stats.available_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDashboardResponse {
    pub course_code: Option<String>,
    pub past_enrollments: Vec<EnrollmentCardResponse>,
    pub current_enrollments: Vec<EnrollmentCardResponse>,
    pub available_offerings: Vec<AvailableOfferingResponse>,
    pub stats: DashboardStatsResponse,
}

impl From<StudentDashboard> for StudentDashboardResponse {
    fn from(dashboard: StudentDashboard) -> Self {
        Self {
            course_code: dashboard.course_code,
            past_enrollments: dashboard
                .past_enrollments
                .into_iter()
                .map(Into::into)
                .collect(),
            current_enrollments: dashboard
                .current_enrollments
                .into_iter()
                .map(Into::into)
                .collect(),
            available_offerings: dashboard
                .available_offerings
                .into_iter()
                .map(Into::into)
                .collect(),
            stats: dashboard.stats.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusBreakdownResponse {
    pub pending: usize,
    pub enrolled: usize,
    pub withdrawn: usize,
    pub completed: usize,
    pub failed: usize,
}

impl From<StatusBreakdown> for StatusBreakdownResponse {
    fn from(breakdown: StatusBreakdown) -> Self {
        Self {
            pending: breakdown.pending,
            enrolled: breakdown.enrolled,
            withdrawn: breakdown.withdrawn,
            completed: breakdown.completed,
            failed: breakdown.failed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassSummaryResponse {
    pub offering_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub year: i32,
    pub semester: String,
    pub capacity: i32,
    pub current_enrollment: i32,
    pub students_total: usize,
    pub status_breakdown: StatusBreakdownResponse,
}

impl From<OfferingSummary> for ClassSummaryResponse {
    fn from(summary: OfferingSummary) -> Self {
        Self {
            offering_id: summary.offering_id,
            unit_code: summary.unit_code,
            unit_name: summary.unit_name,
            year: summary.year,
            semester: summary.semester.as_str().to_string(),
            capacity: summary.capacity,
            current_enrollment: summary.current_enrollment,
            students_total: summary.students_total,
            status_breakdown: summary.status_breakdown.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeachingSummaryResponse {
    pub classes: Vec<ClassSummaryResponse>,
    pub total_classes: usize,
    pub total_students: usize,
    pub pending_approvals: usize,
}

impl From<TeachingSummary> for TeachingSummaryResponse {
    fn from(summary: TeachingSummary) -> Self {
        Self {
            classes: summary.classes.into_iter().map(Into::into).collect(),
            total_classes: summary.total_classes,
            total_students: summary.total_students,
            pending_approvals: summary.pending_approvals,
        }
    }
}
