use chrono::{DateTime, Utc};
use database::entities::transcripts;
use models::grade::GpaSummary;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptResponse {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub semester: String,
    pub year: i32,
    pub credit_points: i32,
    pub grade: Option<String>,
    pub grade_point: Option<f64>,
    pub marks: Option<f64>,
    pub status: String,
    pub completion_date: DateTime<Utc>,
}

impl From<transcripts::Model> for TranscriptResponse {
    fn from(transcript: transcripts::Model) -> Self {
        Self {
            id: transcript.id,
            enrollment_id: transcript.enrollment_id,
            student_id: transcript.student_id,
            unit_code: transcript.unit_code,
            unit_name: transcript.unit_name,
            semester: transcript.semester.as_str().to_string(),
            year: transcript.year,
            credit_points: transcript.credit_points,
            grade: transcript.grade,
            grade_point: transcript.grade_point,
            marks: transcript.marks,
            status: transcript.status.as_str().to_string(),
            completion_date: transcript.completion_date,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GpaSummaryResponse {
    pub student_id: Uuid,
    pub gpa: f64,
    pub total_credit_points: i32,
    pub total_units_completed: usize,
}

impl GpaSummaryResponse {
    pub fn new(student_id: Uuid, summary: GpaSummary) -> Self {
        Self {
            student_id,
            gpa: summary.gpa,
            total_credit_points: summary.total_credit_points,
            total_units_completed: summary.total_units_completed,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TranscriptQueryParams {
    /// Staff only; defaults to the caller
    pub student_id: Option<Uuid>,
}
