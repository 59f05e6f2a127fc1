use super::catalog::default_active_only;
use database::{
    entities::{courses, student_profiles},
    services::course::CourseUnit,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_years: f64,
    pub credit_points: i32,
    pub department: Option<String>,
    pub is_active: bool,
}

impl From<courses::Model> for CourseResponse {
    fn from(course: courses::Model) -> Self {
        Self {
            id: course.id,
            code: course.code,
            name: course.name,
            description: course.description,
            duration_years: course.duration_years,
            credit_points: course.credit_points,
            department: course.department,
            is_active: course.is_active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseUnitResponse {
    pub unit_id: Uuid,
    pub code: String,
    pub name: String,
    pub credit_points: i32,
    pub is_elective: bool,
}

impl From<CourseUnit> for CourseUnitResponse {
    fn from(entry: CourseUnit) -> Self {
        Self {
            unit_id: entry.unit.id,
            code: entry.unit.code,
            name: entry.unit.name,
            credit_points: entry.unit.credit_points,
            is_elective: entry.is_elective,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetailResponse {
    pub course: CourseResponse,
    pub units: Vec<CourseUnitResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseQueryParams {
    /// Hide discontinued courses (default true)
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_duration_years")]
    pub duration_years: f64,
    #[serde(default)]
    pub credit_points: i32,
    pub department: Option<String>,
}

fn default_duration_years() -> f64 {
    3.0
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCourseUnitRequest {
    pub unit_id: Uuid,
    #[serde(default)]
    pub is_elective: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStudentCourseRequest {
    /// `null` removes the student from their course
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentCourseResponse {
    pub student_id: Uuid,
    pub course_id: Option<Uuid>,
}

impl From<student_profiles::Model> for StudentCourseResponse {
    fn from(profile: student_profiles::Model) -> Self {
        Self {
            student_id: profile.user_id,
            course_id: profile.course_id,
        }
    }
}
