use models::{enrollment_status::EnrollmentStatus, semester::Semester};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a graded enrollment, kept in sync by the enrollment service
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transcripts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub semester: Semester,
    pub year: i32,
    pub credit_points: i32,
    pub grade: Option<String>,
    pub grade_point: Option<f64>,
    pub marks: Option<f64>,
    pub status: EnrollmentStatus,
    pub completion_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
