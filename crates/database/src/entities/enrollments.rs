use models::enrollment_status::EnrollmentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub offering_id: Uuid,
    pub status: EnrollmentStatus,
    pub grade: Option<String>, // e.g. "HD", "B+"
    pub marks: Option<f64>,
    pub withdrawn_date: Option<DateTimeUtc>,
    pub completion_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::semester_offerings::Entity",
        from = "Column::OfferingId",
        to = "super::semester_offerings::Column::Id"
    )]
    Offering,
    #[sea_orm(has_one = "super::enrollment_approvals::Entity")]
    Approval,
    #[sea_orm(has_one = "super::transcripts::Entity")]
    Transcript,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::semester_offerings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offering.def()
    }
}

impl Related<super::enrollment_approvals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approval.def()
    }
}

impl Related<super::transcripts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transcript.def()
    }
}

// Units reached through the offering
impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        super::semester_offerings::Relation::Unit.def()
    }

    fn via() -> Option<RelationDef> {
        Some(Relation::Offering.def())
    }
}

impl ActiveModelBehavior for ActiveModel {}
