use models::{
    error::CatalogError,
    offering::{Capacity, EnrollmentWindow},
    semester::Semester,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "semester_offerings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub unit_id: Uuid,
    pub year: i32,
    pub semester: Semester,
    pub enrollment_start: DateTimeUtc,
    pub enrollment_end: DateTimeUtc,
    pub capacity: i32, // 0 means unlimited
    pub current_enrollment: i32,
    pub is_active: bool,
    pub notes: Option<String>,
    pub intake_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::units::Entity",
        from = "Column::UnitId",
        to = "super::units::Column::Id"
    )]
    Unit,
    #[sea_orm(
        belongs_to = "super::intakes::Entity",
        from = "Column::IntakeId",
        to = "super::intakes::Column::Id"
    )]
    Intake,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::intakes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Intake.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Model {
    pub fn window(&self) -> Result<EnrollmentWindow, CatalogError> {
        EnrollmentWindow::new(self.enrollment_start, self.enrollment_end)
    }

    pub fn seats(&self) -> Result<Capacity, CatalogError> {
        Capacity::new(self.capacity, self.current_enrollment)
    }
}

impl ActiveModelBehavior for ActiveModel {}
