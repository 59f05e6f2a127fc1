use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A full program of study, e.g. a Bachelor of Computer Science
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_years: f64,
    pub credit_points: i32,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_units::Entity")]
    CourseUnits,
}

impl Related<super::course_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseUnits.def()
    }
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        super::course_units::Relation::Unit.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::course_units::Relation::Course.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
