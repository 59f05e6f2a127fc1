use models::semester::Semester;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A teaching period students are admitted in; groups the offerings that run in it
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "intakes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub semester: Semester,
    pub year: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::semester_offerings::Entity")]
    SemesterOfferings,
}

impl Related<super::semester_offerings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SemesterOfferings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
