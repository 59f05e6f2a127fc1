use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String, // e.g. "COS20007"
    pub name: String,
    pub description: Option<String>,
    pub credit_points: i32,
    pub convenor_id: Option<Uuid>,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ConvenorId",
        to = "super::users::Column::Id"
    )]
    Convenor,
    #[sea_orm(has_many = "super::semester_offerings::Entity")]
    SemesterOfferings,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Convenor.def()
    }
}

impl Related<super::semester_offerings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SemesterOfferings.def()
    }
}

impl Model {
    pub fn as_unit_ref(&self) -> models::requisite::UnitRef {
        models::requisite::UnitRef::new(self.id, self.code.clone())
    }
}

impl ActiveModelBehavior for ActiveModel {}
