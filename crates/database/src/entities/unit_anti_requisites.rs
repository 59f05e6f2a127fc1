use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Junction table for mutually exclusive units
///
/// Every pair is stored in both directions so lookups only filter on `unit_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "unit_anti_requisites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub unit_id: Uuid,
    pub anti_requisite_id: Uuid,
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
        belongs_to = "super::units::Entity",
        from = "Column::AntiRequisiteId",
        to = "super::units::Column::Id"
    )]
    AntiRequisite,
}

impl ActiveModelBehavior for ActiveModel {}
