use models::notification::NotificationTarget;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub verb: String,
    /// Kind of the referenced record, decided by [`NotificationTarget::kind`]
    pub target_kind: Option<String>,
    pub target_id: Option<Uuid>,
    pub unread: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RecipientId",
        to = "super::users::Column::Id"
    )]
    Recipient,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ActorId",
        to = "super::users::Column::Id"
    )]
    Actor,
}

impl Model {
    pub fn target(&self) -> Option<NotificationTarget> {
        let kind = self.target_kind.as_deref()?;
        NotificationTarget::from_parts(kind, self.target_id?)
    }
}

impl ActiveModelBehavior for ActiveModel {}
