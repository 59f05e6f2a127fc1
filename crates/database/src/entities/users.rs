use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub username: String,
    pub full_name: String,
    /// `sub` claim of the user's bearer token
    #[sea_orm(unique)]
    pub oidc_subject: Option<String>,
    pub is_staff: bool,
    pub user_type: String, // student, staff, unit_convenor, admin
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Model {
    /// Name shown to other users, falling back to username then email
    pub fn display_name(&self) -> &str {
        [self.full_name.trim(), self.username.as_str(), self.email.as_str()]
            .into_iter()
            .find(|name| !name.is_empty())
            .unwrap_or_default()
    }

    /// Whether the user may see teaching dashboards
    pub fn is_teaching_staff(&self) -> bool {
        self.is_staff || matches!(self.user_type.as_str(), "staff" | "unit_convenor" | "admin")
    }
}

impl ActiveModelBehavior for ActiveModel {}
