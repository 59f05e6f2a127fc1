use database::entities::users;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub user_type: String,
    pub is_staff: bool,
    pub unread_notifications: u64,
}

impl UserResponse {
    pub fn new(user: users::Model, unread_notifications: u64) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name().to_string(),
            email: user.email,
            username: user.username,
            user_type: user.user_type,
            is_staff: user.is_staff,
            unread_notifications,
        }
    }
}
