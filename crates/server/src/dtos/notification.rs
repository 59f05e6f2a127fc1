use chrono::{DateTime, Utc};
use database::entities::notifications;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationTargetResponse {
    /// Kind of record, e.g. `enrollment`
    pub kind: String,
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub verb: String,
    pub target: Option<NotificationTargetResponse>,
    pub unread: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(notification: notifications::Model) -> Self {
        let target = notification.target().map(|target| NotificationTargetResponse {
            kind: target.kind().to_string(),
            id: target.id(),
        });

        Self {
            id: notification.id,
            actor_id: notification.actor_id,
            verb: notification.verb,
            target,
            unread: notification.unread,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationQueryParams {
    #[serde(default)]
    pub unread_only: bool,
}
