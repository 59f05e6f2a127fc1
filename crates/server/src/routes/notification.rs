use crate::{
    dtos::notification::{NotificationQueryParams, NotificationResponse},
    error::ApiError,
    state::AppState,
    utils::access::current_user,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use database::services::notification::NotificationService;
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    params(NotificationQueryParams),
    responses(
        (status = 200, description = "Notifications for the caller", body = Vec<NotificationResponse>)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Query(params): Query<NotificationQueryParams>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let user = current_user(&state, &claims).await?;
    let notifications =
        NotificationService::list_for_recipient(&state.db, user.id, params.unread_only).await?;

    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

/// Mark one of the caller's notifications as read
#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = NotificationResponse),
        (status = 404, description = "No such notification for the caller")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Notifications"
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    let notification = NotificationService::mark_read(&state.db, id, user.id).await?;

    Ok(Json(notification.into()))
}
