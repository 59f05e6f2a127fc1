use crate::{
    entities::{enrollments, notifications},
    error::ServiceError,
};
use chrono::{DateTime, Utc};
use models::notification::{NotificationDraft, NotificationTarget};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// The record a notification points at, loaded from its target reference
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTarget {
    Enrollment(enrollments::Model),
}

pub struct NotificationService;

impl NotificationService {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        draft: &NotificationDraft,
        now: DateTime<Utc>,
    ) -> Result<notifications::Model, ServiceError> {
        let notification = notifications::ActiveModel {
            id: Set(Uuid::new_v4()),
            recipient_id: Set(draft.recipient_id),
            actor_id: Set(draft.actor_id),
            verb: Set(draft.verb.clone()),
            target_kind: Set(draft.target.map(|target| target.kind().to_string())),
            target_id: Set(draft.target.map(|target| target.id())),
            unread: Set(true),
            created_at: Set(now),
        };

        Ok(notification.insert(db).await?)
    }

    /// Notifications for a recipient, newest first
    pub async fn list_for_recipient<C: ConnectionTrait>(
        db: &C,
        recipient_id: Uuid,
        unread_only: bool,
    ) -> Result<Vec<notifications::Model>, ServiceError> {
        let mut query = notifications::Entity::find()
            .filter(notifications::Column::RecipientId.eq(recipient_id))
            .order_by_desc(notifications::Column::CreatedAt);
        if unread_only {
            query = query.filter(notifications::Column::Unread.eq(true));
        }
        Ok(query.all(db).await?)
    }

    pub async fn unread_count<C: ConnectionTrait>(
        db: &C,
        recipient_id: Uuid,
    ) -> Result<u64, ServiceError> {
        Ok(notifications::Entity::find()
            .filter(notifications::Column::RecipientId.eq(recipient_id))
            .filter(notifications::Column::Unread.eq(true))
            .count(db)
            .await?)
    }

    /// Clears the unread flag; other recipients' notifications read as not found
    pub async fn mark_read<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<notifications::Model, ServiceError> {
        let notification = notifications::Entity::find_by_id(id)
            .filter(notifications::Column::RecipientId.eq(recipient_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notification", id))?;

        if !notification.unread {
            return Ok(notification);
        }

        let mut notification = notification.into_active_model();
        notification.unread = Set(false);
        Ok(notification.update(db).await?)
    }

    /// Loads the record behind a notification's target, if it still exists
    pub async fn resolve_target<C: ConnectionTrait>(
        db: &C,
        notification: &notifications::Model,
    ) -> Result<Option<ResolvedTarget>, ServiceError> {
        let Some(target) = notification.target() else {
            return Ok(None);
        };

        match target {
            NotificationTarget::Enrollment(id) => Ok(enrollments::Entity::find_by_id(id)
                .one(db)
                .await?
                .map(ResolvedTarget::Enrollment)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::enrollment::EnrollmentService,
        test_support::{open_offering, setup_db, staff, student, unit},
    };

    #[tokio::test]
    async fn test_mark_read_and_resolve() {
        let db = setup_db().await;
        let now = Utc::now();
        let tutor = staff(&db, "tutor").await;
        let x = student(&db, "x").await;
        let a = unit(&db, "COS10001", None).await;
        let o = open_offering(&db, a.id, 0, now).await;

        let enrollment = EnrollmentService::enroll(&db, x.id, o.id, Some(x.id), now)
            .await
            .unwrap();
        assert_eq!(
            NotificationService::unread_count(&db, tutor.id).await.unwrap(),
            1
        );

        let inbox = NotificationService::list_for_recipient(&db, tutor.id, true)
            .await
            .unwrap();
        let resolved = NotificationService::resolve_target(&db, &inbox[0])
            .await
            .unwrap();
        assert_eq!(resolved, Some(ResolvedTarget::Enrollment(enrollment)));

        // Only the recipient can clear it
        let err = NotificationService::mark_read(&db, inbox[0].id, x.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let read = NotificationService::mark_read(&db, inbox[0].id, tutor.id)
            .await
            .unwrap();
        assert!(!read.unread);
        assert!(
            NotificationService::list_for_recipient(&db, tutor.id, true)
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            NotificationService::list_for_recipient(&db, tutor.id, false)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_untargeted_notification_resolves_to_nothing() {
        let db = setup_db().await;
        let x = student(&db, "x").await;

        let notification = NotificationService::create(
            &db,
            &NotificationDraft {
                recipient_id: x.id,
                actor_id: None,
                verb: "Welcome".to_string(),
                target: None,
            },
            Utc::now(),
        )
        .await
        .unwrap();

        assert_eq!(
            NotificationService::resolve_target(&db, &notification)
                .await
                .unwrap(),
            None
        );
    }
}
