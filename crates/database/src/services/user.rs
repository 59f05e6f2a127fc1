use crate::{entities::users, error::ServiceError};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub oidc_subject: Option<String>,
    pub user_type: String,
    pub is_staff: bool,
}

pub struct UserService;

impl UserService {
    pub async fn create_user<C: ConnectionTrait>(
        db: &C,
        new_user: NewUser,
    ) -> Result<users::Model, ServiceError> {
        let email = new_user.email.clone();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            username: Set(new_user.username),
            full_name: Set(new_user.full_name),
            oidc_subject: Set(new_user.oidc_subject),
            is_staff: Set(new_user.is_staff),
            user_type: Set(new_user.user_type),
            created_at: Set(Utc::now()),
        };

        user.insert(db).await.map_err(|err| {
            ServiceError::on_unique_violation(err, || {
                ServiceError::Conflict(format!("User {email}"))
            })
        })
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<users::Model, ServiceError> {
        users::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// Looks up the user a bearer token was issued to
    pub async fn find_by_subject<C: ConnectionTrait>(
        db: &C,
        subject: &str,
    ) -> Result<Option<users::Model>, ServiceError> {
        Ok(users::Entity::find()
            .filter(users::Column::OidcSubject.eq(subject))
            .one(db)
            .await?)
    }

    /// Ids of every staff-flagged user
    pub async fn staff_ids<C: ConnectionTrait>(db: &C) -> Result<Vec<Uuid>, ServiceError> {
        Ok(users::Entity::find()
            .select_only()
            .column(users::Column::Id)
            .filter(users::Column::IsStaff.eq(true))
            .order_by_asc(users::Column::CreatedAt)
            .into_tuple()
            .all(db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{setup_db, staff, student};

    #[tokio::test]
    async fn test_find_by_subject() {
        let db = setup_db().await;
        let alice = student(&db, "alice").await;

        let found = UserService::find_by_subject(&db, "sub-alice").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(alice.id));
        assert!(
            UserService::find_by_subject(&db, "sub-nobody")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_staff_ids_only_include_staff() {
        let db = setup_db().await;
        student(&db, "alice").await;
        let tutor = staff(&db, "tutor").await;

        assert_eq!(UserService::staff_ids(&db).await.unwrap(), vec![tutor.id]);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let db = setup_db().await;
        student(&db, "alice").await;

        let err = UserService::create_user(
            &db,
            NewUser {
                email: "alice@example.edu".to_string(),
                username: "alice2".to_string(),
                full_name: String::new(),
                oidc_subject: None,
                user_type: "student".to_string(),
                is_staff: false,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let db = setup_db().await;
        let err = UserService::get(&db, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "User", .. }));
    }
}
