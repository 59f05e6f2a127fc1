use crate::{
    entities::{courses, semester_offerings, units, users},
    services::{
        catalog::{CatalogService, NewOffering, NewUnit},
        course::{CourseService, NewCourse},
        user::{NewUser, UserService},
    },
};
use chrono::{DateTime, Datelike, Duration, Utc};
use migration::{Migrator, MigratorTrait};
use models::semester::Semester;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Fresh in-memory database with the full schema
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn student(db: &DatabaseConnection, username: &str) -> users::Model {
    user(db, username, "student", false).await
}

pub async fn staff(db: &DatabaseConnection, username: &str) -> users::Model {
    user(db, username, "staff", true).await
}

pub async fn user(
    db: &DatabaseConnection,
    username: &str,
    user_type: &str,
    is_staff: bool,
) -> users::Model {
    UserService::create_user(
        db,
        NewUser {
            email: format!("{username}@example.edu"),
            username: username.to_string(),
            full_name: String::new(),
            oidc_subject: Some(format!("sub-{username}")),
            user_type: user_type.to_string(),
            is_staff,
        },
    )
    .await
    .unwrap()
}

pub async fn unit(db: &DatabaseConnection, code: &str, convenor_id: Option<Uuid>) -> units::Model {
    CatalogService::create_unit(
        db,
        NewUnit {
            code: code.to_string(),
            name: format!("{code} name"),
            description: None,
            credit_points: 12,
            convenor_id,
            department: Some("Computing".to_string()),
        },
    )
    .await
    .unwrap()
}

pub async fn course(db: &DatabaseConnection, code: &str) -> courses::Model {
    CourseService::create_course(
        db,
        NewCourse {
            code: code.to_string(),
            name: format!("{code} name"),
            description: None,
            duration_years: 3.0,
            credit_points: 288,
            department: Some("Computing".to_string()),
        },
    )
    .await
    .unwrap()
}

/// Offering whose window opened a day before `now` and closes a week after it
pub async fn open_offering(
    db: &DatabaseConnection,
    unit_id: Uuid,
    capacity: i32,
    now: DateTime<Utc>,
) -> semester_offerings::Model {
    offering(
        db,
        unit_id,
        Semester::Semester1,
        now - Duration::days(1),
        now + Duration::days(7),
        capacity,
    )
    .await
}

pub async fn offering(
    db: &DatabaseConnection,
    unit_id: Uuid,
    semester: Semester,
    enrollment_start: DateTime<Utc>,
    enrollment_end: DateTime<Utc>,
    capacity: i32,
) -> semester_offerings::Model {
    CatalogService::create_offering(
        db,
        NewOffering {
            unit_id,
            year: enrollment_end.year(),
            semester,
            enrollment_start,
            enrollment_end,
            capacity,
            notes: None,
        },
    )
    .await
    .unwrap()
}
