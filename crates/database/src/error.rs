use models::error::{CatalogError, EnrollmentError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0} already exists")]
    Conflict(String),

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Replaces a unique constraint failure with `conflict`, passing other errors through
    pub fn on_unique_violation(err: DbErr, conflict: impl FnOnce() -> ServiceError) -> Self {
        if is_unique_violation(&err) {
            conflict()
        } else {
            Self::Db(err)
        }
    }
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
