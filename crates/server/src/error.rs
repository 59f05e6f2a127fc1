use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use models::error::EnrollmentError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bearer token has no subject")]
    MissingIdentity,

    #[error("No account is linked to this identity")]
    UnknownUser,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingIdentity => StatusCode::UNAUTHORIZED,
            Self::UnknownUser | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Service(err) => match err {
                ServiceError::Enrollment(EnrollmentError::UniquenessViolation)
                | ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::Enrollment(_) | ServiceError::Catalog(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingIdentity => "unauthenticated",
            Self::UnknownUser => "unknown_user",
            Self::Forbidden(_) => "forbidden",
            Self::BadRequest(_) => "bad_request",
            Self::Service(err) => match err {
                ServiceError::Enrollment(err) => err.code(),
                ServiceError::Catalog(_) => "invalid_catalog_data",
                ServiceError::NotFound { .. } => "not_found",
                ServiceError::Conflict(_) => "conflict",
                ServiceError::Db(_) => "internal_error",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            log::error!("Request failed: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            code: self.code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{
        enrollment_status::EnrollmentStatus,
        error::{LifecycleAction, WindowClosed},
    };
    use sea_orm::DbErr;

    #[test]
    fn test_validation_failures_are_bad_requests() {
        let errors = [
            EnrollmentError::MissingPrerequisite {
                units: vec!["COS10001".to_string()],
            },
            EnrollmentError::AntiRequisiteConflict {
                unit: "MTH10001".to_string(),
            },
            EnrollmentError::EnrollmentWindowClosed(WindowClosed::Ended),
            EnrollmentError::CapacityExceeded { capacity: 30 },
            EnrollmentError::IllegalStateTransition {
                from: EnrollmentStatus::Withdrawn,
                action: LifecycleAction::Withdraw,
            },
        ];

        for err in errors {
            let api = ApiError::from(ServiceError::from(err));
            assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_duplicates_conflict() {
        let api = ApiError::from(ServiceError::from(EnrollmentError::UniquenessViolation));
        assert_eq!(api.status(), StatusCode::CONFLICT);
        assert_eq!(api.code(), "already_enrolled");
    }

    #[test]
    fn test_other_statuses() {
        assert_eq!(ApiError::MissingIdentity.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("no").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(ServiceError::NotFound {
                entity: "Enrollment",
                id: "x".to_string()
            })
            .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_storage_errors_are_hidden() {
        let response =
            ApiError::from(ServiceError::from(DbErr::Custom("disk on fire".to_string())))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "internal_error");
        assert_eq!(json["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_window_error_body() {
        let response = ApiError::from(ServiceError::from(
            EnrollmentError::EnrollmentWindowClosed(WindowClosed::NotStarted),
        ))
        .into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "enrollment_not_started");
        assert_eq!(json["message"], "Enrollment period has not started yet.");
    }
}
