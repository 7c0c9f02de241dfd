use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::templates;
use super::types::Blank;
use crate::services::{AuthError, CourseError, FailureKind};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    PermissionDenied(String),

    ValidationError(String),

    Conflict(String),

    Unauthorized(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the user. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::NotFound(msg)
            | ApiError::PermissionDenied(msg)
            | ApiError::ValidationError(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                "A database error occurred".to_string()
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        }
    }

    /// Failures the user can fix by resubmitting are shown on the form they
    /// came from; everything else falls back to the index page.
    const fn stays_on_form(&self) -> bool {
        matches!(
            self,
            ApiError::ValidationError(_) | ApiError::Conflict(_) | ApiError::Unauthorized(_)
        )
    }

    fn render(self, template: &str) -> Response {
        let status = self.status();
        let template = if self.stays_on_form() {
            template
        } else {
            templates::INDEX
        };

        Blank::new(template)
            .failure(self.public_message())
            .status(status)
            .into_response()
    }

    fn from_kind(kind: FailureKind, message: String) -> Self {
        match kind {
            FailureKind::NotFound => ApiError::NotFound(message),
            FailureKind::PermissionDenied => ApiError::PermissionDenied(message),
            FailureKind::Validation => ApiError::ValidationError(message),
            FailureKind::Duplicate => ApiError::Conflict(message),
            FailureKind::Unauthenticated => ApiError::Unauthorized(message),
            FailureKind::Internal => ApiError::InternalError(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.render(templates::INDEX)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            other => Self::from_kind(other.kind(), other.to_string()),
        }
    }
}

impl From<CourseError> for ApiError {
    fn from(err: CourseError) -> Self {
        match err {
            CourseError::Database(msg) => ApiError::DatabaseError(msg),
            other => Self::from_kind(other.kind(), other.to_string()),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}

/// An error bound to the page the handler was rendering.
#[derive(Debug)]
pub struct Rejection {
    template: String,
    error: ApiError,
}

impl Rejection {
    pub fn new(template: impl Into<String>, error: impl Into<ApiError>) -> Self {
        Self {
            template: template.into(),
            error: error.into(),
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        self.error.render(&self.template)
    }
}

/// Attaches the current page to an error so it is rendered there.
pub trait OnPage<T> {
    fn on_page(self, template: &str) -> Result<T, Rejection>;
}

impl<T, E: Into<ApiError>> OnPage<T> for Result<T, E> {
    fn on_page(self, template: &str) -> Result<T, Rejection> {
        self.map_err(|e| Rejection::new(template, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_errors_map_to_status_codes() {
        let cases = [
            (CourseError::CourseNotFound, StatusCode::NOT_FOUND),
            (
                CourseError::PermissionDenied("no".into()),
                StatusCode::FORBIDDEN,
            ),
            (CourseError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (CourseError::AlreadyEnrolled, StatusCode::CONFLICT),
            (CourseError::AlreadyInactive, StatusCode::CONFLICT),
            (
                CourseError::Database("locked".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn invalid_credentials_are_unauthorized() {
        let err = ApiError::from(AuthError::InvalidCredentials);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(err.stays_on_form());
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::internal("connection reset");
        assert_eq!(err.public_message(), "An internal error occurred");
    }
}
