//! Error handling - every failure renders the uniform envelope.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use forum_core::ports::UserServiceError;
use forum_core::{DomainError, Failure, FailureReason};
use forum_shared::ApiResponse;

/// Application-level error type that converts to `{success: false, error, message}`.
#[derive(Debug)]
pub enum AppError {
    /// A post lifecycle failure.
    Failure(Failure),
    /// A rejection from the user-account service, relayed with its status.
    Upstream { status: u16, message: String },
}

impl AppError {
    pub fn missing_fields(message: impl Into<String>) -> Self {
        AppError::Failure(Failure {
            reason: FailureReason::MissingFields,
            message: message.into(),
        })
    }

    /// Relayed rejections keep their status but still need a reason code.
    /// Auth and lookup statuses get their own reasons, any other 4xx is a
    /// problem with what the client sent, and only 5xx (or anything
    /// non-4xx) means the upstream itself failed.
    fn reason(&self) -> FailureReason {
        match self {
            AppError::Failure(failure) => failure.reason,
            AppError::Upstream { status, .. } => match status {
                401 | 403 => FailureReason::Unauthorized,
                404 => FailureReason::NotFound,
                400..=499 => FailureReason::MissingFields,
                _ => FailureReason::Failed,
            },
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::Failure(failure) => &failure.message,
            AppError::Upstream { message, .. } => message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason(), self.message())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Failure(failure) => match failure.reason {
                FailureReason::MissingFields => StatusCode::BAD_REQUEST,
                FailureReason::Unauthorized => StatusCode::FORBIDDEN,
                FailureReason::NotFound => StatusCode::NOT_FOUND,
                FailureReason::Failed => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ApiResponse::failure(self.reason().as_str(), self.message()))
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Failure(Failure::from(err))
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Rejected { status, message } => AppError::Upstream { status, message },
            // Already logged by the client; the cause stays server-side.
            UserServiceError::Unavailable(_) => AppError::Failure(Failure {
                reason: FailureReason::Failed,
                message: "The user service is unavailable. Please try again later.".to_string(),
            }),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_failures_map_to_statuses() {
        let cases = [
            (DomainError::missing_fields(&["title"]), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized, StatusCode::FORBIDDEN),
            (DomainError::post_not_found(9), StatusCode::NOT_FOUND),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn upstream_status_is_forwarded() {
        let err = AppError::from(UserServiceError::Rejected {
            status: 409,
            message: "Username already taken".to_string(),
        });

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Username already taken");
        assert_eq!(err.reason(), FailureReason::MissingFields);
    }

    #[test]
    fn only_upstream_server_errors_read_as_failed() {
        let reason_for = |status| {
            AppError::from(UserServiceError::Rejected {
                status,
                message: String::new(),
            })
            .reason()
        };

        assert_eq!(reason_for(400), FailureReason::MissingFields);
        assert_eq!(reason_for(422), FailureReason::MissingFields);
        assert_eq!(reason_for(401), FailureReason::Unauthorized);
        assert_eq!(reason_for(403), FailureReason::Unauthorized);
        assert_eq!(reason_for(404), FailureReason::NotFound);
        assert_eq!(reason_for(500), FailureReason::Failed);
        assert_eq!(reason_for(503), FailureReason::Failed);
    }

    #[test]
    fn unavailable_user_service_hides_the_cause() {
        let err = AppError::from(UserServiceError::Unavailable("dns error".to_string()));

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("dns"));
    }
}
