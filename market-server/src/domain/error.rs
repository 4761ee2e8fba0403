use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("you do not have permission to modify this vehicle")]
    Forbidden,
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    #[error("vehicle not found: {0}")]
    VehicleNotFound(Uuid),
    #[error("vehicle is not available: {0}")]
    VehicleUnavailable(Uuid),
    #[error("email already registered: {0}")]
    UserAlreadyExists(String),
    #[error("slug already taken: {0}")]
    SlugTaken(String),
    #[error("{0}")]
    Conflict(String),
    #[error("too many contact attempts, try again in a few minutes")]
    RateLimited,
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        DomainError::Internal(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorMessage<'a>,
}

#[derive(Serialize)]
struct ErrorMessage<'a> {
    message: &'a str,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_) | DomainError::VehicleUnavailable(_) => {
                StatusCode::BAD_REQUEST
            }
            DomainError::Unauthorized(_) | DomainError::InvalidToken => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::UserNotFound(_) | DomainError::VehicleNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            DomainError::UserAlreadyExists(_)
            | DomainError::SlugTaken(_)
            | DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            DomainError::Internal(detail) => {
                error!(detail = %detail, "request failed with internal error");
                "internal server error".to_string()
            }
            DomainError::UserNotFound(_) => "user not found".to_string(),
            DomainError::VehicleNotFound(_) => "vehicle not found".to_string(),
            DomainError::VehicleUnavailable(_) => "vehicle is not available".to_string(),
            DomainError::UserAlreadyExists(_) => "email already registered".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: ErrorMessage {
                message: message.as_str(),
            },
        })
    }
}
