/// Error types for food-social-service
///
/// Validation failures become 422 responses listing each offending field,
/// store failures become 500 responses carrying the driver's message.
use crate::db::StoreError;
use crate::models::ValidationError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for food-social-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Body could not be parsed at all
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        if let AppError::Validation(err) = self {
            body["fields"] = serde_json::json!(err.fields);
        }

        HttpResponse::build(status).json(body)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldViolation;

    #[test]
    fn status_codes_follow_error_kind() {
        let validation = AppError::from(ValidationError::new(vec![FieldViolation::new(
            "rating",
            "must be between 1 and 5",
        )]));
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let store = AppError::from(StoreError::Unavailable);
        assert_eq!(store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.to_string(), "Database not available");

        let rejected = AppError::from(StoreError::Rejected("E11000 duplicate key".into()));
        assert_eq!(rejected.to_string(), "E11000 duplicate key");

        assert_eq!(
            AppError::BadRequest("EOF".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
