use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder, ResponseError};

use easyloc_shared::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Relational store error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document store error: {0}")]
    Document(#[from] mongodb::error::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                messages.push(format!("{}: {}", field, error.code));
            }
        }
        AppError::Validation(messages.join(", "))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Store and configuration failures are not echoed back to the caller.
        let (status, message) = match self {
            AppError::Validation(msg) => ("Bad Request", msg.clone()),
            AppError::NotFound(msg) => ("Not Found", msg.clone()),
            AppError::Conflict(msg) => ("Conflict", msg.clone()),
            _ => (
                "Internal Server Error",
                "An internal server error occurred".to_string(),
            ),
        };
        HttpResponseBuilder::new(self.status_code())
            .json(ApiResponse::<serde_json::Value>::error(status, message))
    }
}
