//! HTTP rendering of [`Error`].
//!
//! Validation errors become 400, missing subscriptions 404, everything else 500. Server
//! errors are logged with their cause and answered with a generic message.

use crate::errors::Error;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

impl Error {
    /// Status code this error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidMonth { .. }
            | Self::InvalidPrice { .. }
            | Self::MissingField { .. }
            | Self::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            Self::SubscriptionNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Config { .. } | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_message, message) = match status {
            StatusCode::BAD_REQUEST => ("Invalid input", self.to_string()),
            StatusCode::NOT_FOUND => ("Not found", self.to_string()),
            _ => {
                error!("Request failed: {}", self);
                ("Internal server error", "The request could not be completed".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidBody {
            message: rejection.body_text(),
        }
    }
}
