//! Unified error type for the subscription service.
//!
//! Validation failures, missing records and persistence failures each get their own
//! variant so the HTTP layer can map them onto status codes without inspecting strings.

use thiserror::Error;

/// Errors produced by the store, the summary aggregator and application bootstrap.
#[derive(Debug, Error)]
pub enum Error {
    /// A month was not in `MM-YYYY` form or named a month outside 1..=12
    #[error("Invalid month '{value}': expected MM-YYYY")]
    InvalidMonth { value: String },

    /// Prices are minor currency units and cannot be negative
    #[error("Invalid price {price}: must not be negative")]
    InvalidPrice { price: i64 },

    /// A required field or query parameter was absent or blank
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// The request body could not be decoded
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    #[error("Subscription not found: {id}")]
    SubscriptionNotFound { id: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by malformed caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidMonth { .. }
                | Self::InvalidPrice { .. }
                | Self::MissingField { .. }
                | Self::InvalidBody { .. }
        )
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
