//! HTTP layer - axum router, handlers and server bootstrap
//!
//! This module exposes the subscription store over a small JSON REST API. Handlers
//! receive the store through [`AppState`]; nothing here talks to the database directly.

/// Error to HTTP response mapping
pub mod error;
/// Subscription and summary endpoints
pub mod handlers;
/// Listener setup and graceful shutdown
pub mod server;


use crate::core::SubscriptionStore;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared data available to all handlers.
/// Holds the store built at startup; cloning only clones the `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Store used by every endpoint
    pub store: Arc<dyn SubscriptionStore>,
}

impl AppState {
    /// Creates a new `AppState` around the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }
}

/// Builds the full application router with request tracing.
pub fn router(state: AppState) -> Router {
    handlers::subscription_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub use server::serve;
