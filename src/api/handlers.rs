//! Subscription endpoints.
//!
//! Handlers only translate between HTTP and the contract types; all validation of dates
//! and prices happens in the store.

use crate::{
    api::AppState,
    errors::{Error, Result},
    models::{Subscription, SubscriptionInput, SummaryFilter, SummaryTotal},
};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::{debug, info};

/// Create the subscription API routes
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        // Static segment wins over the `{id}` capture
        .route("/subscriptions/summary", get(summarize_subscriptions))
        .route(
            "/subscriptions/{id}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
        .route("/summary", get(summarize_subscriptions))
}

/// Query parameters for listing subscriptions
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Owner whose subscriptions are listed
    pub user_id: Option<String>,
}

/// Query parameters for the cost summary
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// First month of the range, `MM-YYYY`
    pub from: Option<String>,
    /// Last month of the range, `MM-YYYY`
    pub to: Option<String>,
    /// Restricts the total to one owner
    pub user_id: Option<String>,
    /// Case-insensitive substring of the service name
    pub service_name: Option<String>,
}

impl SummaryQuery {
    /// Checks the required bounds are present and builds the store filter.
    pub fn into_filter(self) -> Result<SummaryFilter> {
        let from = required(self.from, "from")?;
        let to = required(self.to, "to")?;
        Ok(SummaryFilter {
            from,
            to,
            user_id: self.user_id,
            service_name: self.service_name,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::missing(field))
}

async fn create_subscription(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SubscriptionInput>, JsonRejection>,
) -> Result<Json<Subscription>> {
    let Json(input) = payload?;
    let created = state.store.create(input).await?;
    info!(id = %created.id, user_id = %created.user_id, "Subscription created");
    Ok(Json(created))
}

async fn list_subscriptions(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Subscription>>> {
    let Query(params) = query?;
    let user_id = required(params.user_id, "user_id")?;
    let subscriptions = state.store.list(&user_id).await?;
    debug!(count = subscriptions.len(), "Listed subscriptions");
    Ok(Json(subscriptions))
}

async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subscription>> {
    Ok(Json(state.store.get(&id).await?))
}

async fn update_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<SubscriptionInput>, JsonRejection>,
) -> Result<Json<Subscription>> {
    let Json(input) = payload?;
    let updated = state.store.update(input.with_id(id)).await?;
    info!(id = %updated.id, "Subscription updated");
    Ok(Json(updated))
}

async fn delete_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.store.delete(&id).await?;
    info!(%id, "Subscription deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn summarize_subscriptions(
    State(state): State<AppState>,
    query: std::result::Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryTotal>> {
    let Query(params) = query?;
    let filter = params.into_filter()?;
    let total = state.store.sum(&filter).await?;
    Ok(Json(SummaryTotal { total }))
}
