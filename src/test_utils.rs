//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test subscriptions.

use crate::{
    core::subscription,
    errors::Result,
    models::{Subscription, SubscriptionInput},
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a subscription through the store.
///
/// # Arguments
/// * `db` - Database connection
/// * `service_name` - Vendor label
/// * `price` - Price in cents
/// * `user_id` - Owner
/// * `start_date` - `MM-YYYY`
/// * `end_date` - `MM-YYYY`, `None` for open-ended
pub async fn create_test_subscription(
    db: &DatabaseConnection,
    service_name: &str,
    price: i64,
    user_id: &str,
    start_date: &str,
    end_date: Option<&str>,
) -> Result<Subscription> {
    subscription::create_subscription(
        db,
        SubscriptionInput {
            service_name: service_name.to_string(),
            price,
            user_id: user_id.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.map(str::to_string),
        },
    )
    .await
}
