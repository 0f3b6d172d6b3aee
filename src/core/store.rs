//! Store abstraction handed to the HTTP layer.
//!
//! The store is built once at startup and shared through the router state, so handlers
//! never reach for a global connection and tests can swap in another implementation.

use crate::{
    core::{subscription, summary},
    errors::Result,
    models::{Subscription, SubscriptionInput, SummaryFilter},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

/// Subscription persistence and summary operations.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Stores a new subscription and returns it with its generated id
    async fn create(&self, input: SubscriptionInput) -> Result<Subscription>;

    /// Fetches one subscription, failing with `SubscriptionNotFound` if absent
    async fn get(&self, id: &str) -> Result<Subscription>;

    /// All subscriptions of a user, possibly empty
    async fn list(&self, user_id: &str) -> Result<Vec<Subscription>>;

    /// Overwrites the mutable fields of an existing subscription
    async fn update(&self, subscription: Subscription) -> Result<Subscription>;

    /// Removes a subscription; unknown ids are not an error
    async fn delete(&self, id: &str) -> Result<()>;

    /// Sum of prices of subscriptions active within the filter's range
    async fn sum(&self, filter: &SummaryFilter) -> Result<i64>;
}

/// `SeaORM`-backed store.
#[derive(Debug)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionStore for DatabaseStore {
    async fn create(&self, input: SubscriptionInput) -> Result<Subscription> {
        subscription::create_subscription(&self.db, input).await
    }

    async fn get(&self, id: &str) -> Result<Subscription> {
        subscription::get_subscription(&self.db, id).await
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Subscription>> {
        subscription::list_subscriptions(&self.db, user_id).await
    }

    async fn update(&self, subscription: Subscription) -> Result<Subscription> {
        subscription::update_subscription(&self.db, subscription).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        subscription::delete_subscription(&self.db, id).await
    }

    async fn sum(&self, filter: &SummaryFilter) -> Result<i64> {
        summary::sum_subscription_prices(&self.db, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::Error, test_utils::setup_test_db};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_database_store_over_mock_connection() {
        // No results are queued, so only validation can answer
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let store: Arc<dyn SubscriptionStore> = Arc::new(DatabaseStore::new(db));

        let result = store
            .sum(&SummaryFilter::new("13-2024", "12-2024"))
            .await;
        assert!(matches!(result, Err(Error::InvalidMonth { .. })));
    }

    #[tokio::test]
    async fn test_database_store_round_trip_through_trait_object() -> Result<()> {
        let store: Arc<dyn SubscriptionStore> = Arc::new(DatabaseStore::new(setup_test_db().await?));

        let created = store
            .create(SubscriptionInput {
                service_name: "Netflix".to_string(),
                price: 1299,
                user_id: "user-1".to_string(),
                start_date: "01-2024".to_string(),
                end_date: None,
            })
            .await?;

        assert_eq!(store.get(&created.id).await?, created);
        assert_eq!(store.list("user-1").await?, vec![created.clone()]);
        assert_eq!(
            store.sum(&SummaryFilter::new("01-2024", "12-2024")).await?,
            1299
        );

        store.delete(&created.id).await?;
        assert!(store.list("user-1").await?.is_empty());

        Ok(())
    }
}
