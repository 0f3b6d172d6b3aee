//! Core business logic - framework-agnostic subscription storage and cost summaries.

/// `MM-YYYY` month parsing and rendering
pub mod month;
/// Injectable store trait and its database implementation
pub mod store;
/// Subscription create, read, update and delete
pub mod subscription;
/// Price totals over a month range
pub mod summary;

pub use month::BillingMonth;
pub use store::{DatabaseStore, SubscriptionStore};
