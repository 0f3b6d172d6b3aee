//! Subscription entity - One recurring paid service owned by a user.
//!
//! Months are stored as the first day of the month so that range comparisons can be
//! done directly on the `start_date` and `end_date` columns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subscription database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    /// Generated UUID, assigned on insert
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Vendor label, e.g. "Netflix"
    pub service_name: String,
    /// Price in minor currency units (cents)
    pub price: i64,
    /// Owner of the subscription
    #[sea_orm(indexed)]
    pub user_id: String,
    /// First day of the first billed month
    pub start_date: Date,
    /// First day of the last billed month, `None` while still active
    pub end_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
