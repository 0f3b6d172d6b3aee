//! Subscription business logic - create, read, update and delete subscription rows.
//!
//! Months are parsed from `MM-YYYY` on the way in and rendered back on every read, so
//! callers never see the first-of-month dates used for storage. All functions are async,
//! generic over the connection, and return the crate `Result`.

use crate::{
    core::month::{BillingMonth, format_month},
    entities::{Subscription, subscription},
    errors::{Error, Result},
    models::{self, SubscriptionInput},
};
use sea_orm::{ActiveValue::NotSet, QueryOrder, Set, prelude::*};
use tracing::{debug, instrument, warn};

/// Parsed and validated fields shared by create and update.
struct ValidatedFields {
    service_name: String,
    price: i64,
    user_id: String,
    start: BillingMonth,
    end: Option<BillingMonth>,
}

fn validate(input: SubscriptionInput) -> Result<ValidatedFields> {
    input.validate()?;

    let start = BillingMonth::parse(&input.start_date)?;
    let end = BillingMonth::parse_optional(input.end_date.as_deref())?;

    if let Some(end) = end {
        if end < start {
            // Accepted as-is; callers own the meaning of an inverted interval
            warn!(
                service_name = %input.service_name,
                %start,
                %end,
                "Subscription ends before it starts"
            );
        }
    }

    Ok(ValidatedFields {
        service_name: input.service_name,
        price: input.price,
        user_id: input.user_id,
        start,
        end,
    })
}

/// Converts a stored row into the caller-facing record.
#[must_use]
pub fn to_record(model: subscription::Model) -> models::Subscription {
    models::Subscription {
        id: model.id,
        service_name: model.service_name,
        price: model.price,
        user_id: model.user_id,
        start_date: format_month(model.start_date),
        end_date: model.end_date.map(format_month),
    }
}

/// Creates a subscription with a freshly generated id.
///
/// Fails with a validation error before touching the database if a field is blank, the
/// price is negative, or either month is not `MM-YYYY`.
#[instrument(skip(db, input), fields(user_id = %input.user_id))]
pub async fn create_subscription<C>(db: &C, input: SubscriptionInput) -> Result<models::Subscription>
where
    C: ConnectionTrait,
{
    let fields = validate(input)?;

    let subscription = subscription::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        service_name: Set(fields.service_name),
        price: Set(fields.price),
        user_id: Set(fields.user_id),
        start_date: Set(fields.start.first_day()),
        end_date: Set(fields.end.map(BillingMonth::first_day)),
    };

    let model = subscription.insert(db).await?;
    debug!(id = %model.id, "Created subscription");
    Ok(to_record(model))
}

/// Fetches one subscription by id.
pub async fn get_subscription<C>(db: &C, id: &str) -> Result<models::Subscription>
where
    C: ConnectionTrait,
{
    Subscription::find_by_id(id.to_string())
        .one(db)
        .await?
        .map(to_record)
        .ok_or_else(|| Error::SubscriptionNotFound { id: id.to_string() })
}

/// Lists every subscription owned by `user_id`, oldest start month first.
///
/// An unknown user simply yields an empty list.
pub async fn list_subscriptions<C>(db: &C, user_id: &str) -> Result<Vec<models::Subscription>>
where
    C: ConnectionTrait,
{
    let rows = Subscription::find()
        .filter(subscription::Column::UserId.eq(user_id))
        .order_by_asc(subscription::Column::StartDate)
        .order_by_asc(subscription::Column::Id)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(to_record).collect())
}

/// Overwrites every mutable field of the subscription with `record.id`.
///
/// Returns `SubscriptionNotFound` when no row has that id.
#[instrument(skip(db, record), fields(id = %record.id))]
pub async fn update_subscription<C>(
    db: &C,
    record: models::Subscription,
) -> Result<models::Subscription>
where
    C: ConnectionTrait,
{
    let id = record.id.clone();
    let fields = validate(record.into())?;

    let changes = subscription::ActiveModel {
        id: NotSet,
        service_name: Set(fields.service_name.clone()),
        price: Set(fields.price),
        user_id: Set(fields.user_id.clone()),
        start_date: Set(fields.start.first_day()),
        end_date: Set(fields.end.map(BillingMonth::first_day)),
    };

    let result = Subscription::update_many()
        .set(changes)
        .filter(subscription::Column::Id.eq(id.as_str()))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::SubscriptionNotFound { id });
    }

    debug!("Updated subscription");
    Ok(models::Subscription {
        id,
        service_name: fields.service_name,
        price: fields.price,
        user_id: fields.user_id,
        start_date: fields.start.to_string(),
        end_date: fields.end.map(|end| end.to_string()),
    })
}

/// Deletes a subscription. Deleting an id that does not exist is not an error.
#[instrument(skip(db))]
pub async fn delete_subscription<C>(db: &C, id: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Subscription::delete_by_id(id.to_string()).exec(db).await?;
    debug!(rows_affected = result.rows_affected, "Deleted subscription");
    Ok(())
}
