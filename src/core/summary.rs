//! Cost summary over a range of months.
//!
//! A subscription counts towards a range when its active interval overlaps it: it starts
//! no later than the last month and either has no end or ends no earlier than the first
//! month. Optional predicates narrow the set to one user or to services whose name
//! contains a substring. Every predicate is a [`SummaryCondition`], so values are always
//! bound as parameters.

use crate::{
    core::month::BillingMonth,
    entities::{Subscription, subscription},
    errors::{Error, Result},
    models::SummaryFilter,
};
use sea_orm::{
    Condition, QuerySelect,
    prelude::*,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use tracing::{debug, instrument, warn};

/// One predicate of a summary query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryCondition {
    /// `start_date <= month`
    StartsNoLaterThan(BillingMonth),
    /// `end_date IS NULL OR end_date >= month`
    ActiveAtOrAfter(BillingMonth),
    /// `user_id = value`
    OwnedBy(String),
    /// Case-insensitive substring match on `service_name`
    ServiceNameContains(String),
}

impl SummaryCondition {
    /// Turns the predicate into a SeaORM condition.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        match self {
            Self::StartsNoLaterThan(month) => {
                Condition::all().add(subscription::Column::StartDate.lte(month.first_day()))
            }
            Self::ActiveAtOrAfter(month) => Condition::any()
                .add(subscription::Column::EndDate.is_null())
                .add(subscription::Column::EndDate.gte(month.first_day())),
            Self::OwnedBy(user_id) => {
                Condition::all().add(subscription::Column::UserId.eq(user_id.as_str()))
            }
            Self::ServiceNameContains(needle) => {
                // Both sides go through the same SQL LOWER so folding always agrees
                let pattern = format!("%{}%", escape_like(needle));
                Condition::all().add(Expr::cust_with_exprs(
                    "LOWER($1) LIKE LOWER($2) ESCAPE '\\'",
                    [
                        SimpleExpr::from(Expr::col(subscription::Column::ServiceName)),
                        SimpleExpr::from(Expr::val(pattern)),
                    ],
                ))
            }
        }
    }
}

/// Escapes the LIKE wildcards so the needle only ever matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// Parses a summary filter into the ordered list of predicates it stands for.
///
/// Fails with `InvalidMonth` if either bound is not `MM-YYYY`. An inverted range is
/// still queried; the overlap predicates decide what it matches. Blank optional values
/// are treated as absent.
pub fn build_conditions(filter: &SummaryFilter) -> Result<Vec<SummaryCondition>> {
    if filter.from.trim().is_empty() {
        return Err(Error::missing("from"));
    }
    if filter.to.trim().is_empty() {
        return Err(Error::missing("to"));
    }

    let from = BillingMonth::parse(&filter.from)?;
    let to = BillingMonth::parse(&filter.to)?;
    if from > to {
        warn!(%from, %to, "Summary range starts after it ends");
    }

    let mut conditions = vec![
        SummaryCondition::StartsNoLaterThan(to),
        SummaryCondition::ActiveAtOrAfter(from),
    ];
    if let Some(user_id) = non_blank(filter.user_id.as_ref()) {
        conditions.push(SummaryCondition::OwnedBy(user_id.to_string()));
    }
    if let Some(service_name) = non_blank(filter.service_name.as_ref()) {
        conditions.push(SummaryCondition::ServiceNameContains(service_name.to_string()));
    }

    Ok(conditions)
}

/// Sums the prices of every subscription matching `filter`.
///
/// Returns `0` when nothing matches.
#[instrument(skip(db))]
pub async fn sum_subscription_prices<C>(db: &C, filter: &SummaryFilter) -> Result<i64>
where
    C: ConnectionTrait,
{
    let condition = build_conditions(filter)?
        .iter()
        .fold(Condition::all(), |acc, c| acc.add(c.to_condition()));

    // SUM over BIGINT is NUMERIC on PostgreSQL, so cast back to an integer
    let total_expr: SimpleExpr = Func::cast_as(
        Func::sum(Expr::col(subscription::Column::Price)),
        Alias::new("BIGINT"),
    )
    .into();

    let total: Option<Option<i64>> = Subscription::find()
        .select_only()
        .column_as(total_expr, "total")
        .filter(condition)
        .into_tuple()
        .one(db)
        .await?;

    let total = total.flatten().unwrap_or(0);
    debug!(total, "Computed subscription summary");
    Ok(total)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    /// A: 01-2024..06-2024 at 100, B: 07-2024..open at 200, C: 01-2023..06-2023 at 50
    async fn seed_reference_set(db: &DatabaseConnection) -> Result<()> {
        create_test_subscription(db, "Netflix", 100, "user-1", "01-2024", Some("06-2024"))
            .await?;
        create_test_subscription(db, "Spotify", 200, "user-2", "07-2024", None).await?;
        create_test_subscription(db, "Hulu", 50, "user-1", "01-2023", Some("06-2023")).await?;
        Ok(())
    }

    #[test]
    fn test_build_conditions_required_only() {
        let conditions = build_conditions(&SummaryFilter::new("01-2024", "12-2024")).unwrap();
        assert_eq!(
            conditions,
            vec![
                SummaryCondition::StartsNoLaterThan(BillingMonth::new(2024, 12).unwrap()),
                SummaryCondition::ActiveAtOrAfter(BillingMonth::new(2024, 1).unwrap()),
            ]
        );
    }

    #[test]
    fn test_build_conditions_with_optional_predicates() {
        let filter = SummaryFilter::new("01-2024", "12-2024")
            .for_user("user-1")
            .matching_service(" net ");
        let conditions = build_conditions(&filter).unwrap();
        assert_eq!(conditions.len(), 4);
        assert_eq!(conditions[2], SummaryCondition::OwnedBy("user-1".to_string()));
        // Needles are matched as given, spaces included
        assert_eq!(
            conditions[3],
            SummaryCondition::ServiceNameContains(" net ".to_string())
        );
    }

    #[test]
    fn test_build_conditions_ignores_blank_optionals() {
        let filter = SummaryFilter::new("01-2024", "12-2024")
            .for_user("")
            .matching_service("   ");
        assert_eq!(build_conditions(&filter).unwrap().len(), 2);
    }

    #[test]
    fn test_build_conditions_validation() {
        let bad_from = build_conditions(&SummaryFilter::new("13-2024", "12-2024"));
        assert!(matches!(bad_from, Err(Error::InvalidMonth { ref value }) if value == "13-2024"));

        let bad_to = build_conditions(&SummaryFilter::new("01-2024", "2024"));
        assert!(matches!(bad_to, Err(Error::InvalidMonth { .. })));

        let missing = build_conditions(&SummaryFilter::new("", "12-2024"));
        assert!(matches!(missing, Err(Error::MissingField { ref field }) if field == "from"));
    }

    #[test]
    fn test_build_conditions_keeps_inverted_range() {
        let conditions = build_conditions(&SummaryFilter::new("12-2024", "01-2024")).unwrap();
        assert_eq!(
            conditions,
            vec![
                SummaryCondition::StartsNoLaterThan(BillingMonth::new(2024, 1).unwrap()),
                SummaryCondition::ActiveAtOrAfter(BillingMonth::new(2024, 12).unwrap()),
            ]
        );
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("net"), "net");
        assert_eq!(escape_like("100%_off\\"), "100\\%\\_off\\\\");
    }

    #[tokio::test]
    async fn test_sum_over_overlapping_range() -> Result<()> {
        let db = setup_test_db().await?;
        seed_reference_set(&db).await?;

        let total =
            sum_subscription_prices(&db, &SummaryFilter::new("01-2024", "12-2024")).await?;
        assert_eq!(total, 300);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_range_boundaries_are_inclusive() -> Result<()> {
        let db = setup_test_db().await?;
        seed_reference_set(&db).await?;

        // A ends in 06-2024 and B starts in 07-2024
        let june = sum_subscription_prices(&db, &SummaryFilter::new("06-2024", "06-2024")).await?;
        assert_eq!(june, 100);

        let july = sum_subscription_prices(&db, &SummaryFilter::new("07-2024", "07-2024")).await?;
        assert_eq!(july, 200);

        // Open-ended B keeps counting years later
        let later = sum_subscription_prices(&db, &SummaryFilter::new("01-2030", "03-2030")).await?;
        assert_eq!(later, 200);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_filters_by_user() -> Result<()> {
        let db = setup_test_db().await?;
        seed_reference_set(&db).await?;

        let filter = SummaryFilter::new("01-2023", "12-2024").for_user("user-1");
        assert_eq!(sum_subscription_prices(&db, &filter).await?, 150);

        let filter = SummaryFilter::new("01-2023", "12-2024").for_user("user-2");
        assert_eq!(sum_subscription_prices(&db, &filter).await?, 200);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_service_name_is_case_insensitive_substring() -> Result<()> {
        let db = setup_test_db().await?;
        seed_reference_set(&db).await?;

        let filter = SummaryFilter::new("01-2024", "12-2024").matching_service("net");
        assert_eq!(sum_subscription_prices(&db, &filter).await?, 100);

        let filter = SummaryFilter::new("01-2024", "12-2024").matching_service("NETFLIX");
        assert_eq!(sum_subscription_prices(&db, &filter).await?, 100);

        let filter = SummaryFilter::new("01-2024", "12-2024").matching_service("tif");
        assert_eq!(sum_subscription_prices(&db, &filter).await?, 200);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_inverted_range_uses_overlap() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_subscription(&db, "Netflix", 100, "user-1", "01-2023", None).await?;
        create_test_subscription(&db, "Hulu", 50, "user-1", "01-2023", Some("06-2024")).await?;

        // Open-ended and started before 01-2024, so still active at 12-2024
        let total =
            sum_subscription_prices(&db, &SummaryFilter::new("12-2024", "01-2024")).await?;
        assert_eq!(total, 100);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_service_name_matches_non_ascii() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_subscription(&db, "Кинопоиск", 300, "user-1", "01-2024", None).await?;
        create_test_subscription(&db, "Netflix", 100, "user-1", "01-2024", None).await?;

        let filter = SummaryFilter::new("01-2024", "12-2024").matching_service("Кино");
        assert_eq!(sum_subscription_prices(&db, &filter).await?, 300);

        let filter = SummaryFilter::new("01-2024", "12-2024").matching_service("нопо");
        assert_eq!(sum_subscription_prices(&db, &filter).await?, 300);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_wildcards_in_service_name_match_literally() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_subscription(&db, "Netflix", 100, "user-1", "01-2024", None).await?;
        create_test_subscription(&db, "100% Cloud", 30, "user-1", "01-2024", None).await?;

        let filter = SummaryFilter::new("01-2024", "12-2024").matching_service("%");
        assert_eq!(sum_subscription_prices(&db, &filter).await?, 30);

        let filter = SummaryFilter::new("01-2024", "12-2024").matching_service("_");
        assert_eq!(sum_subscription_prices(&db, &filter).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_with_no_matches_is_zero() -> Result<()> {
        let db = setup_test_db().await?;

        // Empty table
        let total =
            sum_subscription_prices(&db, &SummaryFilter::new("01-2024", "12-2024")).await?;
        assert_eq!(total, 0);

        seed_reference_set(&db).await?;

        // Before anything started
        let total =
            sum_subscription_prices(&db, &SummaryFilter::new("01-2020", "12-2020")).await?;
        assert_eq!(total, 0);

        let filter = SummaryFilter::new("01-2024", "12-2024").for_user("nobody");
        assert_eq!(sum_subscription_prices(&db, &filter).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_rejects_invalid_months() -> Result<()> {
        let db = setup_test_db().await?;

        let result = sum_subscription_prices(&db, &SummaryFilter::new("1-2024", "12-2024")).await;
        assert!(matches!(result, Err(Error::InvalidMonth { .. })));

        Ok(())
    }
}
