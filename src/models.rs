//! Request and response shapes exchanged with callers.
//!
//! Dates stay as `MM-YYYY` strings here; the store parses them so that a malformed month
//! is reported as a validation error by the operation that received it.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// A stored subscription as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub service_name: String,
    /// Price in minor currency units
    pub price: i64,
    pub user_id: String,
    /// `MM-YYYY`
    pub start_date: String,
    /// `MM-YYYY`, absent for open-ended subscriptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Caller-supplied subscription fields. The id is always assigned by the store, so any
/// `id` key in a request body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionInput {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl SubscriptionInput {
    /// Checks the fields that can be validated without parsing dates.
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(Error::missing("service_name"));
        }
        if self.user_id.trim().is_empty() {
            return Err(Error::missing("user_id"));
        }
        if self.price < 0 {
            return Err(Error::InvalidPrice { price: self.price });
        }
        Ok(())
    }

    /// Attaches an existing id, producing the full record used for updates.
    #[must_use]
    pub fn with_id(self, id: String) -> Subscription {
        Subscription {
            id,
            service_name: self.service_name,
            price: self.price,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

impl From<Subscription> for SubscriptionInput {
    fn from(value: Subscription) -> Self {
        Self {
            service_name: value.service_name,
            price: value.price,
            user_id: value.user_id,
            start_date: value.start_date,
            end_date: value.end_date,
        }
    }
}

/// Inputs of a cost summary: an inclusive month range plus optional narrowing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryFilter {
    /// `MM-YYYY`, first month of the range
    pub from: String,
    /// `MM-YYYY`, last month of the range
    pub to: String,
    pub user_id: Option<String>,
    /// Case-insensitive substring of the service name
    pub service_name: Option<String>,
}

impl SummaryFilter {
    /// Builds a filter over `[from, to]` with no narrowing predicates.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            user_id: None,
            service_name: None,
        }
    }

    #[must_use]
    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn matching_service(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }
}

/// Response body of the summary endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotal {
    pub total: i64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn input() -> SubscriptionInput {
        SubscriptionInput {
            service_name: "Netflix".to_string(),
            price: 1299,
            user_id: "user-123".to_string(),
            start_date: "01-2024".to_string(),
            end_date: None,
        }
    }

    #[test]
    fn test_validate_accepts_complete_input() {
        assert!(input().validate().is_ok());

        let free = SubscriptionInput { price: 0, ..input() };
        assert!(free.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_and_negative_fields() {
        let blank_name = SubscriptionInput {
            service_name: "  ".to_string(),
            ..input()
        };
        assert!(matches!(
            blank_name.validate(),
            Err(Error::MissingField { ref field }) if field == "service_name"
        ));

        let blank_user = SubscriptionInput {
            user_id: String::new(),
            ..input()
        };
        assert!(matches!(
            blank_user.validate(),
            Err(Error::MissingField { ref field }) if field == "user_id"
        ));

        let negative = SubscriptionInput {
            price: -5,
            ..input()
        };
        assert!(matches!(
            negative.validate(),
            Err(Error::InvalidPrice { price: -5 })
        ));
    }

    #[test]
    fn test_subscription_json_omits_missing_end_date() {
        let subscription = input().with_id("sub-1".to_string());
        let json = serde_json::to_value(&subscription).unwrap();
        assert_eq!(json["id"], "sub-1");
        assert_eq!(json["start_date"], "01-2024");
        assert!(json.get("end_date").is_none());
    }

    #[test]
    fn test_input_ignores_body_id_and_requires_fields() {
        let parsed: SubscriptionInput = serde_json::from_str(
            r#"{"id":"caller-chosen","service_name":"Spotify","price":999,"user_id":"u1","start_date":"02-2024","end_date":"05-2024"}"#,
        )
        .unwrap();
        assert_eq!(parsed.service_name, "Spotify");
        assert_eq!(parsed.end_date.as_deref(), Some("05-2024"));

        let missing_price = serde_json::from_str::<SubscriptionInput>(
            r#"{"service_name":"Spotify","user_id":"u1","start_date":"02-2024"}"#,
        );
        assert!(missing_price.is_err());
    }
}
