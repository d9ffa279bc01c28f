use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{BodyTypeId, ConfigurationId, SizeId};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

/// The descriptive half of a quote request: which vehicle the caller claims
/// to have. All fields are compared with exact, case-sensitive equality
/// against the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDescription {
    pub year: String,
    pub make: String,
    pub model: String,
    pub body_type: String,
    pub size: String,
}

/// The condition half of a quote request. The field set is fixed: it is the
/// whole condition vocabulary the rule evaluator understands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionFlags {
    pub it_moves: bool,
    pub has_all_wheels: bool,
    pub has_alloy_wheels: bool,
    pub has_all_tires: bool,
    pub has_key: bool,
    pub has_title: bool,
    pub requires_pickup: bool,
    pub has_engine: bool,
    pub has_transmission: bool,
    pub has_complete_interior: bool,
}

/// Caller-supplied quote request. Transient: it has no persistence identity
/// of its own until the orchestrator turns it into a [`QuoteRecord`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(flatten)]
    pub vehicle: VehicleDescription,
    #[serde(flatten)]
    pub conditions: ConditionFlags,
}

/// The persisted outcome of one quote calculation. Written exactly once per
/// successful request, never updated or deleted afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: QuoteId,
    /// `None` when the described vehicle is not a registered configuration.
    pub configuration_id: Option<ConfigurationId>,
    pub vehicle: VehicleDescription,
    pub body_type_id: BodyTypeId,
    pub size_id: SizeId,
    pub conditions: ConditionFlags,
    pub offered_quote: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Response resource for submitted and listed quotes. Echoes the request
/// fields back alongside the stored outcome, so callers never see the raw
/// storage row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedQuote {
    pub id: QuoteId,
    pub created_at: DateTime<Utc>,
    pub offered_quote: i64,
    pub message: String,
    #[serde(flatten)]
    pub vehicle: VehicleDescription,
    #[serde(flatten)]
    pub conditions: ConditionFlags,
}

impl SubmittedQuote {
    pub fn from_record(record: &QuoteRecord) -> Self {
        Self {
            id: record.id.clone(),
            created_at: record.created_at,
            offered_quote: record.offered_quote,
            message: record.message.clone(),
            vehicle: record.vehicle.clone(),
            conditions: record.conditions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConditionFlags, QuoteRequest, VehicleDescription};

    fn request() -> QuoteRequest {
        QuoteRequest {
            vehicle: VehicleDescription {
                year: "2015".to_string(),
                make: "Honda".to_string(),
                model: "Civic".to_string(),
                body_type: "Sedan".to_string(),
                size: "Compact".to_string(),
            },
            conditions: ConditionFlags { has_key: true, ..ConditionFlags::default() },
        }
    }

    #[test]
    fn request_serializes_flat_with_camel_case_keys() {
        let value = serde_json::to_value(request()).expect("serialize request");

        assert_eq!(value["bodyType"], "Sedan");
        assert_eq!(value["hasKey"], true);
        assert_eq!(value["itMoves"], false);
        assert!(value.get("vehicle").is_none(), "vehicle fields should be flattened");
    }

    #[test]
    fn request_round_trips_through_json() {
        let original = request();
        let raw = serde_json::to_string(&original).expect("serialize");
        let parsed: QuoteRequest = serde_json::from_str(&raw).expect("deserialize");

        assert_eq!(parsed, original);
    }
}
