use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::ConfigurationId;
use crate::domain::quote::ConditionFlags;

/// The fixed vocabulary of vehicle condition categories that pricing rules
/// can key on. Rules are matched against an explicit table of typed accessors
/// over [`ConditionFlags`] rather than by indexing the request with a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    ItMoves,
    HasAllWheels,
    HasAlloyWheels,
    HasAllTires,
    HasKey,
    HasTitle,
    RequiresPickup,
    HasEngine,
    HasTransmission,
    HasCompleteInterior,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown feature type `{0}`")]
pub struct UnknownFeatureType(pub String);

impl FeatureType {
    pub const ALL: [FeatureType; 10] = [
        FeatureType::ItMoves,
        FeatureType::HasAllWheels,
        FeatureType::HasAlloyWheels,
        FeatureType::HasAllTires,
        FeatureType::HasKey,
        FeatureType::HasTitle,
        FeatureType::RequiresPickup,
        FeatureType::HasEngine,
        FeatureType::HasTransmission,
        FeatureType::HasCompleteInterior,
    ];

    /// Stable identifier used in storage and rule administration.
    pub fn key(self) -> &'static str {
        match self {
            FeatureType::ItMoves => "it_moves",
            FeatureType::HasAllWheels => "has_all_wheels",
            FeatureType::HasAlloyWheels => "has_alloy_wheels",
            FeatureType::HasAllTires => "has_all_tires",
            FeatureType::HasKey => "has_key",
            FeatureType::HasTitle => "has_title",
            FeatureType::RequiresPickup => "requires_pickup",
            FeatureType::HasEngine => "has_engine",
            FeatureType::HasTransmission => "has_transmission",
            FeatureType::HasCompleteInterior => "has_complete_interior",
        }
    }

    /// Typed accessor for this category's flag on a request.
    pub fn flag(self, conditions: &ConditionFlags) -> bool {
        match self {
            FeatureType::ItMoves => conditions.it_moves,
            FeatureType::HasAllWheels => conditions.has_all_wheels,
            FeatureType::HasAlloyWheels => conditions.has_alloy_wheels,
            FeatureType::HasAllTires => conditions.has_all_tires,
            FeatureType::HasKey => conditions.has_key,
            FeatureType::HasTitle => conditions.has_title,
            FeatureType::RequiresPickup => conditions.requires_pickup,
            FeatureType::HasEngine => conditions.has_engine,
            FeatureType::HasTransmission => conditions.has_transmission,
            FeatureType::HasCompleteInterior => conditions.has_complete_interior,
        }
    }

    /// The observed value for this category, rendered the way rule rows store
    /// their `feature_value` column.
    pub fn observed_value(self, conditions: &ConditionFlags) -> &'static str {
        if self.flag(conditions) {
            "true"
        } else {
            "false"
        }
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for FeatureType {
    type Err = UnknownFeatureType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|feature_type| feature_type.key() == value)
            .ok_or_else(|| UnknownFeatureType(value.to_string()))
    }
}

/// Additive price modifier keyed to one (feature type, feature value) pair.
/// At most one rule exists per pair; absence of a rule means "no adjustment".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRule {
    pub feature_type: FeatureType,
    pub feature_value: String,
    pub price_modifier: i64,
}

impl PricingRule {
    pub fn applies_to(&self, conditions: &ConditionFlags) -> bool {
        self.feature_value == self.feature_type.observed_value(conditions)
    }
}

/// Fixed price bound to exactly one registered configuration. When present it
/// is the final answer for that configuration: rule evaluation is skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOverride {
    pub configuration_id: ConfigurationId,
    pub price: i64,
}

#[cfg(test)]
mod tests {
    use super::{FeatureType, PricingRule};
    use crate::domain::quote::ConditionFlags;

    #[test]
    fn feature_type_keys_round_trip_through_from_str() {
        for feature_type in FeatureType::ALL {
            let parsed: FeatureType = feature_type.key().parse().expect("known key");
            assert_eq!(parsed, feature_type);
        }
    }

    #[test]
    fn unknown_feature_type_key_is_rejected() {
        let error = "has_warp_drive".parse::<FeatureType>().expect_err("unknown key");
        assert_eq!(error.0, "has_warp_drive");
    }

    #[test]
    fn accessor_table_covers_every_flag() {
        let conditions = ConditionFlags {
            it_moves: true,
            has_title: true,
            has_engine: true,
            ..ConditionFlags::default()
        };

        let observed: Vec<bool> =
            FeatureType::ALL.iter().map(|feature_type| feature_type.flag(&conditions)).collect();

        assert_eq!(
            observed,
            vec![true, false, false, false, false, true, false, true, false, false]
        );
    }

    #[test]
    fn rule_applies_only_when_observed_value_matches() {
        let rule = PricingRule {
            feature_type: FeatureType::HasEngine,
            feature_value: "false".to_string(),
            price_modifier: -500,
        };

        assert!(rule.applies_to(&ConditionFlags::default()));
        assert!(!rule.applies_to(&ConditionFlags { has_engine: true, ..ConditionFlags::default() }));
    }
}
