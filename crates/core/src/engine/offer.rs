use serde::{Deserialize, Serialize};

use crate::domain::catalog::{ConfigurationId, RegisteredVehicle};
use crate::domain::pricing::{PriceOverride, PricingRule};
use crate::domain::quote::QuoteRequest;
use crate::engine::{evaluator, matcher};

pub const FINAL_OFFER_MESSAGE: &str = "This is our final offer.";
pub const INSPECTION_MESSAGE: &str = "Offer subject to change upon vehicle inspection.";

/// Read-only pricing inputs captured before computation starts. The engine
/// never touches storage: the orchestrator loads one of these, runs
/// [`compute_offer`], and persists the outcome afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub registered: Vec<RegisteredVehicle>,
    pub overrides: Vec<PriceOverride>,
    pub rules: Vec<PricingRule>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferSource {
    Override,
    Rules,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferStep {
    pub stage: String,
    pub detail: String,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferOutcome {
    pub amount: i64,
    pub message: String,
    /// `Some` when the described vehicle matched a registered configuration.
    pub configuration: Option<ConfigurationId>,
    pub source: OfferSource,
    pub floored: bool,
    pub trace: Vec<OfferStep>,
}

/// Compute a cash offer for the described vehicle.
///
/// Precedence: a configuration-specific override is the final answer;
/// otherwise the offer is the sum of matching rule modifiers. A computed
/// amount of zero or less is replaced with `default_offer`, so a persisted
/// offer is never negative as long as the configured floor is not.
pub fn compute_offer(
    request: &QuoteRequest,
    snapshot: &PricingSnapshot,
    default_offer: i64,
) -> OfferOutcome {
    let mut trace = Vec::new();

    let matched = matcher::match_configuration(&snapshot.registered, &request.vehicle);
    let configuration = matched.map(|vehicle| vehicle.id);

    let override_price = configuration.and_then(|id| {
        snapshot
            .overrides
            .iter()
            .find(|price_override| price_override.configuration_id == id)
            .map(|price_override| price_override.price)
    });

    let (mut amount, source) = match override_price {
        Some(price) => {
            trace.push(OfferStep {
                stage: "override".to_string(),
                detail: "fixed price for registered configuration".to_string(),
                amount: price,
            });
            (price, OfferSource::Override)
        }
        None => {
            let hits = evaluator::matching_rules(&request.conditions, &snapshot.rules);
            for rule in &hits {
                trace.push(OfferStep {
                    stage: format!("rule:{}", rule.feature_type),
                    detail: format!("{} = {}", rule.feature_type, rule.feature_value),
                    amount: rule.price_modifier,
                });
            }
            (hits.iter().map(|rule| rule.price_modifier).sum(), OfferSource::Rules)
        }
    };

    let floored = amount <= 0;
    if floored {
        trace.push(OfferStep {
            stage: "floor".to_string(),
            detail: format!("computed {amount} <= 0, substituting default offer"),
            amount: default_offer,
        });
        amount = default_offer;
    }

    let message =
        if configuration.is_some() { FINAL_OFFER_MESSAGE } else { INSPECTION_MESSAGE };

    OfferOutcome {
        amount,
        message: message.to_string(),
        configuration,
        source,
        floored,
        trace,
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_offer, OfferSource, PricingSnapshot, FINAL_OFFER_MESSAGE, INSPECTION_MESSAGE};
    use crate::domain::catalog::{ConfigurationId, RegisteredVehicle};
    use crate::domain::pricing::{FeatureType, PriceOverride, PricingRule};
    use crate::domain::quote::{ConditionFlags, QuoteRequest, VehicleDescription};

    fn civic_request(year: &str, conditions: ConditionFlags) -> QuoteRequest {
        QuoteRequest {
            vehicle: VehicleDescription {
                year: year.to_string(),
                make: "Honda".to_string(),
                model: "Civic".to_string(),
                body_type: "Sedan".to_string(),
                size: "Compact".to_string(),
            },
            conditions,
        }
    }

    fn registered_civic(year: &str) -> RegisteredVehicle {
        RegisteredVehicle {
            id: ConfigurationId(42),
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            body_type: "Sedan".to_string(),
            size: "Compact".to_string(),
            year: year.to_string(),
        }
    }

    fn deduction_rules() -> Vec<PricingRule> {
        vec![
            PricingRule {
                feature_type: FeatureType::HasEngine,
                feature_value: "false".to_string(),
                price_modifier: -500,
            },
            PricingRule {
                feature_type: FeatureType::HasTransmission,
                feature_value: "false".to_string(),
                price_modifier: -300,
            },
        ]
    }

    #[test]
    fn override_beats_rules_regardless_of_condition_flags() {
        let snapshot = PricingSnapshot {
            registered: vec![registered_civic("2020")],
            overrides: vec![PriceOverride { configuration_id: ConfigurationId(42), price: 4000 }],
            rules: deduction_rules(),
        };
        let request = civic_request("2020", ConditionFlags::default());

        let outcome = compute_offer(&request, &snapshot, 0);

        assert_eq!(outcome.amount, 4000);
        assert_eq!(outcome.source, OfferSource::Override);
        assert_eq!(outcome.configuration, Some(ConfigurationId(42)));
        assert_eq!(outcome.message, FINAL_OFFER_MESSAGE);
        assert!(!outcome.floored);
    }

    #[test]
    fn matched_vehicle_without_override_prices_by_rules() {
        let snapshot = PricingSnapshot {
            registered: vec![registered_civic("2020")],
            overrides: vec![],
            rules: vec![PricingRule {
                feature_type: FeatureType::HasKey,
                feature_value: "true".to_string(),
                price_modifier: 350,
            }],
        };
        let conditions = ConditionFlags { has_key: true, ..ConditionFlags::default() };

        let outcome = compute_offer(&civic_request("2020", conditions), &snapshot, 0);

        assert_eq!(outcome.amount, 350);
        assert_eq!(outcome.source, OfferSource::Rules);
        assert_eq!(outcome.message, FINAL_OFFER_MESSAGE);
    }

    #[test]
    fn unregistered_vehicle_gets_the_inspection_message() {
        let snapshot = PricingSnapshot {
            registered: vec![registered_civic("2020")],
            overrides: vec![],
            rules: vec![PricingRule {
                feature_type: FeatureType::HasTitle,
                feature_value: "true".to_string(),
                price_modifier: 600,
            }],
        };
        let conditions = ConditionFlags { has_title: true, ..ConditionFlags::default() };

        let outcome = compute_offer(&civic_request("2015", conditions), &snapshot, 0);

        assert_eq!(outcome.configuration, None);
        assert_eq!(outcome.amount, 600);
        assert_eq!(outcome.message, INSPECTION_MESSAGE);
    }

    #[test]
    fn non_positive_total_is_replaced_with_the_default_offer() {
        let snapshot = PricingSnapshot {
            registered: vec![],
            overrides: vec![],
            rules: deduction_rules(),
        };
        let request = civic_request("2015", ConditionFlags::default());

        let outcome = compute_offer(&request, &snapshot, 100);

        assert_eq!(outcome.amount, 100);
        assert!(outcome.floored);
        assert_eq!(outcome.message, INSPECTION_MESSAGE);
        assert_eq!(outcome.trace.last().expect("floor step").stage, "floor");
    }

    #[test]
    fn floor_defaults_to_zero_when_unconfigured() {
        let snapshot = PricingSnapshot {
            registered: vec![],
            overrides: vec![],
            rules: deduction_rules(),
        };
        let request = civic_request("2015", ConditionFlags::default());

        let outcome = compute_offer(&request, &snapshot, 0);

        assert_eq!(outcome.amount, 0);
        assert!(outcome.floored);
    }

    #[test]
    fn zero_total_with_no_matching_rules_is_floored_too() {
        let snapshot = PricingSnapshot::default();
        let request = civic_request("2015", ConditionFlags::default());

        let outcome = compute_offer(&request, &snapshot, 75);

        assert_eq!(outcome.amount, 75);
        assert!(outcome.floored);
        assert_eq!(outcome.trace.len(), 1);
    }

    #[test]
    fn trace_records_each_matching_rule() {
        let snapshot = PricingSnapshot {
            registered: vec![],
            overrides: vec![],
            rules: deduction_rules(),
        };
        let request = civic_request("2015", ConditionFlags::default());

        let outcome = compute_offer(&request, &snapshot, 0);

        let rule_steps: Vec<_> =
            outcome.trace.iter().filter(|step| step.stage.starts_with("rule:")).collect();
        assert_eq!(rule_steps.len(), 2);
        assert_eq!(rule_steps[0].amount, -500);
        assert_eq!(rule_steps[1].amount, -300);
    }
}
