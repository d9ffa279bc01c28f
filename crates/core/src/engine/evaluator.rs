use crate::domain::pricing::{FeatureType, PricingRule};
use crate::domain::quote::ConditionFlags;

/// For each feature type in the fixed vocabulary, find the rule (if any)
/// whose value matches the observed condition. Rules are opt-in: a category
/// with no matching rule contributes nothing.
pub fn matching_rules<'a>(
    conditions: &ConditionFlags,
    rules: &'a [PricingRule],
) -> Vec<&'a PricingRule> {
    FeatureType::ALL
        .iter()
        .filter_map(|feature_type| {
            let observed = feature_type.observed_value(conditions);
            rules.iter().find(|rule| {
                rule.feature_type == *feature_type && rule.feature_value == observed
            })
        })
        .collect()
}

/// Sum the modifiers of every matching rule. Modifiers may be negative; the
/// result is not clamped here. The floor belongs to the orchestrator.
pub fn evaluate(conditions: &ConditionFlags, rules: &[PricingRule]) -> i64 {
    matching_rules(conditions, rules).iter().map(|rule| rule.price_modifier).sum()
}

#[cfg(test)]
mod tests {
    use super::{evaluate, matching_rules};
    use crate::domain::pricing::{FeatureType, PricingRule};
    use crate::domain::quote::ConditionFlags;

    fn rule(feature_type: FeatureType, feature_value: &str, price_modifier: i64) -> PricingRule {
        PricingRule { feature_type, feature_value: feature_value.to_string(), price_modifier }
    }

    #[test]
    fn sums_modifiers_of_matching_rules_only() {
        let conditions = ConditionFlags {
            it_moves: true,
            has_engine: false,
            has_transmission: false,
            ..ConditionFlags::default()
        };
        let rules = vec![
            rule(FeatureType::HasEngine, "false", -500),
            rule(FeatureType::HasTransmission, "false", -300),
            rule(FeatureType::ItMoves, "false", -200),
            rule(FeatureType::ItMoves, "true", 150),
        ];

        assert_eq!(evaluate(&conditions, &rules), 150 - 500 - 300);
    }

    #[test]
    fn no_rules_means_zero() {
        assert_eq!(evaluate(&ConditionFlags::default(), &[]), 0);
    }

    #[test]
    fn unmapped_feature_values_contribute_nothing() {
        // Only a rule for has_key:true exists; the request has has_key:false.
        let rules = vec![rule(FeatureType::HasKey, "true", 100)];

        assert_eq!(evaluate(&ConditionFlags::default(), &rules), 0);
        assert!(matching_rules(&ConditionFlags::default(), &rules).is_empty());
    }

    #[test]
    fn one_rule_per_feature_type_is_picked_at_most() {
        let conditions = ConditionFlags { has_title: true, ..ConditionFlags::default() };
        let rules = vec![
            rule(FeatureType::HasTitle, "true", 250),
            rule(FeatureType::HasTitle, "false", -250),
        ];

        let matched = matching_rules(&conditions, &rules);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].price_modifier, 250);
    }

    #[test]
    fn negative_totals_are_not_clamped_by_the_evaluator() {
        let rules = vec![
            rule(FeatureType::HasEngine, "false", -500),
            rule(FeatureType::HasTransmission, "false", -300),
        ];

        assert_eq!(evaluate(&ConditionFlags::default(), &rules), -800);
    }
}
