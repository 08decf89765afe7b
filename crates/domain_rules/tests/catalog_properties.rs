//! Property tests for the default rule catalog

use proptest::prelude::*;

use core_kernel::RiskLevel;
use domain_rules::RuleEngine;
use test_utils::{
    assert_approval_consistent, claim_strategy, claimant_strategy, derived_facts_strategy, ContextFixtures,
};

proptest! {
    /// Only a death-registry match blocks, and the level always follows the score
    #[test]
    fn default_catalog_levels_follow_score(
        derived in derived_facts_strategy(),
        claim in claim_strategy(1),
        claimant in claimant_strategy(1),
    ) {
        let engine = RuleEngine::new();
        let context = ContextFixtures::with_derived(derived.clone());

        let result = engine.evaluate(&claim, &claimant, None, &context);

        assert_approval_consistent(&result);
        prop_assert_eq!(result.blocked, derived.death_registry_match);
        prop_assert_eq!(
            result.risk_level,
            RiskLevel::from_score(result.overall_risk_score, result.blocked)
        );
        prop_assert_eq!(result.triggered_rules.len(), result.risk_factors.len());
    }
}
