//! Property tests for real-time scoring

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{ClaimId, ClaimantId, RiskLevel};
use domain_claims::{
    AssessmentContext, Claim, ClaimantProfile, CrossReferenceCounts, DerivedFacts, ReferenceCase,
    SessionMetrics,
};
use domain_scoring::RealTimeScorer;

fn reference_cases() -> impl Strategy<Value = Vec<ReferenceCase>> {
    prop::collection::vec(
        (0.0f64..2000.0, 0.0f64..100.0).prop_map(|(weekly_amount, risk_score)| ReferenceCase {
            weekly_amount,
            risk_score,
        }),
        0..40,
    )
}

proptest! {
    /// Scores stay within 0..=1000 and approval implies a low, unblocked result
    #[test]
    fn score_is_bounded(
        weekly in 0u32..5000,
        risk in 0u32..=100,
        usage in 0u32..5,
        velocity in 0u32..6,
        shared_address in 0u32..10,
        shared_phone in 0u32..10,
        fraud in reference_cases(),
        false_positives in reference_cases(),
        sessions in prop::collection::vec((1.0f64..600.0, 1.0f64..3600.0, 0u8..6, 0.0f64..1.0), 0..6),
    ) {
        let scorer = RealTimeScorer::default();
        let weekly = Decimal::from(weekly);
        let claim = Claim::new(ClaimId::new("CLM-P"), ClaimantId::new("C-P"), weekly, weekly * Decimal::from(26));
        let mut claimant = ClaimantProfile::new(ClaimantId::new("C-P"), "Pat", "Kim", "ssn-p");
        claimant.set_risk_score(risk).unwrap();

        let base = AssessmentContext::new().with_derived(DerivedFacts {
            ssn_usage_count: usage,
            claims_last_30_days: velocity,
            ..Default::default()
        });

        let mut contexts: Vec<AssessmentContext> = sessions
            .into_iter()
            .map(|(typing, duration, device, location)| {
                base.clone().with_session(SessionMetrics {
                    typing_speed: typing,
                    session_duration_secs: duration,
                    device_fingerprint: format!("device-{device}"),
                    location_consistency: location,
                })
            })
            .collect();
        let mut last = base;
        last.cross_reference = CrossReferenceCounts { shared_address_count: shared_address, shared_phone_count: shared_phone };
        last.confirmed_fraud_cases = fraud;
        last.false_positive_cases = false_positives;
        contexts.push(last);

        for context in &contexts {
            let result = scorer.score(&claim, &claimant, context);
            prop_assert!((0.0..=1000.0).contains(&result.overall_risk_score));
            prop_assert_eq!(result.requires_investigation, result.overall_risk_score >= 100.0);
            if result.auto_approval_eligible {
                prop_assert_eq!(result.risk_level, RiskLevel::Low);
                prop_assert!(!result.blocked);
            }
        }
    }
}
