//! Continuous learning adjustment
//!
//! Nudges the score toward recently confirmed outcomes: a claim resembling a
//! confirmed fraud case scores higher, one resembling a false positive lower.

use rust_decimal::prelude::ToPrimitive;

use domain_claims::{AssessmentContext, Claim, ClaimantProfile, ReferenceCase};

use crate::behavioral::SignalScore;
use crate::config::ScorerConfig;

const FRAUD_MATCH_POINTS: f64 = 10.0;
const FALSE_POSITIVE_POINTS: f64 = -5.0;

/// Signed adjustment from reference-case similarity
pub fn learning_adjustment(
    claim: &Claim,
    claimant: &ClaimantProfile,
    context: &AssessmentContext,
    config: &ScorerConfig,
) -> SignalScore {
    let weekly = claim.weekly_benefit_amount.to_f64().unwrap_or(0.0);
    let risk = f64::from(claimant.risk_score);
    let similar = |case: &&ReferenceCase| {
        (weekly - case.weekly_amount).abs() <= config.learning_amount_tolerance
            && (risk - case.risk_score).abs() <= config.learning_risk_tolerance
    };

    let mut signal = SignalScore::default();
    let fraud = context.confirmed_fraud_cases.iter().filter(similar).count();
    if fraud > 0 {
        signal.add(fraud as f64 * FRAUD_MATCH_POINTS, format!("similar to {fraud} confirmed fraud cases"));
    }
    let false_positives = context.false_positive_cases.iter().filter(similar).count();
    if false_positives > 0 {
        signal.add(
            false_positives as f64 * FALSE_POSITIVE_POINTS,
            format!("similar to {false_positives} confirmed false positives"),
        );
    }
    signal
}
