//! Statistical anomaly checks

use chrono::Timelike;
use rust_decimal::prelude::ToPrimitive;

use domain_claims::{AssessmentContext, Claim, ClaimantProfile};

use crate::behavioral::SignalScore;
use crate::config::ScorerConfig;

const OFF_HOURS_POINTS: f64 = 15.0;
const AMOUNT_POINTS: f64 = 25.0;
const BASELINE_RISK_POINTS: f64 = 30.0;
const SHARED_ADDRESS_POINTS: f64 = 20.0;
const SHARED_PHONE_POINTS: f64 = 15.0;

/// Filing hour, benefit amount, baseline risk and shared-contact checks
pub fn anomaly_score(
    claim: &Claim,
    claimant: &ClaimantProfile,
    context: &AssessmentContext,
    config: &ScorerConfig,
) -> SignalScore {
    let mut signal = SignalScore::default();

    let hour = claim.created_date.hour();
    if hour < config.business_hours_start || hour >= config.business_hours_end {
        signal.add(OFF_HOURS_POINTS, format!("filed at {hour:02}:00 UTC"));
    }

    let weekly = claim.weekly_benefit_amount.to_f64().unwrap_or(0.0);
    let reference = config.reference_weekly_amount;
    if reference > 0.0 {
        let deviation = (weekly - reference).abs() / reference;
        if deviation > config.amount_deviation {
            signal.add(
                AMOUNT_POINTS,
                format!("weekly amount {weekly:.2} deviates {:.0}% from {reference:.2}", deviation * 100.0),
            );
        }
    }

    if claimant.risk_score > config.baseline_risk_threshold {
        signal.add(BASELINE_RISK_POINTS, format!("baseline risk score {}", claimant.risk_score));
    }

    let shared = context.cross_reference;
    if shared.shared_address_count > config.shared_address_threshold {
        signal.add(
            SHARED_ADDRESS_POINTS,
            format!("address shared with {} claimants", shared.shared_address_count),
        );
    }
    if shared.shared_phone_count > config.shared_phone_threshold {
        signal.add(
            SHARED_PHONE_POINTS,
            format!("phone shared with {} claimants", shared.shared_phone_count),
        );
    }

    signal
}
