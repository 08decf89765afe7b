//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use domain_claims::{Claim, ClaimantProfile, DerivedFacts, VerificationStatus};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::{ClaimBuilder, ClaimantBuilder};
use crate::fixtures::TemporalFixtures;

/// Strategy for claimant baseline risk scores
pub fn risk_score_strategy() -> impl Strategy<Value = u8> {
    0u8..=100u8
}

/// Strategy for cumulative assessment scores
pub fn assessment_score_strategy() -> impl Strategy<Value = f64> {
    0.0f64..=1000.0f64
}

/// Strategy for weekly benefit amounts between $50 and $1,500, in cents
pub fn weekly_amount_strategy() -> impl Strategy<Value = Decimal> {
    (5_000i64..150_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

pub fn verification_strategy() -> impl Strategy<Value = VerificationStatus> {
    prop_oneof![
        Just(VerificationStatus::Verified),
        Just(VerificationStatus::Pending),
        Just(VerificationStatus::Failed),
        Just(VerificationStatus::Unverified),
    ]
}

/// Strategy for filing IPs drawn from a small pool so groups form
pub fn ip_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("203.0.113.5".to_string())),
        Just(Some("203.0.113.9".to_string())),
        Just(Some("198.51.100.20".to_string())),
        Just(Some("5.44.12.1".to_string())),
    ]
}

/// Strategy for lookup-derived facts
pub fn derived_facts_strategy() -> impl Strategy<Value = DerivedFacts> {
    (0u32..5, proptest::option::of(0.1f64..6.0), 0u32..8, any::<bool>()).prop_map(
        |(ssn_usage_count, wage_to_industry_ratio, claims_last_30_days, death_registry_match)| DerivedFacts {
            ssn_usage_count,
            wage_to_industry_ratio,
            claims_last_30_days,
            death_registry_match,
        },
    )
}

/// Strategy for a claimant with the given number
pub fn claimant_strategy(n: u32) -> impl Strategy<Value = ClaimantProfile> {
    (risk_score_strategy(), 0i64..1000, verification_strategy()).prop_map(move |(score, age, status)| {
        ClaimantBuilder::new()
            .numbered(n)
            .with_risk_score(score)
            .account_age_days(age)
            .with_verification(status)
            .build()
    })
}

/// Strategy for a claim with the given number, filed within a day of the reference time
pub fn claim_strategy(n: u32) -> impl Strategy<Value = Claim> {
    (weekly_amount_strategy(), ip_strategy(), 0i64..86_400).prop_map(move |(weekly, ip, offset_secs)| {
        let mut builder = ClaimBuilder::new()
            .numbered(n)
            .with_weekly_amount(weekly)
            .filed_at(TemporalFixtures::reference_time() - chrono::Duration::seconds(offset_secs));
        if let Some(ip) = ip {
            builder = builder.from_ip(ip);
        }
        builder.build()
    })
}

/// Strategy for a batch of up to `max` claims, each with its own claimant
pub fn batch_strategy(max: u32) -> impl Strategy<Value = (Vec<Claim>, Vec<ClaimantProfile>)> {
    (1..=max.max(1)).prop_flat_map(|size| {
        let pairs: Vec<_> = (0..size).map(|n| (claim_strategy(n), claimant_strategy(n))).collect();
        pairs.prop_map(|pairs| pairs.into_iter().unzip())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_claims_are_valid(claim in claim_strategy(7)) {
            prop_assert!(claim.validate().is_ok());
            prop_assert!(!claim.has_balance_mismatch());
        }

        #[test]
        fn batches_pair_claims_with_claimants((claims, claimants) in batch_strategy(6)) {
            prop_assert_eq!(claims.len(), claimants.len());
            for (claim, claimant) in claims.iter().zip(&claimants) {
                prop_assert_eq!(&claim.claimant_id, &claimant.claimant_id);
            }
        }
    }
}
