//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the claims
//! integrity system. These fixtures are designed to be consistent and
//! predictable for unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{ClaimId, ClaimantId, EmployerId};
use domain_claims::{AssessmentContext, DerivedFacts, ReferenceCase, SessionMetrics};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a numbered claim identifier
    pub fn claim_id(n: u32) -> ClaimId {
        ClaimId::new(format!("CLM-TEST-{n:04}"))
    }

    /// Creates a numbered claimant identifier
    pub fn claimant_id(n: u32) -> ClaimantId {
        ClaimantId::new(format!("CLT-TEST-{n:04}"))
    }

    /// Creates a numbered employer identifier
    pub fn employer_id(n: u32) -> EmployerId {
        EmployerId::new(format!("EMP-TEST-{n:04}"))
    }

    /// SSN reference matching a numbered claimant
    pub fn ssn_ref(n: u32) -> String {
        format!("ssn-ref-{n:04}")
    }
}

/// Fixture for benefit amounts
pub struct AmountFixtures;

impl AmountFixtures {
    /// A typical weekly benefit amount
    pub fn weekly_benefit() -> Decimal {
        dec!(450.00)
    }

    /// Twenty-six weeks of the typical weekly benefit
    pub fn maximum_benefit() -> Decimal {
        dec!(11700.00)
    }

    /// A weekly benefit well above the new-account threshold
    pub fn high_weekly_benefit() -> Decimal {
        dec!(850.00)
    }

    /// Weekly wage reported on a typical claim
    pub fn reported_wage() -> f64 {
        600.0
    }
}

/// Fixture for time-related test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Reference "now" used by deterministic tests, a Monday afternoon
    pub fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap()
    }

    /// A filing time inside business hours
    pub fn business_hours() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 10, 30, 0).unwrap()
    }

    /// A filing time in the middle of the night
    pub fn off_hours() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 3, 15, 0).unwrap()
    }

    /// An account opening date this many days before the reference time
    pub fn days_before_reference(days: i64) -> DateTime<Utc> {
        Self::reference_time() - chrono::Duration::days(days)
    }

    pub fn date_of_birth() -> NaiveDate {
        NaiveDate::from_ymd_opt(1988, 7, 14).unwrap()
    }
}

/// Fixture for string data
pub struct StringFixtures;

impl StringFixtures {
    pub fn first_name() -> &'static str {
        "Jordan"
    }

    pub fn last_name() -> &'static str {
        "Okafor"
    }

    pub fn email() -> &'static str {
        "jordan.okafor@example.com"
    }

    /// An address at a disposable mail provider
    pub fn disposable_email() -> &'static str {
        "quickclaim@tempmail.net"
    }

    pub fn phone() -> &'static str {
        "555-0142"
    }

    /// An IP address from the documentation range
    pub fn shared_ip() -> &'static str {
        "203.0.113.5"
    }

    pub fn employer_name() -> &'static str {
        "Riverside Freight LLC"
    }

    pub fn industry_code() -> &'static str {
        "4841"
    }
}

/// Fixture for assessment contexts
pub struct ContextFixtures;

impl ContextFixtures {
    /// A context pinned to the reference time with no derived signals
    pub fn clean() -> AssessmentContext {
        AssessmentContext {
            as_of: Some(TemporalFixtures::reference_time()),
            ..AssessmentContext::new()
        }
    }

    /// Clean context with the given derived facts
    pub fn with_derived(derived: DerivedFacts) -> AssessmentContext {
        Self::clean().with_derived(derived)
    }

    /// Clean context carrying the legacy wage and claim amount facts
    pub fn with_wage(wage_reported: f64, claim_amount: f64) -> AssessmentContext {
        Self::clean()
            .with_fact("wage_reported", json!(wage_reported))
            .with_fact("claim_amount", json!(claim_amount))
    }

    /// Clean context with confirmed-fraud and false-positive reference cases
    pub fn with_reference_cases(fraud: Vec<ReferenceCase>, false_positives: Vec<ReferenceCase>) -> AssessmentContext {
        let mut context = Self::clean();
        context.confirmed_fraud_cases = fraud;
        context.false_positive_cases = false_positives;
        context
    }
}

/// Fixture for filing-session metrics
pub struct SessionFixtures;

impl SessionFixtures {
    /// A human-paced session from a known device
    pub fn typical(device: &str) -> SessionMetrics {
        SessionMetrics {
            typing_speed: 180.0,
            session_duration_secs: 900.0,
            device_fingerprint: device.to_string(),
            location_consistency: 0.9,
        }
    }

    /// A scripted session: very fast typing, very short, inconsistent location
    pub fn scripted(device: &str) -> SessionMetrics {
        SessionMetrics {
            typing_speed: 900.0,
            session_duration_secs: 45.0,
            device_fingerprint: device.to_string(),
            location_consistency: 0.1,
        }
    }
}
