//! Default rule catalog
//!
//! Seeded into every new [`RuleEngine`](crate::RuleEngine) unless it is built
//! with [`RuleEngine::empty`](crate::RuleEngine::empty).

use chrono::NaiveDate;
use serde_json::json;

use core_kernel::{ConditionOperator, Severity};

use crate::rule::{ActionType, BusinessRule, RuleAction, RuleType};

pub const DUPLICATE_SSN: &str = "RULE-SSN-001";
pub const DECEASED_CLAIMANT: &str = "RULE-IDN-002";
pub const WAGE_ABOVE_INDUSTRY: &str = "RULE-WAG-003";
pub const HIGH_RISK_EMPLOYER: &str = "RULE-EMP-004";
pub const CLAIM_VELOCITY: &str = "RULE-VEL-005";
pub const BALANCE_MISMATCH: &str = "RULE-BAL-006";
pub const FAILED_IDENTITY: &str = "RULE-IDN-007";
pub const CLAIM_EXCEEDS_WAGE: &str = "RULE-WAG-008";
pub const SUSPICIOUS_EMAIL: &str = "RULE-CON-009";

/// Date the built-in catalog has been in effect since
pub fn catalog_effective_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// The rules every engine starts with, in evaluation order
pub fn default_rules() -> Vec<BusinessRule> {
    let since = catalog_effective_date();
    [
        BusinessRule::new(DUPLICATE_SSN, "Duplicate SSN Check", RuleType::Scoring, "IDENTITY", Severity::Error)
            .with_description("SSN is in use on more than one active claim")
            .when("ssn_usage_count", ConditionOperator::GreaterThan, json!(1))
            .then(RuleAction::add_score(75.0))
            .then(RuleAction::set_flag("DUPLICATE_SSN")),
        BusinessRule::new(DECEASED_CLAIMANT, "Deceased Claimant", RuleType::Blocking, "IDENTITY", Severity::Critical)
            .with_description("Claimant matches an entry in the death registry")
            .when("death_registry_match", ConditionOperator::Equals, json!(true))
            .then(RuleAction::add_score(200.0))
            .then(RuleAction::new(ActionType::BlockClaim))
            .then(RuleAction::new(ActionType::CreateCase))
            .then(RuleAction::new(ActionType::SendAlert)),
        BusinessRule::new(WAGE_ABOVE_INDUSTRY, "Wage Above Industry Norm", RuleType::Scoring, "WAGE", Severity::Warning)
            .with_description("Reported wage is far above the industry average")
            .when("wage_to_industry_ratio", ConditionOperator::GreaterThan, json!(2.5))
            .then(RuleAction::add_score(40.0)),
        BusinessRule::new(HIGH_RISK_EMPLOYER, "High-Risk Employer", RuleType::Scoring, "EMPLOYER", Severity::Warning)
            .with_description("Employer of record is rated high risk")
            .when("employer_risk_level", ConditionOperator::InList, json!(["HIGH", "CRITICAL"]))
            .then(RuleAction::add_score(35.0))
            .then(RuleAction::set_flag("HIGH_RISK_EMPLOYER")),
        BusinessRule::new(CLAIM_VELOCITY, "Claim Velocity", RuleType::Flagging, "BEHAVIOR", Severity::Error)
            .with_description("More than three claims filed in the last 30 days")
            .when("claims_last_30_days", ConditionOperator::GreaterThan, json!(3))
            .then(RuleAction::add_score(50.0))
            .then(
                RuleAction::new(ActionType::RequireVerification)
                    .with_parameter("message", json!("Confirm recent filing history with claimant")),
            ),
        BusinessRule::new(BALANCE_MISMATCH, "Balance Mismatch", RuleType::Validation, "CLAIM", Severity::Info)
            .with_description("Remaining balance differs from maximum benefit minus paid")
            .when("balance_mismatch", ConditionOperator::Equals, json!(true))
            .then(RuleAction::add_score(20.0))
            .then(RuleAction::set_flag("BALANCE_MISMATCH")),
        BusinessRule::new(FAILED_IDENTITY, "Failed Identity Verification", RuleType::Flagging, "IDENTITY", Severity::Warning)
            .with_description("Identity verification failed for the claimant")
            .when("identity_verification_status", ConditionOperator::Equals, json!("FAILED"))
            .then(RuleAction::add_score(30.0))
            .then(
                RuleAction::new(ActionType::RequireVerification)
                    .with_parameter("message", json!("Re-run identity verification")),
            ),
        BusinessRule::new(CLAIM_EXCEEDS_WAGE, "Claim Amount Exceeds Expected Wage", RuleType::Scoring, "WAGE", Severity::Warning)
            .with_description("Claimed amount is more than three times the reported wage")
            .when("claim_to_wage_ratio", ConditionOperator::GreaterThan, json!(3))
            .then(RuleAction::add_score(30.0)),
        BusinessRule::new(SUSPICIOUS_EMAIL, "Suspicious Email Domain", RuleType::Flagging, "CONTACT", Severity::Warning)
            .with_description("Contact email uses a disposable mail provider")
            .when("email", ConditionOperator::Contains, json!("tempmail"))
            .then(RuleAction::add_score(40.0))
            .then(RuleAction::set_flag("DISPOSABLE_EMAIL")),
    ]
    .into_iter()
    .map(|rule| rule.effective_from(since))
    .collect()
}
