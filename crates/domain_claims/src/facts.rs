//! Fact extraction
//!
//! Flattens the entity records and the assessment context into the `FactMap`
//! that rule and pattern conditions are evaluated against. Free-form context
//! data is inserted first so that entity and derived facts win on a key clash.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use core_kernel::FactMap;
use crate::{AssessmentContext, Claim, ClaimantProfile, EmployerRecord};

/// Builds the fact map for one claim
pub fn entity_facts(
    claim: &Claim,
    claimant: &ClaimantProfile,
    employer: Option<&EmployerRecord>,
    context: &AssessmentContext,
) -> FactMap {
    let mut facts = context.data.clone();

    facts.insert("claim_id".into(), json!(claim.claim_id.as_str()));
    facts.insert("program_type".into(), to_value(&claim.program_type));
    facts.insert("weekly_benefit_amount".into(), decimal(claim.weekly_benefit_amount));
    facts.insert("maximum_benefit_amount".into(), decimal(claim.maximum_benefit_amount));
    facts.insert("total_amount_paid".into(), decimal(claim.total_amount_paid));
    facts.insert("remaining_balance".into(), decimal(claim.remaining_balance));
    facts.insert("claim_status".into(), to_value(&claim.status));
    facts.insert("balance_mismatch".into(), json!(claim.has_balance_mismatch()));

    facts.insert("claimant_risk_score".into(), json!(claimant.risk_score));
    facts.insert("risk_flags".into(), json!(claimant.risk_flags));
    facts.insert(
        "identity_verification_status".into(),
        to_value(&claimant.identity_verification),
    );
    facts.insert("account_status".into(), to_value(&claimant.account_status));
    facts.insert("email".into(), json!(claimant.email));
    facts.insert("phone".into(), json!(claimant.phone));
    facts.insert(
        "account_age_days".into(),
        json!(claimant.account_age_days(context.now())),
    );

    if let Some(employer) = employer {
        facts.insert("employer_risk_level".into(), to_value(&employer.risk_level));
        facts.insert("employer_status".into(), to_value(&employer.status));
        facts.insert(
            "employer_flag_count".into(),
            json!(employer.suspicious_activity_flags.len()),
        );
    }

    let derived = &context.derived;
    facts.insert("ssn_usage_count".into(), json!(derived.ssn_usage_count));
    if let Some(ratio) = derived.wage_to_industry_ratio {
        facts.insert("wage_to_industry_ratio".into(), json!(ratio));
    }
    facts.insert("claims_last_30_days".into(), json!(derived.claims_last_30_days));
    facts.insert("death_registry_match".into(), json!(derived.death_registry_match));

    if let Some(ratio) = claim_to_wage_ratio(context) {
        facts.insert("claim_to_wage_ratio".into(), json!(ratio));
    }

    facts
}

/// `claim_amount / wage_reported`, when both are present and the wage is positive
fn claim_to_wage_ratio(context: &AssessmentContext) -> Option<f64> {
    let claimed = context.number("claim_amount")?;
    let wage = context.number("wage_reported")?;
    (wage > 0.0).then(|| claimed / wage)
}

fn decimal(amount: Decimal) -> Value {
    amount.to_f64().map(Value::from).unwrap_or(Value::Null)
}

fn to_value<T: serde::Serialize>(v: &T) -> Value {
    serde_json::to_value(v).unwrap_or(Value::Null)
}
