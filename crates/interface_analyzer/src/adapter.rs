//! Legacy claim record adapter
//!
//! Older intake systems hand over a flat record that mixes claim, claimant and
//! employer fields. [`LegacyAdapter::adapt`] splits it into the domain records
//! and keeps the scalar fields the rules reason about (reported wage, claim
//! amount, employment status) as context facts.
//!
//! Missing numbers become zero and missing identifiers become placeholders, so
//! adaptation itself never fails. Records that are still unusable, such as a
//! negative claim amount or one too large for a benefit year, are rejected
//! later by claim validation.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use core_kernel::{ClaimId, ClaimantId, EmployerId};
use domain_claims::{
    Address, AssessmentContext, Claim, ClaimantProfile, EmployerRecord, VerificationStatus,
    BENEFIT_WEEKS,
};
use tracing::warn;

/// Flat claim record as exported by legacy intake
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyClaimRecord {
    #[serde(alias = "claimId")]
    pub claim_id: Option<String>,
    #[serde(alias = "claimantId")]
    pub claimant_id: Option<String>,
    #[serde(alias = "name", alias = "claimantName")]
    pub claimant_name: Option<String>,
    #[serde(alias = "dateOfBirth", alias = "dob")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(alias = "ssn", alias = "ssnRef")]
    pub ssn_ref: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "employerId")]
    pub employer_id: Option<String>,
    #[serde(alias = "employerName")]
    pub employer_name: Option<String>,
    #[serde(alias = "industryCode")]
    pub industry_code: Option<String>,
    #[serde(alias = "employmentStatus")]
    pub employment_status: Option<String>,
    #[serde(alias = "wageReported")]
    pub wage_reported: Option<f64>,
    #[serde(alias = "claimAmount")]
    pub claim_amount: Option<f64>,
    #[serde(alias = "claimDate")]
    pub claim_date: Option<NaiveDate>,
    /// Exact submission time, when intake recorded one
    #[serde(alias = "submittedAt")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub justification: Option<String>,
    #[serde(alias = "ipAddress")]
    pub ip_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    #[serde(alias = "riskScore")]
    pub risk_score: Option<u8>,
    #[serde(alias = "identityVerification")]
    pub identity_verification: Option<VerificationStatus>,
    #[serde(alias = "accountCreated")]
    pub account_created: Option<DateTime<Utc>>,
}

/// Domain records produced from one legacy record
#[derive(Debug, Clone)]
pub struct AdaptedClaim {
    pub claim: Claim,
    pub claimant: ClaimantProfile,
    pub employer: Option<EmployerRecord>,
    pub context: AssessmentContext,
}

/// Maps legacy records into domain records
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyAdapter;

impl LegacyAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn adapt(&self, record: &LegacyClaimRecord) -> AdaptedClaim {
        let claim_id = non_empty(&record.claim_id).map_or_else(ClaimId::placeholder, ClaimId::new);
        let claimant_id =
            non_empty(&record.claimant_id).map_or_else(ClaimantId::placeholder, ClaimantId::new);

        let claim_amount = record.claim_amount.unwrap_or(0.0);
        let wage_reported = record.wage_reported.unwrap_or(0.0);
        let weekly = money(claim_amount);

        let claimant = self.claimant(record, claimant_id.clone());
        let employer = non_empty(&record.employer_name).map(|name| {
            let employer_id =
                non_empty(&record.employer_id).map_or_else(EmployerId::placeholder, EmployerId::new);
            let mut employer = EmployerRecord::new(employer_id, name);
            employer.industry_code = non_empty(&record.industry_code).map(str::to_string);
            employer
        });

        // An unrepresentable maximum is left for claim validation to reject
        let maximum = weekly.checked_mul(Decimal::from(BENEFIT_WEEKS)).unwrap_or_else(|| {
            warn!(claim_id = %claim_id, claim_amount, "Maximum benefit overflows");
            Decimal::MAX
        });
        let mut claim = Claim::new(claim_id, claimant_id, weekly, maximum);
        if let Some(date) = record.claim_date {
            claim.effective_date = date;
        }
        claim.created_date = submission_time(record).unwrap_or(claim.created_date);
        claim.modified_date = claim.created_date;
        claim.ip_address = non_empty(&record.ip_address).map(str::to_string);
        claim.employer_id = employer.as_ref().map(|e| e.employer_id.clone());

        let mut context = AssessmentContext::new()
            .with_fact("claim_amount", json!(claim_amount))
            .with_fact("wage_reported", json!(wage_reported))
            .with_fact(
                "employment_status",
                json!(record.employment_status.clone().unwrap_or_default()),
            );
        if let Some(name) = non_empty(&record.employer_name) {
            context = context.with_fact("employer_name", json!(name));
        }
        if let Some(text) = non_empty(&record.justification) {
            context = context.with_justification(text);
        }

        AdaptedClaim {
            claim,
            claimant,
            employer,
            context,
        }
    }

    fn claimant(&self, record: &LegacyClaimRecord, claimant_id: ClaimantId) -> ClaimantProfile {
        let (first, last) = split_name(record.claimant_name.as_deref().unwrap_or_default());
        let mut claimant = ClaimantProfile::new(
            claimant_id,
            first,
            last,
            record.ssn_ref.clone().unwrap_or_default(),
        );
        claimant.date_of_birth = record.date_of_birth;
        claimant.email = record.email.clone().unwrap_or_default();
        claimant.phone = record.phone.clone().unwrap_or_default();

        let address = Address::new(
            record.street.clone().unwrap_or_default(),
            record.city.clone().unwrap_or_default(),
            record.state.clone().unwrap_or_default(),
            record.zip.clone().unwrap_or_default(),
        );
        claimant.mailing_address = address.clone();
        claimant.residential_address = address;

        claimant.risk_score = record.risk_score.unwrap_or(0).min(100);
        if let Some(status) = record.identity_verification {
            claimant.identity_verification = status;
        }
        if let Some(created) = record.account_created {
            claimant.account_created = created;
        }
        claimant
    }
}

/// Exact submission time, else midday of the claim date
fn submission_time(record: &LegacyClaimRecord) -> Option<DateTime<Utc>> {
    record.submitted_at.or_else(|| {
        let noon = NaiveTime::from_hms_opt(12, 0, 0)?;
        record.claim_date.map(|date| date.and_time(noon).and_utc())
    })
}

fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

fn money(amount: f64) -> Decimal {
    Decimal::from_f64(amount).unwrap_or(Decimal::ZERO).round_dp(2)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
