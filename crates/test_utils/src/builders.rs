//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::{DateTime, Utc};
use core_kernel::{ClaimId, ClaimantId, EmployerId, RiskLevel};
use domain_claims::{
    Address, Claim, ClaimantProfile, EmployerRecord, EmployerStatus, VerificationStatus,
};
use rust_decimal::Decimal;

use crate::fixtures::{AmountFixtures, IdFixtures, StringFixtures, TemporalFixtures};

/// Builder for constructing test claims
pub struct ClaimBuilder {
    claim_id: ClaimId,
    claimant_id: ClaimantId,
    weekly_benefit_amount: Decimal,
    maximum_benefit_amount: Decimal,
    amount_paid: Decimal,
    employer_id: Option<EmployerId>,
    ip_address: Option<String>,
    filed_at: DateTime<Utc>,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            claim_id: IdFixtures::claim_id(1),
            claimant_id: IdFixtures::claimant_id(1),
            weekly_benefit_amount: AmountFixtures::weekly_benefit(),
            maximum_benefit_amount: AmountFixtures::maximum_benefit(),
            amount_paid: Decimal::ZERO,
            employer_id: None,
            ip_address: None,
            filed_at: TemporalFixtures::business_hours(),
        }
    }

    /// Sets claim and claimant ids from one number
    pub fn numbered(mut self, n: u32) -> Self {
        self.claim_id = IdFixtures::claim_id(n);
        self.claimant_id = IdFixtures::claimant_id(n);
        self
    }

    pub fn with_claim_id(mut self, id: ClaimId) -> Self {
        self.claim_id = id;
        self
    }

    pub fn for_claimant(mut self, id: ClaimantId) -> Self {
        self.claimant_id = id;
        self
    }

    /// Sets the weekly benefit; the maximum follows at 26 weeks
    pub fn with_weekly_amount(mut self, amount: Decimal) -> Self {
        self.weekly_benefit_amount = amount;
        self.maximum_benefit_amount = amount * Decimal::from(26);
        self
    }

    /// Records payments against the claim
    pub fn with_amount_paid(mut self, amount: Decimal) -> Self {
        self.amount_paid = amount;
        self
    }

    pub fn from_employer(mut self, id: EmployerId) -> Self {
        self.employer_id = Some(id);
        self
    }

    pub fn from_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn filed_at(mut self, at: DateTime<Utc>) -> Self {
        self.filed_at = at;
        self
    }

    /// Builds the claim
    pub fn build(self) -> Claim {
        let mut claim = Claim::new(
            self.claim_id,
            self.claimant_id,
            self.weekly_benefit_amount,
            self.maximum_benefit_amount,
        );
        if !self.amount_paid.is_zero() {
            claim.record_payment(self.amount_paid);
        }
        claim.employer_id = self.employer_id;
        claim.ip_address = self.ip_address;
        claim.effective_date = self.filed_at.date_naive();
        claim.created_date = self.filed_at;
        claim.modified_date = self.filed_at;
        claim
    }
}

/// Builder for constructing test claimant profiles
pub struct ClaimantBuilder {
    claimant_id: ClaimantId,
    first_name: String,
    last_name: String,
    ssn_ref: String,
    email: String,
    phone: String,
    address: Address,
    risk_score: u8,
    verification: VerificationStatus,
    account_created: DateTime<Utc>,
}

impl Default for ClaimantBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimantBuilder {
    /// Creates a new builder for a verified, long-standing claimant
    pub fn new() -> Self {
        Self {
            claimant_id: IdFixtures::claimant_id(1),
            first_name: StringFixtures::first_name().to_string(),
            last_name: StringFixtures::last_name().to_string(),
            ssn_ref: IdFixtures::ssn_ref(1),
            email: StringFixtures::email().to_string(),
            phone: StringFixtures::phone().to_string(),
            address: Address::new("12 Harbor Way", "Springfield", "IL", "62701"),
            risk_score: 10,
            verification: VerificationStatus::Verified,
            account_created: TemporalFixtures::days_before_reference(720),
        }
    }

    /// Sets claimant id and SSN reference from one number
    pub fn numbered(mut self, n: u32) -> Self {
        self.claimant_id = IdFixtures::claimant_id(n);
        self.ssn_ref = IdFixtures::ssn_ref(n);
        self
    }

    pub fn with_id(mut self, id: ClaimantId) -> Self {
        self.claimant_id = id;
        self
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    pub fn with_ssn_ref(mut self, ssn_ref: impl Into<String>) -> Self {
        self.ssn_ref = ssn_ref.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// Sets the baseline risk score, clamped to 100
    pub fn with_risk_score(mut self, score: u8) -> Self {
        self.risk_score = score.min(100);
        self
    }

    pub fn with_verification(mut self, status: VerificationStatus) -> Self {
        self.verification = status;
        self
    }

    /// Account opened this many days before the reference time
    pub fn account_age_days(mut self, days: i64) -> Self {
        self.account_created = TemporalFixtures::days_before_reference(days);
        self
    }

    /// Builds the profile
    pub fn build(self) -> ClaimantProfile {
        let mut claimant = ClaimantProfile::new(self.claimant_id, self.first_name, self.last_name, self.ssn_ref);
        claimant.date_of_birth = Some(TemporalFixtures::date_of_birth());
        claimant.email = self.email;
        claimant.phone = self.phone;
        claimant.mailing_address = self.address.clone();
        claimant.residential_address = self.address;
        claimant.risk_score = self.risk_score;
        claimant.identity_verification = self.verification;
        claimant.account_created = self.account_created;
        claimant
    }
}

/// Builder for constructing test employer records
pub struct EmployerBuilder {
    employer_id: EmployerId,
    legal_name: String,
    industry_code: Option<String>,
    risk_level: RiskLevel,
    status: EmployerStatus,
    flags: Vec<String>,
}

impl Default for EmployerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployerBuilder {
    /// Creates a new builder for an active, low-risk employer
    pub fn new() -> Self {
        Self {
            employer_id: IdFixtures::employer_id(1),
            legal_name: StringFixtures::employer_name().to_string(),
            industry_code: Some(StringFixtures::industry_code().to_string()),
            risk_level: RiskLevel::Low,
            status: EmployerStatus::Active,
            flags: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: EmployerId) -> Self {
        self.employer_id = id;
        self
    }

    pub fn with_industry_code(mut self, code: Option<&str>) -> Self {
        self.industry_code = code.map(str::to_string);
        self
    }

    pub fn with_risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_level = level;
        self
    }

    pub fn with_status(mut self, status: EmployerStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    /// Builds the employer record
    pub fn build(self) -> EmployerRecord {
        let mut employer = EmployerRecord::new(self.employer_id, self.legal_name);
        employer.industry_code = self.industry_code;
        employer.risk_level = self.risk_level;
        employer.status = self.status;
        employer.suspicious_activity_flags = self.flags;
        employer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_claim_builder_defaults() {
        let claim = ClaimBuilder::new().build();
        assert_eq!(claim.weekly_benefit_amount, dec!(450.00));
        assert!(!claim.has_balance_mismatch());
        assert!(claim.validate().is_ok());
    }

    #[test]
    fn test_claim_builder_payment_keeps_balance_consistent() {
        let claim = ClaimBuilder::new().with_amount_paid(dec!(900)).build();
        assert_eq!(claim.remaining_balance, dec!(10800.00));
        assert!(!claim.has_balance_mismatch());
    }

    #[test]
    fn test_claimant_builder_account_age() {
        let claimant = ClaimantBuilder::new().account_age_days(10).build();
        assert_eq!(claimant.account_age_days(TemporalFixtures::reference_time()), 10);
    }
}
