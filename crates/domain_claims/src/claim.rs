//! Benefit claim record

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, ClaimantId, EmployerId};
use crate::error::ClaimDataError;

/// Weeks of benefit in a standard benefit year
pub const BENEFIT_WEEKS: u32 = 26;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Active,
    Inactive,
    Pending,
    Denied,
    Exhausted,
}

/// Benefit program the claim is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgramType {
    /// Regular state unemployment insurance
    RegularUi,
    /// Extended benefits
    ExtendedBenefits,
    /// Pandemic unemployment assistance
    Pua,
    /// Pandemic emergency unemployment compensation
    Peuc,
    Other,
}

/// An unemployment-insurance benefit claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: ClaimId,
    pub claimant_id: ClaimantId,
    /// Case number assigned by the benefits system, if any
    pub case_number: Option<String>,
    pub program_type: ProgramType,
    pub weekly_benefit_amount: Decimal,
    pub maximum_benefit_amount: Decimal,
    pub total_amount_paid: Decimal,
    pub remaining_balance: Decimal,
    pub status: ClaimStatus,
    pub effective_date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    /// Employer of record for the separation
    pub employer_id: Option<EmployerId>,
    /// Address the claim was filed from
    pub ip_address: Option<String>,
}

impl Claim {
    /// Creates a new active claim with nothing paid yet
    pub fn new(
        claim_id: ClaimId,
        claimant_id: ClaimantId,
        weekly_benefit_amount: Decimal,
        maximum_benefit_amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            claim_id,
            claimant_id,
            case_number: None,
            program_type: ProgramType::RegularUi,
            weekly_benefit_amount,
            maximum_benefit_amount,
            total_amount_paid: Decimal::ZERO,
            remaining_balance: maximum_benefit_amount,
            status: ClaimStatus::Active,
            effective_date: now.date_naive(),
            expiration_date: None,
            created_date: now,
            modified_date: now,
            employer_id: None,
            ip_address: None,
        }
    }

    /// Checks that every benefit amount is non-negative and that a full
    /// benefit year of the weekly amount is representable
    pub fn validate(&self) -> Result<(), ClaimDataError> {
        let amounts = [
            ("weekly_benefit_amount", self.weekly_benefit_amount),
            ("maximum_benefit_amount", self.maximum_benefit_amount),
            ("total_amount_paid", self.total_amount_paid),
            ("remaining_balance", self.remaining_balance),
        ];
        for (field, amount) in amounts {
            if amount < Decimal::ZERO {
                return Err(ClaimDataError::NegativeAmount {
                    field: field.to_string(),
                });
            }
        }
        if self.benefit_year_total().is_none() {
            return Err(ClaimDataError::AmountOutOfRange {
                field: "weekly_benefit_amount".to_string(),
            });
        }
        Ok(())
    }

    /// Weekly amount over a standard benefit year, `None` on overflow
    pub fn benefit_year_total(&self) -> Option<Decimal> {
        self.weekly_benefit_amount.checked_mul(Decimal::from(BENEFIT_WEEKS))
    }

    /// Balance implied by the maximum benefit and the amount already paid
    pub fn expected_remaining_balance(&self) -> Decimal {
        self.maximum_benefit_amount - self.total_amount_paid
    }

    /// True when the recorded balance disagrees with maximum minus paid
    ///
    /// Not enforced on construction; exposed as a fact for rules.
    pub fn has_balance_mismatch(&self) -> bool {
        self.remaining_balance != self.expected_remaining_balance()
    }

    /// Records a benefit payment against the claim
    pub fn record_payment(&mut self, amount: Decimal) {
        self.total_amount_paid += amount;
        self.remaining_balance = self.expected_remaining_balance().max(Decimal::ZERO);
        if self.remaining_balance.is_zero() {
            self.status = ClaimStatus::Exhausted;
        }
        self.modified_date = Utc::now();
    }

    /// Whether the claim counts towards active-claim lookups
    pub fn is_active(&self) -> bool {
        matches!(self.status, ClaimStatus::Active | ClaimStatus::Pending)
    }
}
