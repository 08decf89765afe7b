//! Claimant profile

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::ClaimantId;
use crate::error::ClaimDataError;

/// Outcome of identity verification for a claimant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Verified,
    Pending,
    Failed,
    Unverified,
}

/// Status of the claimant's online account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Suspended,
    Locked,
    Closed,
}

/// A postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
        }
    }

    /// Normalized (street, city, zip) tuple used to group claimants by address
    ///
    /// Returns `None` for an address with no street.
    pub fn normalized_key(&self) -> Option<(String, String, String)> {
        let normalize = |s: &str| {
            s.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase()
                .replace(['.', ','], "")
        };
        let street = normalize(&self.street);
        if street.is_empty() {
            return None;
        }
        let zip: String = self.zip.trim().chars().take(5).collect();
        Some((street, normalize(&self.city), zip))
    }
}

/// Profile of the individual filing a claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimantProfile {
    pub claimant_id: ClaimantId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Reference to the SSN record, never the raw number
    pub ssn_ref: String,
    pub email: String,
    pub phone: String,
    pub mailing_address: Address,
    pub residential_address: Address,
    /// Baseline risk score, 0..=100
    pub risk_score: u8,
    pub risk_flags: BTreeSet<String>,
    pub identity_verification: VerificationStatus,
    pub account_status: AccountStatus,
    pub account_created: DateTime<Utc>,
}

impl ClaimantProfile {
    /// Creates a profile with an unverified identity and an account opened now
    pub fn new(
        claimant_id: ClaimantId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        ssn_ref: impl Into<String>,
    ) -> Self {
        Self {
            claimant_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth: None,
            ssn_ref: ssn_ref.into(),
            email: String::new(),
            phone: String::new(),
            mailing_address: Address::default(),
            residential_address: Address::default(),
            risk_score: 0,
            risk_flags: BTreeSet::new(),
            identity_verification: VerificationStatus::Unverified,
            account_status: AccountStatus::Active,
            account_created: Utc::now(),
        }
    }

    /// Sets the baseline risk score, rejecting values above 100
    pub fn set_risk_score(&mut self, score: u32) -> Result<(), ClaimDataError> {
        let score = u8::try_from(score)
            .ok()
            .filter(|s| *s <= 100)
            .ok_or(ClaimDataError::RiskScoreOutOfRange(score))?;
        self.risk_score = score;
        Ok(())
    }

    /// Adds a risk flag; returns false if it was already present
    pub fn add_flag(&mut self, flag: impl Into<String>) -> bool {
        self.risk_flags.insert(flag.into())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Whole days since the claimant's account was created
    pub fn account_age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.account_created).num_days()
    }
}
