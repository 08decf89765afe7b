//! Employer of record

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{EmployerId, RiskLevel};
use crate::claimant::Address;

/// Registration status of an employer account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployerStatus {
    Active,
    Inactive,
    Suspended,
    Closed,
}

/// Quarterly wage report filed by an employer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WageReport {
    /// Reporting quarter, e.g. `2024Q2`
    pub quarter: String,
    pub total_wages: Decimal,
    pub employee_count: u32,
}

/// An employer record with aggregated wage reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerRecord {
    pub employer_id: EmployerId,
    pub legal_name: String,
    pub fein: Option<String>,
    pub address: Address,
    pub status: EmployerStatus,
    pub risk_level: RiskLevel,
    pub industry_code: Option<String>,
    pub wage_reports: Vec<WageReport>,
    pub suspicious_activity_flags: Vec<String>,
}

impl EmployerRecord {
    pub fn new(employer_id: EmployerId, legal_name: impl Into<String>) -> Self {
        Self {
            employer_id,
            legal_name: legal_name.into(),
            fein: None,
            address: Address::default(),
            status: EmployerStatus::Active,
            risk_level: RiskLevel::Low,
            industry_code: None,
            wage_reports: Vec::new(),
            suspicious_activity_flags: Vec::new(),
        }
    }

    /// Sum of wages across all reports
    pub fn total_reported_wages(&self) -> Decimal {
        self.wage_reports.iter().map(|r| r.total_wages).sum()
    }

    /// Average wage per reported employee, `None` without headcount
    pub fn average_wage_per_employee(&self) -> Option<Decimal> {
        let headcount: u32 = self.wage_reports.iter().map(|r| r.employee_count).sum();
        if headcount == 0 {
            return None;
        }
        Some(self.total_reported_wages() / Decimal::from(headcount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_wage_aggregates() {
        let mut employer = EmployerRecord::new(EmployerId::new("EMP-1"), "Acme Staffing LLC");
        assert_eq!(employer.average_wage_per_employee(), None);

        employer.wage_reports.push(WageReport {
            quarter: "2024Q1".to_string(),
            total_wages: dec!(120000),
            employee_count: 10,
        });
        employer.wage_reports.push(WageReport {
            quarter: "2024Q2".to_string(),
            total_wages: dec!(60000),
            employee_count: 5,
        });

        assert_eq!(employer.total_reported_wages(), dec!(180000));
        assert_eq!(employer.average_wage_per_employee(), Some(dec!(12000)));
    }
}
