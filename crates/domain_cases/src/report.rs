//! Case reporting

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::alert::SystemAlert;
use crate::case::{CasePriority, CaseStatus, CaseType, FraudCase};

/// Aggregate view over the case set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaseReport {
    pub total_cases: usize,
    pub by_status: BTreeMap<CaseStatus, usize>,
    pub by_type: BTreeMap<CaseType, usize>,
    pub by_priority: BTreeMap<CasePriority, usize>,
    pub total_potential_loss: Decimal,
    pub total_actual_loss: Decimal,
    pub total_recovered: Decimal,
    pub open_alerts: usize,
    /// Mean of `days_open` across all cases
    pub average_days_open: f64,
}

impl CaseReport {
    pub fn build<'a>(
        cases: impl IntoIterator<Item = &'a FraudCase>,
        alerts: &[SystemAlert],
        now: DateTime<Utc>,
    ) -> Self {
        let mut report = CaseReport::default();
        let mut days_open = 0i64;
        for case in cases {
            report.total_cases += 1;
            *report.by_status.entry(case.status).or_default() += 1;
            *report.by_type.entry(case.case_type).or_default() += 1;
            *report.by_priority.entry(case.priority).or_default() += 1;
            report.total_potential_loss += case.potential_loss;
            report.total_actual_loss += case.actual_loss;
            report.total_recovered += case.recovered_amount;
            days_open += case.days_open(now);
        }
        if report.total_cases > 0 {
            report.average_days_open = days_open as f64 / report.total_cases as f64;
        }
        report.open_alerts = alerts.iter().filter(|a| a.is_open()).count();
        report
    }
}
