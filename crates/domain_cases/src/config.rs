//! Case management configuration

use serde::{Deserialize, Serialize};

use core_kernel::RiskLevel;

/// Investigators eligible per risk level
///
/// The critical and high pools are senior investigators and must not overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestigatorPools {
    pub critical: Vec<String>,
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

impl InvestigatorPools {
    pub fn for_level(&self, level: RiskLevel) -> &[String] {
        match level {
            RiskLevel::Critical => &self.critical,
            RiskLevel::High => &self.high,
            RiskLevel::Medium => &self.medium,
            RiskLevel::Low => &self.low,
        }
    }

    /// True when no investigator sits in both senior pools
    pub fn senior_pools_disjoint(&self) -> bool {
        self.critical.iter().all(|name| !self.high.contains(name))
    }
}

impl Default for InvestigatorPools {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            critical: names(&["SR-INV-ADAMS", "SR-INV-BAKER"]),
            high: names(&["SR-INV-CLARK", "SR-INV-DAVIS"]),
            medium: names(&["INV-EVANS", "INV-FOSTER", "INV-GRANT"]),
            low: names(&["INV-HAYES", "INV-IRWIN"]),
        }
    }
}

/// Case management settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseConfig {
    pub investigator_pools: InvestigatorPools,
    /// Weeks of benefit counted as potential loss
    pub potential_loss_weeks: u32,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            investigator_pools: InvestigatorPools::default(),
            potential_loss_weeks: 26,
        }
    }
}
