//! Detection configuration

use serde::{Deserialize, Serialize};

/// Thresholds for scheme detectors, clustering and promotion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// A shared IP group must exceed this many claims
    pub shared_ip_threshold: usize,
    /// An SSN must be shared by more than this many claimants
    pub ssn_sharing_threshold: usize,
    /// An employer must exceed this many claims within the window
    pub employer_claim_threshold: usize,
    pub employer_window_days: i64,
    /// Synthetic identity: risk score above this ...
    pub synthetic_min_risk_score: u8,
    /// ... and an account younger than this many days
    pub synthetic_max_account_age_days: i64,
    /// IP prefixes treated as non-domestic
    pub foreign_ip_prefixes: Vec<String>,
    /// Foreign-prefix claims must exceed this count
    pub foreign_access_threshold: usize,
    /// Minimum inter-arrival samples for cadence analysis
    pub cadence_min_samples: usize,
    /// Cadence is bot-like when variance is below this fraction of the mean
    pub cadence_variance_ratio: f64,

    pub ip_cluster_min_size: usize,
    pub ip_cluster_denominator: f64,
    pub time_window_secs: i64,
    pub time_cluster_min_size: usize,
    pub time_cluster_denominator: f64,
    pub address_cluster_min_size: usize,
    pub address_cluster_denominator: f64,

    /// Clusters scoring above this with enough members become emerging patterns
    pub emerging_min_score: f64,
    pub emerging_min_members: usize,
    pub promotion_min_observations: u32,
    pub promotion_min_score: f64,
    /// Maintenance passes an emerging pattern may go unseen before it is dropped
    pub emerging_max_idle_passes: u32,
    /// Success rate assigned to a newly promoted scheme
    pub promoted_success_rate: f64,
    /// Weight of one outcome in the rolling success rate
    pub feedback_weight: f64,
    /// Alerts retained for the read view
    pub max_alert_history: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            shared_ip_threshold: 5,
            ssn_sharing_threshold: 1,
            employer_claim_threshold: 10,
            employer_window_days: 30,
            synthetic_min_risk_score: 80,
            synthetic_max_account_age_days: 30,
            foreign_ip_prefixes: vec![
                "5.".to_string(),
                "31.".to_string(),
                "41.".to_string(),
                "91.".to_string(),
                "185.".to_string(),
                "197.".to_string(),
            ],
            foreign_access_threshold: 3,
            cadence_min_samples: 10,
            cadence_variance_ratio: 0.1,
            ip_cluster_min_size: 5,
            ip_cluster_denominator: 10.0,
            time_window_secs: 3600,
            time_cluster_min_size: 5,
            time_cluster_denominator: 20.0,
            address_cluster_min_size: 4,
            address_cluster_denominator: 8.0,
            emerging_min_score: 0.7,
            emerging_min_members: 5,
            promotion_min_observations: 5,
            promotion_min_score: 0.8,
            emerging_max_idle_passes: 24,
            promoted_success_rate: 0.5,
            feedback_weight: 0.1,
            max_alert_history: 1000,
        }
    }
}
