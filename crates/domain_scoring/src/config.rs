//! Scorer configuration

use serde::{Deserialize, Serialize};

/// Thresholds for the real-time scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Sessions kept per claimant
    pub history_size: usize,
    /// Historical sessions needed before behavioral scoring applies
    pub min_history: usize,
    pub typing_deviation: f64,
    pub duration_deviation: f64,
    pub max_devices: usize,
    pub min_location_consistency: f64,

    /// Filing hours considered normal, `[start, end)` in UTC
    pub business_hours_start: u32,
    pub business_hours_end: u32,
    /// Reference average weekly benefit amount
    pub reference_weekly_amount: f64,
    pub amount_deviation: f64,
    pub baseline_risk_threshold: u8,
    pub shared_address_threshold: u32,
    pub shared_phone_threshold: u32,

    pub learning_enabled: bool,
    pub learning_amount_tolerance: f64,
    pub learning_risk_tolerance: f64,

    /// Emerging patterns above this frequency earn the emerging-threat bonus
    pub emerging_bonus_frequency: u64,
    /// Patterns above this frequency become emerging
    pub emerging_promotion_frequency: u64,
    pub min_pattern_weight: f64,
    pub max_pattern_weight: f64,

    /// Processing times kept for statistics
    pub timing_window: usize,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            history_size: 10,
            min_history: 2,
            typing_deviation: 0.5,
            duration_deviation: 0.7,
            max_devices: 3,
            min_location_consistency: 0.3,
            business_hours_start: 6,
            business_hours_end: 22,
            reference_weekly_amount: 450.0,
            amount_deviation: 1.5,
            baseline_risk_threshold: 70,
            shared_address_threshold: 5,
            shared_phone_threshold: 3,
            learning_enabled: true,
            learning_amount_tolerance: 50.0,
            learning_risk_tolerance: 20.0,
            emerging_bonus_frequency: 20,
            emerging_promotion_frequency: 30,
            min_pattern_weight: 10.0,
            max_pattern_weight: 100.0,
            timing_window: 1000,
        }
    }
}
