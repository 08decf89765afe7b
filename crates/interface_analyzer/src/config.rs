//! Analyzer configuration
//!
//! Defaults are compiled in. An optional TOML file and `ANALYZER_`-prefixed
//! environment variables override them, with `__` separating nested keys:
//!
//! ```bash
//! ANALYZER_LOGGING__FORMAT=json
//! ANALYZER_ORCHESTRATOR__CROSS_MATCH_BONUS=40
//! ANALYZER_SCORER__LEARNING_ENABLED=false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use core_kernel::{CoreError, MAX_RISK_SCORE};
use domain_cases::CaseConfig;
use domain_patterns::DetectionConfig;
use domain_scoring::ScorerConfig;

use crate::error::AnalyzerResult;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ANALYZER";

/// Complete analyzer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub orchestrator: OrchestratorConfig,
    pub scorer: ScorerConfig,
    pub detection: DetectionConfig,
    pub cases: CaseConfig,
    pub maintenance: MaintenanceConfig,
    pub logging: LoggingConfig,
}

/// Knobs for the assessment pipeline itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Points added per unit of oracle fraud likelihood
    pub ai_weight: f64,
    /// The oracle contribution never lifts the running total above this
    pub ai_score_cap: f64,
    /// Points added per cross-system match
    pub cross_match_bonus: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            ai_weight: 100.0,
            ai_score_cap: MAX_RISK_SCORE,
            cross_match_bonus: 25.0,
        }
    }
}

/// Background maintenance intervals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub enabled: bool,
    /// Scheme statistics and emerging-pattern promotion
    pub pattern_interval_secs: u64,
    /// Scoring pattern frequency and weight tuning
    pub scorer_interval_secs: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pattern_interval_secs: 3600,
            scorer_interval_secs: 600,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AnalyzerConfig {
    /// Loads configuration from environment
    pub fn from_env() -> AnalyzerResult<Self> {
        Self::load(None)
    }

    /// Loads configuration from an optional file, then the environment
    ///
    /// A missing file is not an error. The result is validated.
    pub fn load(file: Option<&Path>) -> AnalyzerResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the engines cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        let orchestrator = &self.orchestrator;
        if orchestrator.ai_weight < 0.0 || orchestrator.cross_match_bonus < 0.0 {
            return Err(CoreError::configuration(
                "ai_weight and cross_match_bonus must not be negative",
            ));
        }
        if orchestrator.ai_score_cap <= 0.0 || orchestrator.ai_score_cap > MAX_RISK_SCORE {
            return Err(CoreError::configuration(format!(
                "ai_score_cap must be in (0, {MAX_RISK_SCORE}]"
            )));
        }

        let scorer = &self.scorer;
        if scorer.min_history > scorer.history_size {
            return Err(CoreError::configuration(
                "scorer.min_history exceeds scorer.history_size",
            ));
        }
        if scorer.business_hours_start >= scorer.business_hours_end || scorer.business_hours_end > 24 {
            return Err(CoreError::configuration("scorer business hours are not a valid range"));
        }

        if self.maintenance.enabled
            && (self.maintenance.pattern_interval_secs == 0 || self.maintenance.scorer_interval_secs == 0)
        {
            return Err(CoreError::configuration("maintenance intervals must be positive"));
        }

        if !self.cases.investigator_pools.senior_pools_disjoint() {
            return Err(CoreError::configuration(
                "critical and high investigator pools must not overlap",
            ));
        }
        Ok(())
    }
}
