//! Real-Time Claim Scoring
//!
//! Scores one claim from four independent signals and sums them:
//!
//! - **behavioral**: the filing session against the claimant's recent sessions
//! - **pattern**: a weighted table of condition patterns
//! - **anomaly**: filing hour, benefit amount, baseline risk, shared contacts
//! - **learning**: similarity to recently confirmed fraud and false positives
//!
//! The total is clamped to `0..=1000`. A risk factor is only reported for a
//! signal that clears its category threshold.
//!
//! Pattern weights and emerging-threat status evolve through
//! [`RealTimeScorer::run_maintenance`], fed by
//! [`RealTimeScorer::record_outcome`].

pub mod config;
pub mod behavioral;
pub mod patterns;
pub mod anomaly;
pub mod learning;
pub mod stats;
pub mod scorer;
pub mod error;

pub use config::ScorerConfig;
pub use behavioral::BehavioralProfiles;
pub use patterns::ScoringPattern;
pub use stats::ProcessingStats;
pub use scorer::{RealTimeScorer, ScorerMaintenanceReport};
pub use error::{ScoringError, ScoringResult};
