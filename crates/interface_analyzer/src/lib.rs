//! Enterprise Fraud Analyzer
//!
//! Wires the rule engine, pattern detection, real-time scorer and case
//! management into one assessment pipeline, and provides the pieces the
//! `fraud-analyzer` binary runs on: configuration loading, the legacy record
//! adapter, the scoring oracle port and background maintenance.
//!
//! ```text
//! LegacyClaimRecord ──▶ LegacyAdapter ──▶ AdaptedClaim
//!                                              │
//!     FactLookupPort ──▶ derived facts ────────┤
//!                                              ▼
//!                       RuleEngine ──▶ oracle signal ──▶ cross-match bonus
//!                                                              │
//!                                  final risk level ◀──────────┘
//!                                         │
//!                                         └──▶ CaseManager (when investigation is required)
//! ```

pub mod adapter;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod oracle;
pub mod scheduler;

pub use adapter::{AdaptedClaim, LegacyAdapter, LegacyClaimRecord};
pub use analyzer::{AnalyzerPorts, BatchReport, BatchSummary, ClaimAnalysis, EnterpriseAnalyzer};
pub use config::{AnalyzerConfig, LogFormat, LoggingConfig, MaintenanceConfig, OrchestratorConfig};
pub use error::{AnalyzerError, AnalyzerResult};
pub use oracle::ScoringOraclePort;
pub use scheduler::MaintenanceScheduler;
