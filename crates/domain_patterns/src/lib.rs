//! Fraud Pattern Detection
//!
//! Looks across a whole batch of claims for multi-claim fraud schemes.
//!
//! Two passes run on every batch:
//!
//! 1. **Known schemes.** Each catalog scheme names one or more detectors from
//!    the [`DetectorRegistry`]. A scheme is detected when all of its detectors
//!    match the batch, and produces a [`PatternAlert`].
//! 2. **Clustering.** Claims are grouped by IP address and by filing time
//!    window, claimants by normalized address. Large, dense clusters are
//!    recorded as [`EmergingPattern`]s.
//!
//! Scheme statistics and emerging-pattern promotion are updated only by
//! [`PatternEngine::run_maintenance`], which is meant to run on a schedule.

pub mod config;
pub mod batch;
pub mod detectors;
pub mod scheme;
pub mod clustering;
pub mod engine;
pub mod error;

pub use config::DetectionConfig;
pub use batch::DetectionBatch;
pub use detectors::{DetectorOutcome, DetectorRegistry, SchemeDetector};
pub use scheme::{FraudScheme, PatternAlert};
pub use clustering::{Cluster, ClusterKind, EmergingPattern};
pub use engine::{PatternEngine, MaintenanceReport};
pub use error::{PatternError, PatternResult};
