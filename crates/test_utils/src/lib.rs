//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims integrity test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for claims, claimants and employers
//! - `assertions`: Assertion helpers for assessment results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
