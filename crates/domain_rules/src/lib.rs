//! Claim Rule Engine
//!
//! Evaluates a catalog of business rules against the facts of a single claim
//! and turns the triggered rules into a scored [`RiskAssessmentResult`].
//!
//! # Evaluation
//!
//! Active rules are evaluated in definition order. A rule triggers when every
//! one of its conditions holds; its actions are then executed in order:
//!
//! | action                 | effect                                   |
//! |------------------------|------------------------------------------|
//! | `SET_FLAG`             | recorded as factor evidence              |
//! | `ADD_SCORE`            | adds `parameters.score` to the total     |
//! | `BLOCK_CLAIM`          | marks the assessment blocked (CRITICAL)  |
//! | `REQUIRE_VERIFICATION` | requires investigation                   |
//! | `CREATE_CASE`          | requires investigation                   |
//! | `SEND_ALERT`           | logged only                              |
//!
//! Each triggered rule contributes one risk factor whose impact is the rule's
//! severity weight. That impact is reporting metadata and is not reconciled
//! with the `ADD_SCORE` amount that actually moves the score.
//!
//! [`RiskAssessmentResult`]: domain_claims::RiskAssessmentResult

pub mod rule;
pub mod catalog;
pub mod engine;
pub mod audit;
pub mod ports;
pub mod error;

pub use rule::{BusinessRule, RuleType, RuleAction, ActionType, RuleUpdate};
pub use engine::RuleEngine;
pub use audit::{RuleAuditEntry, RulePerformance};
pub use ports::{FactLookupPort, LookupFacts};
pub use error::{RuleError, RuleResult};
