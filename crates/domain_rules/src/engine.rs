//! Rule engine
//!
//! The engine owns the rule catalog and the trigger audit log. Both sit behind
//! their own `parking_lot::RwLock` so that evaluation (a read of the catalog
//! and an append to the log) can run alongside catalog administration and
//! reporting.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, warn};

use core_kernel::expression::evaluate_all;
use core_kernel::{AuditEntryId, FactMap, RuleId};
use domain_claims::facts::entity_facts;
use domain_claims::{
    AssessmentContext, Claim, ClaimantProfile, EmployerRecord, RiskAssessmentResult, RiskCategory,
    RiskFactor,
};

use crate::audit::{RuleAuditEntry, RulePerformance};
use crate::catalog::default_rules;
use crate::error::{RuleError, RuleResult};
use crate::rule::{ActionType, BusinessRule, RuleUpdate};

/// Confidence attached to every rule-sourced risk factor
pub const RULE_FACTOR_CONFIDENCE: f64 = 0.85;

/// Evaluates business rules against claims
pub struct RuleEngine {
    rules: RwLock<Vec<BusinessRule>>,
    audit: RwLock<Vec<RuleAuditEntry>>,
}

impl RuleEngine {
    /// Creates an engine seeded with the default catalog
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(default_rules()),
            audit: RwLock::new(Vec::new()),
        }
    }

    /// Creates an engine with no rules
    pub fn empty() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
            audit: RwLock::new(Vec::new()),
        }
    }

    /// Creates an engine from an explicit catalog
    pub fn with_rules(rules: Vec<BusinessRule>) -> RuleResult<Self> {
        let engine = Self::empty();
        for rule in rules {
            engine.add_rule(rule)?;
        }
        Ok(engine)
    }

    /// Evaluates every rule in effect on the context date against the claim
    pub fn evaluate(
        &self,
        claim: &Claim,
        claimant: &ClaimantProfile,
        employer: Option<&EmployerRecord>,
        context: &AssessmentContext,
    ) -> RiskAssessmentResult {
        let started = Instant::now();
        let facts = entity_facts(claim, claimant, employer, context);
        let mut result = RiskAssessmentResult::new(claim.claim_id.clone(), claim.claimant_id.clone());
        let mut triggers = Vec::new();
        let as_of = context.now().date_naive();

        {
            let rules = self.rules.read();
            for rule in rules.iter().filter(|r| r.is_in_effect(as_of)) {
                if !evaluate_all(&rule.conditions, &facts) {
                    continue;
                }

                let score_delta = self.apply_actions(rule, claim, &mut result);
                result.apply_adjustment(score_delta, Some(rule_factor(rule, &facts)));
                result.triggered_rules.push(rule.id.clone());

                debug!(rule_id = %rule.id, claim_id = %claim.claim_id, score_delta, "Rule triggered");

                triggers.push(RuleAuditEntry {
                    id: AuditEntryId::new_v7(),
                    rule_id: rule.id.clone(),
                    rule_name: rule.name.clone(),
                    claim_id: claim.claim_id.clone(),
                    claimant_id: claim.claimant_id.clone(),
                    score_delta,
                    blocked: rule.actions.iter().any(|a| a.action_type == ActionType::BlockClaim),
                    triggered_at: chrono::Utc::now(),
                });
            }
        }

        if !triggers.is_empty() {
            self.audit.write().extend(triggers);
        }

        result.recompute_level();
        result.processing_time_ms = Some(started.elapsed().as_millis() as u64);

        info!(
            claim_id = %claim.claim_id,
            score = result.overall_risk_score,
            level = %result.risk_level,
            triggered = result.triggered_rules.len(),
            "Rules evaluated"
        );

        result
    }

    /// Executes a triggered rule's actions, returning the score to add
    fn apply_actions(&self, rule: &BusinessRule, claim: &Claim, result: &mut RiskAssessmentResult) -> f64 {
        let mut score_delta = 0.0;
        for action in &rule.actions {
            match action.action_type {
                ActionType::SetFlag => {}
                ActionType::AddScore => score_delta += action.score(),
                ActionType::BlockClaim => {
                    result.blocked = true;
                    result.recommend("Suspend payments pending investigation");
                }
                ActionType::RequireVerification => {
                    result.requires_investigation = true;
                    result.recommend(action.text("message").unwrap_or("Additional verification required"));
                }
                ActionType::CreateCase => {
                    result.requires_investigation = true;
                    result.recommend("Open fraud investigation case");
                }
                ActionType::SendAlert => {
                    warn!(rule_id = %rule.id, claim_id = %claim.claim_id, severity = ?rule.severity, "Rule alert");
                }
            }
        }
        score_delta
    }

    // ------------------------------------------------------------------
    // Catalog administration
    // ------------------------------------------------------------------

    /// Adds a rule at the end of the evaluation order
    pub fn add_rule(&self, rule: BusinessRule) -> RuleResult<()> {
        rule.validate()?;
        if rule.uses_or() {
            warn!(
                rule_id = %rule.id,
                "Rule uses OR logical operator; conditions are evaluated as a conjunction"
            );
        }

        let mut rules = self.rules.write();
        if rules.iter().any(|r| r.id == rule.id) {
            return Err(RuleError::DuplicateRule(rule.id));
        }
        info!(rule_id = %rule.id, name = %rule.name, "Rule added");
        rules.push(rule);
        Ok(())
    }

    /// Applies a partial update, always stamping a new modification time
    pub fn update_rule(&self, id: &RuleId, update: RuleUpdate) -> RuleResult<BusinessRule> {
        let mut rules = self.rules.write();
        let rule = rules
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| RuleError::RuleNotFound(id.clone()))?;

        let mut updated = rule.clone();
        update.apply_to(&mut updated);
        updated.validate()?;
        if updated.uses_or() {
            warn!(rule_id = %id, "Rule uses OR logical operator; conditions are evaluated as a conjunction");
        }

        *rule = updated.clone();
        info!(rule_id = %id, "Rule updated");
        Ok(updated)
    }

    /// Soft-deletes a rule; rules are never removed from the catalog
    pub fn deactivate_rule(&self, id: &RuleId) -> RuleResult<()> {
        self.update_rule(
            id,
            RuleUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .map(|_| ())
    }

    pub fn get_rule(&self, id: &RuleId) -> Option<BusinessRule> {
        self.rules.read().iter().find(|r| &r.id == id).cloned()
    }

    /// All rules in evaluation order, active or not
    pub fn list_rules(&self) -> Vec<BusinessRule> {
        self.rules.read().clone()
    }

    pub fn active_rule_count(&self) -> usize {
        self.rules.read().iter().filter(|r| r.is_active).count()
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    /// Every trigger recorded so far, oldest first
    pub fn audit_log(&self) -> Vec<RuleAuditEntry> {
        self.audit.read().clone()
    }

    /// Triggers recorded for one rule, oldest first
    pub fn audit_log_for(&self, rule_id: &RuleId) -> Vec<RuleAuditEntry> {
        self.audit
            .read()
            .iter()
            .filter(|e| &e.rule_id == rule_id)
            .cloned()
            .collect()
    }

    /// Trigger statistics for every rule in the catalog
    pub fn performance_summary(&self) -> Vec<RulePerformance> {
        let mut by_rule: HashMap<RuleId, (u64, f64, Option<chrono::DateTime<chrono::Utc>>)> =
            HashMap::new();
        for entry in self.audit.read().iter() {
            let stats = by_rule.entry(entry.rule_id.clone()).or_insert((0, 0.0, None));
            stats.0 += 1;
            stats.1 += entry.score_delta;
            stats.2 = stats.2.max(Some(entry.triggered_at));
        }

        self.rules
            .read()
            .iter()
            .map(|rule| {
                let (count, total, last) = by_rule.get(&rule.id).copied().unwrap_or((0, 0.0, None));
                RulePerformance {
                    rule_id: rule.id.clone(),
                    rule_name: rule.name.clone(),
                    is_active: rule.is_active,
                    trigger_count: count,
                    total_score_contributed: total,
                    last_triggered: last,
                }
            })
            .collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// The single risk factor emitted for a triggered rule
///
/// Impact is the severity weight, not the rule's ADD_SCORE amount.
fn rule_factor(rule: &BusinessRule, facts: &FactMap) -> RiskFactor {
    let mut factor = RiskFactor::new(
        rule.id.as_str(),
        rule.name.as_str(),
        RiskCategory::Rule,
        rule.severity.impact_weight(),
        RULE_FACTOR_CONFIDENCE,
    )
    .with_description(rule.description.as_str());

    for condition in &rule.conditions {
        if let Some(actual) = facts.get(&condition.field) {
            factor = factor.with_evidence(format!("{} = {}", condition.field, actual));
        }
    }
    for action in rule.actions.iter().filter(|a| a.action_type == ActionType::SetFlag) {
        if let Some(flag) = action.text("flag") {
            factor = factor.with_evidence(format!("flag: {flag}"));
        }
    }
    factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{RuleAction, RuleType};
    use core_kernel::{ClaimId, ClaimantId, ConditionOperator, RiskLevel, Severity};
    use domain_claims::DerivedFacts;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn claim() -> Claim {
        Claim::new(ClaimId::new("CLM-1"), ClaimantId::new("C-1"), dec!(450), dec!(11700))
    }

    fn claimant() -> ClaimantProfile {
        ClaimantProfile::new(ClaimantId::new("C-1"), "Ana", "Diaz", "ssn-1")
    }

    #[test]
    fn test_clean_claim_scores_zero() {
        let engine = RuleEngine::new();
        let result = engine.evaluate(&claim(), &claimant(), None, &AssessmentContext::new());
        assert_eq!(result.overall_risk_score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.auto_approval_eligible);
        assert!(engine.audit_log().is_empty());
    }

    #[test]
    fn test_blocking_rule_is_critical() {
        let engine = RuleEngine::new();
        let context = AssessmentContext::new().with_derived(DerivedFacts {
            death_registry_match: true,
            ..Default::default()
        });
        let result = engine.evaluate(&claim(), &claimant(), None, &context);
        assert!(result.blocked);
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert!(result.requires_investigation);
        assert!(!result.auto_approval_eligible);
    }

    #[test]
    fn test_zero_condition_rule_always_triggers() {
        let engine = RuleEngine::empty();
        engine
            .add_rule(
                BusinessRule::new("ALWAYS", "Always", RuleType::Scoring, "TEST", Severity::Info)
                    .then(RuleAction::add_score(10.0)),
            )
            .unwrap();
        let result = engine.evaluate(&claim(), &claimant(), None, &AssessmentContext::new());
        assert_eq!(result.overall_risk_score, 10.0);
        assert_eq!(result.risk_factors[0].impact, 25.0);
    }

    #[test]
    fn test_inactive_rules_skipped() {
        let engine = RuleEngine::empty();
        engine
            .add_rule(
                BusinessRule::new("ALWAYS", "Always", RuleType::Scoring, "TEST", Severity::Info)
                    .then(RuleAction::add_score(10.0)),
            )
            .unwrap();
        engine.deactivate_rule(&RuleId::new("ALWAYS")).unwrap();
        let result = engine.evaluate(&claim(), &claimant(), None, &AssessmentContext::new());
        assert_eq!(result.overall_risk_score, 0.0);
        assert!(engine.get_rule(&RuleId::new("ALWAYS")).is_some());
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let engine = RuleEngine::new();
        let dup = BusinessRule::new(
            crate::catalog::DUPLICATE_SSN,
            "Copy",
            RuleType::Scoring,
            "IDENTITY",
            Severity::Info,
        )
        .when("ssn_usage_count", ConditionOperator::GreaterThan, json!(5));
        assert!(matches!(engine.add_rule(dup), Err(RuleError::DuplicateRule(_))));
    }
}
