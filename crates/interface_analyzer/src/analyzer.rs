//! Enterprise analyzer
//!
//! Runs one claim through the full assessment pipeline:
//!
//! 1. derived facts from the lookup port, each degrading to a neutral default
//! 2. rule engine evaluation
//! 3. oracle scoring of the justification text, capped at `ai_score_cap`
//! 4. cross-system matching, `cross_match_bonus` points per match
//! 5. final risk level from the cumulative score
//! 6. a fraud case when the assessment requires investigation
//!
//! Collaborator failures are logged and skipped. Anything else that goes wrong
//! yields the fallback assessment, which always routes the claim to manual
//! review.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use core_kernel::{ClaimId, PortError, RiskLevel};
use domain_cases::crossmatch::mock::MockCrossMatch;
use domain_cases::{AlertType, CaseManager, CrossMatchPort, CrossMatchResult, FraudCase};
use domain_claims::{AssessmentContext, DerivedFacts, RiskAssessmentResult, RiskCategory, RiskFactor};
use domain_patterns::{PatternAlert, PatternEngine};
use domain_rules::ports::mock::MockFactLookup;
use domain_rules::{FactLookupPort, RuleEngine};
use domain_scoring::RealTimeScorer;

use crate::adapter::{AdaptedClaim, LegacyAdapter, LegacyClaimRecord};
use crate::config::{AnalyzerConfig, OrchestratorConfig};
use crate::error::AnalyzerResult;
use crate::oracle::mock::MockScoringOracle;
use crate::oracle::ScoringOraclePort;

pub const AI_FACTOR: &str = "AI-TEXT-ANALYSIS";
pub const CROSS_MATCH_FACTOR: &str = "CROSS-SYSTEM-MATCH";
const AI_FACTOR_CONFIDENCE: f64 = 0.75;

/// External collaborators of the analyzer
#[derive(Clone)]
pub struct AnalyzerPorts {
    pub facts: Arc<dyn FactLookupPort>,
    pub cross_match: Arc<dyn CrossMatchPort>,
    /// `None` skips text analysis entirely
    pub oracle: Option<Arc<dyn ScoringOraclePort>>,
}

impl AnalyzerPorts {
    /// In-memory collaborators for offline batch runs
    pub fn offline() -> Self {
        Self {
            facts: Arc::new(MockFactLookup::new()),
            cross_match: Arc::new(MockCrossMatch::new()),
            oracle: Some(Arc::new(MockScoringOracle::new())),
        }
    }
}

/// Everything produced for one claim
#[derive(Debug, Clone, Serialize)]
pub struct ClaimAnalysis {
    pub assessment: RiskAssessmentResult,
    /// Case opened for this claim, if any
    pub case: Option<FraudCase>,
    pub cross_matches: Vec<CrossMatchResult>,
}

impl ClaimAnalysis {
    fn fallback(adapted: &AdaptedClaim, reason: impl Into<String>) -> Self {
        Self {
            assessment: RiskAssessmentResult::fallback(
                adapted.claim.claim_id.clone(),
                adapted.claim.claimant_id.clone(),
                reason,
            ),
            case: None,
            cross_matches: Vec::new(),
        }
    }
}

/// Aggregate view of a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub by_level: BTreeMap<RiskLevel, usize>,
    pub fallbacks: usize,
    pub blocked: usize,
    pub auto_approved: usize,
    pub cases_opened: usize,
    pub pattern_alerts: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[ClaimAnalysis], pattern_alerts: &[PatternAlert]) -> Self {
        let mut summary = Self {
            total: results.len(),
            pattern_alerts: pattern_alerts.len(),
            ..Self::default()
        };
        for result in results {
            let assessment = &result.assessment;
            *summary.by_level.entry(assessment.risk_level).or_default() += 1;
            summary.fallbacks += usize::from(assessment.is_fallback());
            summary.blocked += usize::from(assessment.blocked);
            summary.auto_approved += usize::from(assessment.auto_approval_eligible);
            summary.cases_opened += usize::from(result.case.is_some());
        }
        summary
    }
}

/// Results of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: Vec<ClaimAnalysis>,
    pub pattern_alerts: Vec<PatternAlert>,
    pub summary: BatchSummary,
}

/// Orchestrates the rule engine, pattern engine, scorer and case management
pub struct EnterpriseAnalyzer {
    config: OrchestratorConfig,
    adapter: LegacyAdapter,
    rules: Arc<RuleEngine>,
    patterns: Arc<PatternEngine>,
    scorer: Arc<RealTimeScorer>,
    cases: Arc<CaseManager>,
    facts: Arc<dyn FactLookupPort>,
    oracle: Option<Arc<dyn ScoringOraclePort>>,
}

impl EnterpriseAnalyzer {
    /// Builds the engines from configuration with the default rule catalog
    pub fn new(config: &AnalyzerConfig, ports: AnalyzerPorts) -> Self {
        Self::with_rule_engine(config, ports, RuleEngine::new())
    }

    pub fn with_rule_engine(config: &AnalyzerConfig, ports: AnalyzerPorts, rules: RuleEngine) -> Self {
        Self {
            config: config.orchestrator.clone(),
            adapter: LegacyAdapter::new(),
            rules: Arc::new(rules),
            patterns: Arc::new(PatternEngine::new(config.detection.clone())),
            scorer: Arc::new(RealTimeScorer::new(config.scorer.clone())),
            cases: Arc::new(CaseManager::new(config.cases.clone(), ports.cross_match)),
            facts: ports.facts,
            oracle: ports.oracle,
        }
    }

    pub fn rules(&self) -> &Arc<RuleEngine> {
        &self.rules
    }

    pub fn patterns(&self) -> &Arc<PatternEngine> {
        &self.patterns
    }

    pub fn scorer(&self) -> &Arc<RealTimeScorer> {
        &self.scorer
    }

    pub fn cases(&self) -> &Arc<CaseManager> {
        &self.cases
    }

    pub fn adapt(&self, record: &LegacyClaimRecord) -> AdaptedClaim {
        self.adapter.adapt(record)
    }

    /// Analyzes one legacy record
    pub async fn analyze(&self, record: &LegacyClaimRecord) -> ClaimAnalysis {
        let adapted = self.adapter.adapt(record);
        self.analyze_claim(&adapted).await
    }

    /// Analyzes one adapted claim; never fails
    #[instrument(skip(self, adapted), fields(claim_id = %adapted.claim.claim_id))]
    pub async fn analyze_claim(&self, adapted: &AdaptedClaim) -> ClaimAnalysis {
        match self.run_pipeline(adapted).await {
            Ok(analysis) => analysis,
            Err(error) => {
                error!(%error, "Assessment pipeline failed, returning fallback assessment");
                ClaimAnalysis::fallback(adapted, error.to_string())
            }
        }
    }

    /// Analyzes each record independently
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn analyze_batch(&self, records: &[LegacyClaimRecord]) -> Vec<ClaimAnalysis> {
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            results.push(self.analyze(record).await);
        }
        results
    }

    /// Analyzes every record, then runs scheme detection over the whole batch
    pub async fn run_batch(&self, records: &[LegacyClaimRecord]) -> BatchReport {
        let adapted: Vec<_> = records.iter().map(|r| self.adapter.adapt(r)).collect();
        let mut results = Vec::with_capacity(adapted.len());
        for claim in &adapted {
            results.push(self.analyze_claim(claim).await);
        }
        let pattern_alerts = self.detect_patterns(&adapted);
        let summary = BatchSummary::from_results(&results, &pattern_alerts);
        info!(
            total = summary.total,
            cases_opened = summary.cases_opened,
            fallbacks = summary.fallbacks,
            pattern_alerts = summary.pattern_alerts,
            "Batch complete"
        );
        BatchReport {
            results,
            pattern_alerts,
            summary,
        }
    }

    /// Runs scheme detection over a batch and raises a system alert per detection
    pub fn detect_patterns(&self, batch: &[AdaptedClaim]) -> Vec<PatternAlert> {
        let claims: Vec<_> = batch.iter().map(|a| a.claim.clone()).collect();
        let claimants: Vec<_> = batch.iter().map(|a| a.claimant.clone()).collect();

        let alerts = self.patterns.detect(&claims, &claimants);
        for alert in &alerts {
            self.cases.create_alert(
                AlertType::PatternDetected,
                alert.severity,
                alert.scheme_name.clone(),
                format!(
                    "{} claims affected, confidence {:.2}",
                    alert.affected_claim_ids.len(),
                    alert.confidence
                ),
                None,
            );
        }
        alerts
    }

    /// Scores a claim with the real-time scorer
    pub async fn score_realtime(&self, adapted: &AdaptedClaim) -> RiskAssessmentResult {
        let context = self.enrich_context(adapted).await;
        self.scorer.score(&adapted.claim, &adapted.claimant, &context)
    }

    async fn run_pipeline(&self, adapted: &AdaptedClaim) -> AnalyzerResult<ClaimAnalysis> {
        adapted.claim.validate()?;

        let context = self.enrich_context(adapted).await;
        let mut assessment = self.rules.evaluate(
            &adapted.claim,
            &adapted.claimant,
            adapted.employer.as_ref(),
            &context,
        );

        if let Some(text) = context.justification.as_deref() {
            self.apply_text_signal(&mut assessment, text).await;
        }

        let cross_matches = self.cases.cross_match(&adapted.claimant).await;
        self.apply_cross_match_bonus(&mut assessment, &cross_matches);

        // Case priority follows the final level, not the rule engine's
        assessment.recompute_level();
        let case = if assessment.requires_investigation {
            Some(self.cases.create_case(&assessment, &adapted.claim)?)
        } else {
            None
        };

        info!(
            score = assessment.overall_risk_score,
            level = %assessment.risk_level,
            matches = cross_matches.len(),
            case_number = case.as_ref().map(|c| c.case_number.as_str()),
            "Claim analyzed"
        );

        Ok(ClaimAnalysis {
            assessment,
            case,
            cross_matches,
        })
    }

    /// Fills derived facts from the lookup port
    async fn enrich_context(&self, adapted: &AdaptedClaim) -> AssessmentContext {
        let claim_id = &adapted.claim.claim_id;
        let ssn_ref = adapted.claimant.ssn_ref.as_str();
        let mut derived = DerivedFacts::default();

        if !ssn_ref.is_empty() {
            derived.ssn_usage_count =
                neutral_on_error(claim_id, "ssn_usage_count", self.facts.ssn_usage_count(ssn_ref).await);
            derived.death_registry_match = neutral_on_error(
                claim_id,
                "death_registry_match",
                self.facts.death_registry_match(ssn_ref).await,
            );
        }
        derived.claims_last_30_days = neutral_on_error(
            claim_id,
            "claims_last_30_days",
            self.facts.claims_last_30_days(&adapted.claimant.claimant_id).await,
        );

        let industry_code = adapted.employer.as_ref().and_then(|e| e.industry_code.as_deref());
        if let Some(code) = industry_code {
            let average = neutral_on_error(
                claim_id,
                "industry_average_wage",
                self.facts.industry_average_wage(code).await,
            );
            let wage = adapted.context.number("wage_reported").unwrap_or(0.0);
            derived.wage_to_industry_ratio = average
                .filter(|average| *average > 0.0 && wage > 0.0)
                .map(|average| wage / average);
        }

        adapted.context.clone().with_derived(derived)
    }

    async fn apply_text_signal(&self, assessment: &mut RiskAssessmentResult, text: &str) {
        let Some(oracle) = &self.oracle else {
            return;
        };
        let likelihood = match oracle.fraud_likelihood(text).await {
            Ok(likelihood) if likelihood.is_finite() => likelihood.clamp(0.0, 1.0),
            Ok(likelihood) => {
                warn!(likelihood, "Scoring oracle returned a non-finite likelihood, ignoring");
                return;
            }
            Err(error) => {
                warn!(%error, "Scoring oracle unavailable, continuing without text analysis");
                return;
            }
        };

        let headroom = (self.config.ai_score_cap - assessment.overall_risk_score).max(0.0);
        let contribution = (likelihood * self.config.ai_weight).min(headroom);
        if contribution <= 0.0 {
            return;
        }

        let factor = RiskFactor::new(
            AI_FACTOR,
            "AI Text Analysis",
            RiskCategory::AiAnalysis,
            contribution,
            AI_FACTOR_CONFIDENCE,
        )
        .with_description(format!("Justification fraud likelihood {likelihood:.2}"));
        assessment.apply_adjustment(contribution, Some(factor));
    }

    fn apply_cross_match_bonus(&self, assessment: &mut RiskAssessmentResult, matches: &[CrossMatchResult]) {
        if matches.is_empty() {
            return;
        }
        let bonus = self.config.cross_match_bonus * matches.len() as f64;
        let confidence = matches.iter().map(|m| m.confidence).sum::<f64>() / matches.len() as f64;

        let mut factor = RiskFactor::new(
            CROSS_MATCH_FACTOR,
            "Cross-System Match",
            RiskCategory::CrossMatch,
            bonus,
            confidence,
        )
        .with_description(format!("{} record(s) matched in external systems", matches.len()));
        for found in matches {
            factor = factor.with_evidence(format!(
                "{:?}/{:?} {}: {}",
                found.source_type, found.match_type, found.record_id, found.risk_implication
            ));
        }

        assessment.apply_adjustment(bonus, Some(factor));
        assessment.recommend("Review cross-system matches");
    }
}

fn neutral_on_error<T: Default>(claim_id: &ClaimId, lookup: &'static str, result: Result<T, PortError>) -> T {
    result.unwrap_or_else(|error| {
        warn!(%claim_id, lookup, %error, "Fact lookup failed, using neutral default");
        T::default()
    })
}
