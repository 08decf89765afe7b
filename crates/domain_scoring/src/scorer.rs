//! Real-time scorer

use chrono::Timelike;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

use core_kernel::{FactMap, PatternId, MAX_RISK_SCORE};
use domain_claims::facts::entity_facts;
use domain_claims::{AssessmentContext, Claim, ClaimantProfile, RiskAssessmentResult, RiskCategory, RiskFactor};

use crate::anomaly::anomaly_score;
use crate::behavioral::{BehavioralProfiles, SignalScore};
use crate::config::ScorerConfig;
use crate::error::{ScoringError, ScoringResult};
use crate::learning::learning_adjustment;
use crate::patterns::{default_patterns, ScoringPattern};
use crate::stats::{ProcessingStats, TimingWindow};

const EMERGING_BONUS: f64 = 20.0;
const EFFECTIVE_THRESHOLD: f64 = 0.8;
const INEFFECTIVE_THRESHOLD: f64 = 0.3;
const WEIGHT_STEP_UP: f64 = 2.0;
const WEIGHT_STEP_DOWN: f64 = 1.0;
const INVESTIGATION_THRESHOLD: f64 = 100.0;

/// `(factor threshold, factor confidence)` per signal
const BEHAVIORAL: (f64, f64) = (20.0, 0.85);
const PATTERN: (f64, f64) = (30.0, 0.90);
const ANOMALY: (f64, f64) = (25.0, 0.75);
const LEARNING: (f64, f64) = (5.0, 0.70);

/// What a maintenance pass changed
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScorerMaintenanceReport {
    /// Patterns whose frequency grew
    pub frequency_updates: usize,
    pub new_emerging: Vec<PatternId>,
    pub weights_tuned: usize,
}

/// Scores single claims as they arrive
pub struct RealTimeScorer {
    config: ScorerConfig,
    profiles: RwLock<BehavioralProfiles>,
    patterns: RwLock<Vec<ScoringPattern>>,
    emerging_threats: RwLock<BTreeSet<PatternId>>,
    timings: Mutex<TimingWindow>,
    learning_enabled: AtomicBool,
}

impl RealTimeScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self::with_patterns(config, default_patterns())
    }

    pub fn with_patterns(config: ScorerConfig, patterns: Vec<ScoringPattern>) -> Self {
        Self {
            profiles: RwLock::new(BehavioralProfiles::new()),
            patterns: RwLock::new(patterns),
            emerging_threats: RwLock::new(BTreeSet::new()),
            timings: Mutex::new(TimingWindow::new(config.timing_window)),
            learning_enabled: AtomicBool::new(config.learning_enabled),
            config,
        }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Scores one claim
    pub fn score(
        &self,
        claim: &Claim,
        claimant: &ClaimantProfile,
        context: &AssessmentContext,
    ) -> RiskAssessmentResult {
        let started = Instant::now();
        let mut result = RiskAssessmentResult::new(claim.claim_id.clone(), claim.claimant_id.clone());

        let behavioral = match &context.session {
            Some(session) => self
                .profiles
                .write()
                .score_session(&claimant.claimant_id, session, &self.config),
            None => SignalScore::default(),
        };

        let mut facts = entity_facts(claim, claimant, None, context);
        facts.insert("claim_hour".into(), json!(claim.created_date.hour()));
        let pattern = self.pattern_score(&facts);

        let anomaly = anomaly_score(claim, claimant, context, &self.config);
        let learning = if self.learning_enabled() {
            learning_adjustment(claim, claimant, context, &self.config)
        } else {
            SignalScore::default()
        };

        let total = behavioral.score + pattern.score + anomaly.score + learning.score;
        result.overall_risk_score = total.clamp(0.0, MAX_RISK_SCORE);

        let signals = [
            ("RTS-BEHAVIORAL", "Behavioral Anomaly", RiskCategory::Behavioral, BEHAVIORAL, behavioral),
            ("RTS-PATTERN", "Fraud Pattern Match", RiskCategory::Pattern, PATTERN, pattern),
            ("RTS-ANOMALY", "Statistical Anomaly", RiskCategory::Anomaly, ANOMALY, anomaly),
            ("RTS-LEARNING", "Learning Adjustment", RiskCategory::Learning, LEARNING, learning),
        ];
        for (id, name, category, (threshold, confidence), signal) in signals {
            if signal.score.abs() > threshold {
                let mut factor = RiskFactor::new(id, name, category, signal.score, confidence);
                factor.evidence = signal.evidence;
                result.risk_factors.push(factor);
            }
        }

        result.requires_investigation = result.overall_risk_score >= INVESTIGATION_THRESHOLD;
        if result.requires_investigation {
            result.recommend("Route to fraud investigation");
        }
        result.recompute_level();

        let elapsed = started.elapsed().as_millis() as u64;
        result.processing_time_ms = Some(elapsed);
        self.timings.lock().record(elapsed);

        debug!(
            claim_id = %result.claim_id,
            score = result.overall_risk_score,
            risk_level = %result.risk_level,
            elapsed_ms = elapsed,
            "Real-time score computed"
        );
        result
    }

    /// Matches the pattern table, counting hits for maintenance
    fn pattern_score(&self, facts: &FactMap) -> SignalScore {
        let mut signal = SignalScore::default();
        let mut threats = Vec::new();
        {
            let mut patterns = self.patterns.write();
            for pattern in patterns.iter_mut().filter(|p| p.matches(facts)) {
                pattern.pending_hits += 1;
                signal.add(pattern.weight, format!("matched {}", pattern.name));
                if pattern.emerging && pattern.frequency > self.config.emerging_bonus_frequency {
                    signal.add(EMERGING_BONUS, format!("{} is an emerging threat", pattern.name));
                    threats.push(pattern.id.clone());
                }
            }
        }
        if !threats.is_empty() {
            self.emerging_threats.write().extend(threats);
        }
        signal
    }

    // ------------------------------------------------------------------
    // Feedback and maintenance
    // ------------------------------------------------------------------

    /// Records whether a claim matched by this pattern proved fraudulent
    pub fn record_outcome(&self, pattern_id: &PatternId, was_fraud: bool) -> ScoringResult<()> {
        let mut patterns = self.patterns.write();
        let pattern = patterns
            .iter_mut()
            .find(|p| &p.id == pattern_id)
            .ok_or_else(|| ScoringError::PatternNotFound(pattern_id.clone()))?;
        pattern.pending_outcomes += 1;
        if was_fraud {
            pattern.pending_confirmed += 1;
        }
        Ok(())
    }

    /// Folds hits into frequency, promotes emerging threats and tunes weights
    pub fn run_maintenance(&self) -> ScorerMaintenanceReport {
        let mut report = ScorerMaintenanceReport::default();
        let mut patterns = self.patterns.write();

        for pattern in patterns.iter_mut() {
            if pattern.pending_hits > 0 {
                pattern.frequency += std::mem::take(&mut pattern.pending_hits);
                report.frequency_updates += 1;
            }
            if !pattern.emerging && pattern.frequency > self.config.emerging_promotion_frequency {
                pattern.emerging = true;
                info!(pattern_id = %pattern.id, frequency = pattern.frequency, "Pattern marked as emerging threat");
                report.new_emerging.push(pattern.id.clone());
            }

            if let Some(effectiveness) = pattern.pending_effectiveness() {
                let before = pattern.weight;
                if effectiveness > EFFECTIVE_THRESHOLD {
                    pattern.weight += WEIGHT_STEP_UP;
                } else if effectiveness < INEFFECTIVE_THRESHOLD {
                    pattern.weight -= WEIGHT_STEP_DOWN;
                }
                pattern.weight = pattern
                    .weight
                    .clamp(self.config.min_pattern_weight, self.config.max_pattern_weight);
                if pattern.weight != before {
                    debug!(pattern_id = %pattern.id, before, after = pattern.weight, "Pattern weight tuned");
                    report.weights_tuned += 1;
                }
                pattern.pending_confirmed = 0;
                pattern.pending_outcomes = 0;
            }
        }

        report
    }

    // ------------------------------------------------------------------
    // Catalog and read views
    // ------------------------------------------------------------------

    pub fn add_pattern(&self, pattern: ScoringPattern) -> ScoringResult<()> {
        let mut patterns = self.patterns.write();
        if patterns.iter().any(|p| p.id == pattern.id) {
            return Err(ScoringError::DuplicatePattern(pattern.id));
        }
        patterns.push(pattern);
        Ok(())
    }

    pub fn patterns(&self) -> Vec<ScoringPattern> {
        self.patterns.read().clone()
    }

    pub fn pattern(&self, id: &PatternId) -> Option<ScoringPattern> {
        self.patterns.read().iter().find(|p| &p.id == id).cloned()
    }

    pub fn emerging_threats(&self) -> Vec<PatternId> {
        self.emerging_threats.read().iter().cloned().collect()
    }

    pub fn set_learning_enabled(&self, enabled: bool) {
        self.learning_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn learning_enabled(&self) -> bool {
        self.learning_enabled.load(Ordering::Relaxed)
    }

    pub fn processing_stats(&self) -> ProcessingStats {
        self.timings.lock().stats()
    }

    /// Stored sessions for a claimant
    pub fn session_count(&self, claimant_id: &core_kernel::ClaimantId) -> usize {
        self.profiles.read().session_count(claimant_id)
    }
}

impl Default for RealTimeScorer {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}
