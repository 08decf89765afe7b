//! Pattern detection engine
//!
//! Shared state, one lock per structure:
//!
//! - `schemes`: the scheme catalog, read by detection, written by maintenance
//! - `emerging`: emerging patterns keyed by id, written by detection and maintenance
//! - `feedback`: case outcomes waiting to be folded in by maintenance
//! - `alerts`: bounded history of raised alerts

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info, warn};

use core_kernel::{AlertId, ClaimId, ClaimantId, PatternId, SchemeId, Severity};
use domain_claims::{Claim, ClaimantProfile};

use crate::batch::DetectionBatch;
use crate::clustering::{cluster_batch, Cluster, EmergingPattern};
use crate::config::DetectionConfig;
use crate::detectors::{DetectorOutcome, DetectorRegistry, SchemeDetector, ALWAYS_TRUE};
use crate::error::{PatternError, PatternResult};
use crate::scheme::{default_schemes, FraudScheme, PatternAlert};

/// What a maintenance pass changed
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaintenanceReport {
    pub outcomes_applied: usize,
    pub promoted: Vec<SchemeId>,
    /// Emerging patterns dropped for going unseen too long
    pub expired: Vec<PatternId>,
}

/// Batch-level fraud scheme detection
pub struct PatternEngine {
    config: DetectionConfig,
    registry: RwLock<DetectorRegistry>,
    schemes: RwLock<Vec<FraudScheme>>,
    emerging: RwLock<HashMap<PatternId, EmergingPattern>>,
    feedback: Mutex<Vec<(SchemeId, bool)>>,
    alerts: RwLock<VecDeque<PatternAlert>>,
}

impl PatternEngine {
    /// Creates an engine with the built-in detectors and scheme catalog
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            registry: RwLock::new(DetectorRegistry::with_defaults(&config)),
            schemes: RwLock::new(default_schemes()),
            emerging: RwLock::new(HashMap::new()),
            feedback: Mutex::new(Vec::new()),
            alerts: RwLock::new(VecDeque::new()),
            config,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Runs scheme detection and clustering over a batch
    pub fn detect(&self, claims: &[Claim], claimants: &[ClaimantProfile]) -> Vec<PatternAlert> {
        self.detect_at(claims, claimants, Utc::now())
    }

    /// As [`detect`](Self::detect) with an explicit reference time
    pub fn detect_at(
        &self,
        claims: &[Claim],
        claimants: &[ClaimantProfile],
        now: DateTime<Utc>,
    ) -> Vec<PatternAlert> {
        let batch = DetectionBatch::new(claims, claimants, now);

        let alerts = self.detect_schemes(&batch);
        let clusters = cluster_batch(&batch, &self.config);
        let new_emerging = self.track_emerging(&clusters, now);

        info!(
            claims = claims.len(),
            claimants = claimants.len(),
            alerts = alerts.len(),
            clusters = clusters.len(),
            new_emerging,
            "Pattern detection complete"
        );

        if !alerts.is_empty() {
            let mut history = self.alerts.write();
            history.extend(alerts.iter().cloned());
            while history.len() > self.config.max_alert_history {
                history.pop_front();
            }
        }
        alerts
    }

    fn detect_schemes(&self, batch: &DetectionBatch<'_>) -> Vec<PatternAlert> {
        let registry = self.registry.read().clone();
        let mut detected: Vec<(SchemeId, PatternAlert)> = Vec::new();

        for scheme in self.schemes.read().iter() {
            let Some(outcomes) = run_detectors(&registry, scheme, batch) else {
                continue;
            };
            if outcomes.is_empty() || !outcomes.iter().all(|o| o.matched) {
                continue;
            }

            let matched_ratio = 1.0;
            let (claim_ids, claimant_ids) = union_affected(&outcomes);
            debug!(scheme_id = %scheme.id, affected = claim_ids.len(), "Scheme detected");

            detected.push((
                scheme.id.clone(),
                PatternAlert {
                    id: AlertId::new_v7(),
                    scheme_id: scheme.id.clone(),
                    scheme_name: scheme.name.clone(),
                    severity: scheme.severity.as_risk_level(),
                    confidence: scheme.confidence(matched_ratio),
                    affected_claim_ids: claim_ids,
                    affected_claimant_ids: claimant_ids,
                    action_items: scheme.action_items(),
                    detected_at: batch.now,
                },
            ));
        }

        if !detected.is_empty() {
            let mut schemes = self.schemes.write();
            for (id, alert) in &detected {
                if let Some(scheme) = schemes.iter_mut().find(|s| &s.id == id) {
                    scheme.occurrences += 1;
                    scheme.last_detected = Some(alert.detected_at);
                }
            }
        }

        detected.into_iter().map(|(_, alert)| alert).collect()
    }

    /// Records qualifying clusters as emerging patterns; returns how many were new
    fn track_emerging(&self, clusters: &[Cluster], now: DateTime<Utc>) -> usize {
        let qualifying: Vec<&Cluster> = clusters
            .iter()
            .filter(|c| {
                c.suspicious_score > self.config.emerging_min_score
                    && c.size() >= self.config.emerging_min_members
            })
            .collect();
        if qualifying.is_empty() {
            return 0;
        }

        let mut emerging = self.emerging.write();
        let mut seen = HashSet::new();
        let mut created = 0;
        for cluster in qualifying {
            let signature = cluster.signature();
            if !seen.insert(signature.clone()) {
                continue;
            }
            match emerging.values_mut().find(|p| p.signature == signature) {
                Some(pattern) => pattern.observe(cluster, now),
                None => {
                    let pattern = EmergingPattern::from_cluster(cluster, now);
                    debug!(pattern_id = %pattern.id, %signature, "Emerging pattern recorded");
                    emerging.insert(pattern.id.clone(), pattern);
                    created += 1;
                }
            }
        }
        created
    }

    // ------------------------------------------------------------------
    // Feedback and maintenance
    // ------------------------------------------------------------------

    /// Queues a confirmed or refuted case outcome for a scheme
    pub fn record_outcome(&self, scheme_id: &SchemeId, was_fraud: bool) -> PatternResult<()> {
        if !self.schemes.read().iter().any(|s| &s.id == scheme_id) {
            return Err(PatternError::SchemeNotFound(scheme_id.clone()));
        }
        self.feedback.lock().push((scheme_id.clone(), was_fraud));
        Ok(())
    }

    /// Folds queued outcomes into success rates, promotes emerging patterns
    /// and expires those left unseen for too many passes
    pub fn run_maintenance(&self) -> MaintenanceReport {
        let pending = std::mem::take(&mut *self.feedback.lock());
        let mut report = MaintenanceReport {
            outcomes_applied: pending.len(),
            ..Default::default()
        };

        let promotable: Vec<EmergingPattern> = {
            let mut emerging = self.emerging.write();
            let ids: Vec<PatternId> = emerging
                .values()
                .filter(|p| {
                    p.observations >= self.config.promotion_min_observations
                        && p.suspicious_score > self.config.promotion_min_score
                })
                .map(|p| p.id.clone())
                .collect();
            let promotable = ids.iter().filter_map(|id| emerging.remove(id)).collect();

            let max_idle = self.config.emerging_max_idle_passes;
            emerging.retain(|id, pattern| {
                pattern.idle_passes += 1;
                let keep = pattern.idle_passes <= max_idle;
                if !keep {
                    debug!(pattern_id = %id, signature = %pattern.signature, "Emerging pattern expired");
                    report.expired.push(id.clone());
                }
                keep
            });
            promotable
        };

        let mut schemes = self.schemes.write();
        for (scheme_id, was_fraud) in pending {
            match schemes.iter_mut().find(|s| s.id == scheme_id) {
                Some(scheme) => scheme.record_outcome(was_fraud, self.config.feedback_weight),
                None => warn!(%scheme_id, "Outcome for unknown scheme dropped"),
            }
        }

        for pattern in promotable {
            let mut scheme = FraudScheme::new(
                format!("PROMOTED_{}", pattern.id),
                format!("Emerging {} cluster", pattern.kind),
                Severity::Warning,
                &[ALWAYS_TRUE],
                self.config.promoted_success_rate,
            )
            .with_description(format!("Promoted from emerging pattern {}", pattern.signature))
            .with_actions(&["Review promoted pattern definition"]);
            scheme.promoted_from = Some(pattern.id.clone());

            info!(scheme_id = %scheme.id, pattern_id = %pattern.id, "Emerging pattern promoted");
            report.promoted.push(scheme.id.clone());
            schemes.push(scheme);
        }

        report
    }

    // ------------------------------------------------------------------
    // Catalog and read views
    // ------------------------------------------------------------------

    /// Adds a scheme; every detector it names must be registered
    pub fn add_scheme(&self, scheme: FraudScheme) -> PatternResult<()> {
        {
            let registry = self.registry.read();
            if let Some(missing) = scheme.detectors.iter().find(|d| !registry.contains(d)) {
                return Err(PatternError::UnknownDetector {
                    scheme: scheme.id.clone(),
                    detector: missing.clone(),
                });
            }
        }
        let mut schemes = self.schemes.write();
        if schemes.iter().any(|s| s.id == scheme.id) {
            return Err(PatternError::DuplicateScheme(scheme.id));
        }
        schemes.push(scheme);
        Ok(())
    }

    pub fn register_detector(&self, detector: std::sync::Arc<dyn SchemeDetector>) {
        self.registry.write().register(detector);
    }

    pub fn schemes(&self) -> Vec<FraudScheme> {
        self.schemes.read().clone()
    }

    pub fn scheme(&self, id: &SchemeId) -> Option<FraudScheme> {
        self.schemes.read().iter().find(|s| &s.id == id).cloned()
    }

    pub fn emerging_patterns(&self) -> Vec<EmergingPattern> {
        let mut patterns: Vec<_> = self.emerging.read().values().cloned().collect();
        patterns.sort_by(|a, b| a.first_seen.cmp(&b.first_seen));
        patterns
    }

    /// Most recent alerts, oldest first
    pub fn recent_alerts(&self) -> Vec<PatternAlert> {
        self.alerts.read().iter().cloned().collect()
    }
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

/// Runs a scheme's detectors; `None` if any detector is not registered
fn run_detectors(
    registry: &DetectorRegistry,
    scheme: &FraudScheme,
    batch: &DetectionBatch<'_>,
) -> Option<Vec<DetectorOutcome>> {
    let mut outcomes = Vec::with_capacity(scheme.detectors.len());
    for name in &scheme.detectors {
        let Some(detector) = registry.get(name) else {
            warn!(scheme_id = %scheme.id, detector = %name, "Scheme skipped: detector not registered");
            return None;
        };
        let outcome = detector.evaluate(batch);
        if !outcome.matched {
            return Some(vec![outcome]);
        }
        outcomes.push(outcome);
    }
    Some(outcomes)
}

fn union_affected(outcomes: &[DetectorOutcome]) -> (Vec<ClaimId>, Vec<ClaimantId>) {
    let mut claim_ids: Vec<ClaimId> = Vec::new();
    let mut claimant_ids: Vec<ClaimantId> = Vec::new();
    for outcome in outcomes {
        for id in &outcome.claim_ids {
            if !claim_ids.contains(id) {
                claim_ids.push(id.clone());
            }
        }
        for id in &outcome.claimant_ids {
            if !claimant_ids.contains(id) {
                claimant_ids.push(id.clone());
            }
        }
    }
    (claim_ids, claimant_ids)
}
