//! Case manager
//!
//! Owns the case set, the audit trail and the alert list, each behind its own
//! lock. Locks are never held across one another or across an `.await`.

use chrono::{DateTime, Datelike, Utc};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use core_kernel::{AlertId, CaseId, ClaimantId, EvidenceId, NoteId, RiskLevel};
use domain_claims::{Claim, ClaimantProfile, RiskAssessmentResult};

use crate::alert::{AlertStatus, AlertType, SystemAlert};
use crate::audit::{AuditAction, AuditTrailEntry};
use crate::case::{CasePriority, CaseStatus, CaseType, FraudCase};
use crate::config::CaseConfig;
use crate::crossmatch::{CrossMatchPort, CrossMatchQuery, CrossMatchResult, MatchType};
use crate::error::{CaseError, CaseResult};
use crate::evidence::{EvidenceItem, EvidenceType};
use crate::note::{InvestigationNote, NoteType, SYSTEM_AUTHOR};
use crate::report::CaseReport;

/// Fraud case lifecycle management
pub struct CaseManager {
    config: CaseConfig,
    cross_match: Arc<dyn CrossMatchPort>,
    cases: RwLock<BTreeMap<CaseId, FraudCase>>,
    audit: RwLock<Vec<AuditTrailEntry>>,
    alerts: RwLock<Vec<SystemAlert>>,
    sequence: AtomicU64,
    /// Round-robin position per risk level, indexed by rank
    cursors: Mutex<[usize; 5]>,
}

impl CaseManager {
    pub fn new(config: CaseConfig, cross_match: Arc<dyn CrossMatchPort>) -> Self {
        if !config.investigator_pools.senior_pools_disjoint() {
            warn!("Critical and high investigator pools overlap");
        }
        Self {
            config,
            cross_match,
            cases: RwLock::new(BTreeMap::new()),
            audit: RwLock::new(Vec::new()),
            alerts: RwLock::new(Vec::new()),
            sequence: AtomicU64::new(0),
            cursors: Mutex::new([0; 5]),
        }
    }

    pub fn config(&self) -> &CaseConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Case lifecycle
    // ------------------------------------------------------------------

    /// Opens a new case for an assessment
    ///
    /// Every call opens a distinct case; one case per triggering event.
    /// Fails without side effects when the potential loss overflows.
    pub fn create_case(&self, assessment: &RiskAssessmentResult, claim: &Claim) -> CaseResult<FraudCase> {
        let potential_loss = claim
            .weekly_benefit_amount
            .checked_mul(Decimal::from(self.config.potential_loss_weeks))
            .ok_or_else(|| {
                CaseError::InvalidAmount(format!(
                    "potential loss overflows for weekly amount {}",
                    claim.weekly_benefit_amount
                ))
            })?;
        let now = Utc::now();
        let factor_names: Vec<&str> = assessment.risk_factors.iter().map(|f| f.name.as_str()).collect();
        let priority = CasePriority::from(assessment.risk_level);
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let mut case = FraudCase {
            case_id: CaseId::new_v7(),
            case_number: format!("FC-{}-{:06}", now.year(), sequence),
            case_type: CaseType::from_factor_names(&factor_names),
            priority,
            status: CaseStatus::Open,
            claimant_id: assessment.claimant_id.clone(),
            related_claim_ids: vec![claim.claim_id.clone()],
            fraud_score: assessment.overall_risk_score,
            potential_loss,
            actual_loss: Decimal::ZERO,
            recovered_amount: Decimal::ZERO,
            assigned_investigator: self.next_investigator(assessment.risk_level),
            notes: Vec::new(),
            evidence: Vec::new(),
            rules_triggered: assessment.triggered_rules.clone(),
            created_date: now,
            modified_date: now,
            closure_date: None,
            closure_reason: None,
        };
        case.notes.push(InvestigationNote::system(
            NoteType::System,
            format!(
                "Case opened from assessment {} with risk score {:.0} ({})",
                assessment.assessment_id, assessment.overall_risk_score, assessment.risk_level
            ),
        ));

        self.cases.write().insert(case.case_id, case.clone());
        self.record_audit(
            AuditTrailEntry::new(case.case_id, AuditAction::CaseCreated, SYSTEM_AUTHOR)
                .with_change(None, Some(case.case_number.clone())),
        );

        if matches!(priority, CasePriority::High | CasePriority::Critical) {
            self.raise_alert(
                SystemAlert::new(
                    AlertType::HighRiskCase,
                    assessment.risk_level,
                    format!("{} priority fraud case opened", assessment.risk_level),
                    format!("Case {} opened for claim {}", case.case_number, claim.claim_id),
                )
                .for_case(case.case_id),
            );
        }

        info!(
            case_id = %case.case_id,
            case_number = %case.case_number,
            case_type = ?case.case_type,
            priority = ?case.priority,
            investigator = case.assigned_investigator.as_deref().unwrap_or("-"),
            "Fraud case created"
        );
        Ok(case)
    }

    /// Moves a case through its lifecycle
    pub fn update_status(
        &self,
        case_id: &CaseId,
        status: CaseStatus,
        actor: &str,
        reason: Option<String>,
    ) -> CaseResult<FraudCase> {
        let (previous, updated) = {
            let mut cases = self.cases.write();
            let case = cases.get_mut(case_id).ok_or(CaseError::CaseNotFound(*case_id))?;
            let previous = case.status;
            let now = Utc::now();
            case.transition(status, reason.clone(), now)?;

            let mut content = format!("Status changed from {previous} to {status}");
            if let Some(reason) = &reason {
                content.push_str(": ");
                content.push_str(reason);
            }
            case.notes.push(InvestigationNote::new(actor, NoteType::StatusChange, content));
            (previous, case.clone())
        };

        self.record_audit(
            AuditTrailEntry::new(*case_id, AuditAction::StatusChanged, actor)
                .with_change(Some(previous.to_string()), Some(status.to_string())),
        );
        info!(case_id = %case_id, from = %previous, to = %status, "Case status updated");
        Ok(updated)
    }

    pub fn add_note(&self, case_id: &CaseId, author: &str, content: impl Into<String>) -> CaseResult<NoteId> {
        let note = InvestigationNote::new(author, NoteType::Investigator, content);
        let note_id = note.note_id;
        self.with_case(case_id, |case| {
            case.notes.push(note);
            Ok(())
        })?;
        self.record_audit(AuditTrailEntry::new(*case_id, AuditAction::NoteAdded, author));
        Ok(note_id)
    }

    /// Attaches evidence with a seeded custody chain and a correlated note
    pub fn add_evidence(
        &self,
        case_id: &CaseId,
        evidence_type: EvidenceType,
        description: impl Into<String>,
        collected_by: &str,
    ) -> CaseResult<EvidenceId> {
        let item = EvidenceItem::collect(evidence_type, description, collected_by);
        let evidence_id = item.evidence_id;
        let note = InvestigationNote::new(
            collected_by,
            NoteType::Evidence,
            format!("Evidence {} collected: {}", evidence_id, item.description),
        );
        self.with_case(case_id, |case| {
            if case.is_closed() {
                return Err(CaseError::CaseClosed(case.case_id));
            }
            case.evidence.push(item);
            case.notes.push(note);
            Ok(())
        })?;
        self.record_audit(
            AuditTrailEntry::new(*case_id, AuditAction::EvidenceAdded, collected_by)
                .with_change(None, Some(evidence_id.to_string())),
        );
        Ok(evidence_id)
    }

    /// Appends a custody hand-off to an evidence item
    pub fn transfer_custody(
        &self,
        case_id: &CaseId,
        evidence_id: &EvidenceId,
        from: &str,
        to: &str,
        purpose: &str,
    ) -> CaseResult<()> {
        self.with_case(case_id, |case| {
            case.evidence_item_mut(evidence_id)?
                .transfer(from, to, purpose, Utc::now())
        })?;
        self.record_audit(
            AuditTrailEntry::new(*case_id, AuditAction::CustodyTransferred, from)
                .with_change(Some(from.to_string()), Some(to.to_string())),
        );
        Ok(())
    }

    /// Assigns an investigator; `None` draws from the pool for the case priority
    pub fn assign_investigator(&self, case_id: &CaseId, investigator: Option<&str>) -> CaseResult<String> {
        let priority = self
            .cases
            .read()
            .get(case_id)
            .map(|c| c.priority)
            .ok_or(CaseError::CaseNotFound(*case_id))?;
        let investigator = match investigator {
            Some(name) => name.to_string(),
            None => self
                .next_investigator(priority.risk_level())
                .ok_or_else(|| CaseError::NoInvestigatorAvailable(priority.risk_level().to_string()))?,
        };

        let previous = self.with_case(case_id, |case| {
            Ok(case.assigned_investigator.replace(investigator.clone()))
        })?;
        self.record_audit(
            AuditTrailEntry::new(*case_id, AuditAction::InvestigatorAssigned, SYSTEM_AUTHOR)
                .with_change(previous, Some(investigator.clone())),
        );
        Ok(investigator)
    }

    /// Records the established loss and the amount recovered so far
    pub fn record_recovery(
        &self,
        case_id: &CaseId,
        actual_loss: Decimal,
        recovered: Decimal,
        actor: &str,
    ) -> CaseResult<()> {
        if actual_loss.is_sign_negative() || recovered.is_sign_negative() {
            return Err(CaseError::InvalidAmount("amounts must not be negative".into()));
        }
        if recovered > actual_loss {
            return Err(CaseError::InvalidAmount(format!(
                "recovered {recovered} exceeds actual loss {actual_loss}"
            )));
        }
        self.with_case(case_id, |case| {
            case.actual_loss = actual_loss;
            case.recovered_amount = recovered;
            Ok(())
        })?;
        self.record_audit(
            AuditTrailEntry::new(*case_id, AuditAction::RecoveryRecorded, actor)
                .with_change(None, Some(format!("{recovered}/{actual_loss}"))),
        );
        Ok(())
    }

    fn with_case<T>(&self, case_id: &CaseId, f: impl FnOnce(&mut FraudCase) -> CaseResult<T>) -> CaseResult<T> {
        let mut cases = self.cases.write();
        let case = cases.get_mut(case_id).ok_or(CaseError::CaseNotFound(*case_id))?;
        let value = f(case)?;
        case.modified_date = Utc::now();
        Ok(value)
    }

    fn next_investigator(&self, level: RiskLevel) -> Option<String> {
        let pool = self.config.investigator_pools.for_level(level);
        if pool.is_empty() {
            return None;
        }
        let mut cursors = self.cursors.lock();
        let cursor = &mut cursors[usize::from(level.rank())];
        let name = pool[*cursor % pool.len()].clone();
        *cursor = cursor.wrapping_add(1);
        Some(name)
    }

    fn record_audit(&self, entry: AuditTrailEntry) {
        self.audit.write().push(entry);
    }

    // ------------------------------------------------------------------
    // Cross-matching
    // ------------------------------------------------------------------

    /// Looks the claimant up in other systems; an unavailable service yields no matches
    pub async fn cross_match(&self, claimant: &ClaimantProfile) -> Vec<CrossMatchResult> {
        let query = CrossMatchQuery::from(claimant);
        match self.cross_match.find_matches(&query, &MatchType::ALL).await {
            Ok(matches) => matches,
            Err(error) => {
                warn!(claimant_id = %claimant.claimant_id, %error, "Cross-match unavailable, continuing without matches");
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Alerts
    // ------------------------------------------------------------------

    pub fn create_alert(
        &self,
        alert_type: AlertType,
        severity: RiskLevel,
        title: impl Into<String>,
        message: impl Into<String>,
        case_id: Option<CaseId>,
    ) -> AlertId {
        let mut alert = SystemAlert::new(alert_type, severity, title, message);
        alert.case_id = case_id;
        self.raise_alert(alert)
    }

    fn raise_alert(&self, alert: SystemAlert) -> AlertId {
        let alert_id = alert.alert_id;
        warn!(alert_id = %alert_id, severity = %alert.severity, title = %alert.title, "System alert raised");
        self.alerts.write().push(alert);
        alert_id
    }

    pub fn acknowledge_alert(&self, alert_id: &AlertId, by: &str) -> CaseResult<()> {
        self.transition_alert(alert_id, AlertStatus::Acknowledged, by)
    }

    pub fn resolve_alert(&self, alert_id: &AlertId, by: &str) -> CaseResult<()> {
        self.transition_alert(alert_id, AlertStatus::Resolved, by)
    }

    pub fn dismiss_alert(&self, alert_id: &AlertId, by: &str) -> CaseResult<()> {
        self.transition_alert(alert_id, AlertStatus::Dismissed, by)
    }

    fn transition_alert(&self, alert_id: &AlertId, status: AlertStatus, by: &str) -> CaseResult<()> {
        let mut alerts = self.alerts.write();
        let alert = alerts
            .iter_mut()
            .find(|a| &a.alert_id == alert_id)
            .ok_or(CaseError::AlertNotFound(*alert_id))?;
        alert.transition(status, by)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn case(&self, case_id: &CaseId) -> Option<FraudCase> {
        self.cases.read().get(case_id).cloned()
    }

    /// All cases, oldest first
    pub fn cases(&self) -> Vec<FraudCase> {
        self.cases.read().values().cloned().collect()
    }

    pub fn cases_by_status(&self, status: CaseStatus) -> Vec<FraudCase> {
        self.filter_cases(|c| c.status == status)
    }

    pub fn cases_by_investigator(&self, investigator: &str) -> Vec<FraudCase> {
        self.filter_cases(|c| c.assigned_investigator.as_deref() == Some(investigator))
    }

    pub fn cases_for_claimant(&self, claimant_id: &ClaimantId) -> Vec<FraudCase> {
        self.filter_cases(|c| &c.claimant_id == claimant_id)
    }

    /// Open cases ordered CRITICAL first, oldest first within a priority
    pub fn cases_by_priority(&self) -> Vec<FraudCase> {
        let mut cases = self.filter_cases(|c| !c.is_closed());
        cases.sort_by(|a, b| {
            b.priority
                .rank()
                .cmp(&a.priority.rank())
                .then(a.created_date.cmp(&b.created_date))
        });
        cases
    }

    fn filter_cases(&self, predicate: impl Fn(&FraudCase) -> bool) -> Vec<FraudCase> {
        self.cases.read().values().filter(|c| predicate(c)).cloned().collect()
    }

    pub fn audit_trail(&self, case_id: &CaseId) -> Vec<AuditTrailEntry> {
        self.audit.read().iter().filter(|e| &e.case_id == case_id).cloned().collect()
    }

    pub fn alerts(&self) -> Vec<SystemAlert> {
        self.alerts.read().clone()
    }

    pub fn open_alerts(&self) -> Vec<SystemAlert> {
        self.alerts.read().iter().filter(|a| a.is_open()).cloned().collect()
    }

    pub fn report(&self, now: DateTime<Utc>) -> CaseReport {
        let alerts = self.alerts.read().clone();
        CaseReport::build(self.cases.read().values(), &alerts, now)
    }
}
