//! Integration tests for the enterprise analyzer pipeline

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use core_kernel::{PatternId, RiskLevel};
use domain_cases::crossmatch::mock::{ExternalRecord, MockCrossMatch};
use domain_cases::{AlertType, CasePriority, SourceType};
use domain_claims::{Address, RiskCategory};
use domain_patterns::scheme::IDENTITY_RING;
use domain_rules::ports::mock::MockFactLookup;
use domain_scoring::patterns::NEW_ACCOUNT_HIGH_BENEFIT;
use interface_analyzer::analyzer::{AI_FACTOR, CROSS_MATCH_FACTOR};
use interface_analyzer::oracle::mock::MockScoringOracle;
use interface_analyzer::{
    AnalyzerConfig, AnalyzerPorts, BatchSummary, EnterpriseAnalyzer, LegacyClaimRecord,
    MaintenanceScheduler,
};

struct Harness {
    analyzer: EnterpriseAnalyzer,
    facts: Arc<MockFactLookup>,
    cross_match: Arc<MockCrossMatch>,
    oracle: Arc<MockScoringOracle>,
}

fn harness_with(config: AnalyzerConfig) -> Harness {
    let facts = Arc::new(MockFactLookup::new());
    let cross_match = Arc::new(MockCrossMatch::new());
    let oracle = Arc::new(MockScoringOracle::new());
    let ports = AnalyzerPorts {
        facts: facts.clone(),
        cross_match: cross_match.clone(),
        oracle: Some(oracle.clone()),
    };
    Harness {
        analyzer: EnterpriseAnalyzer::new(&config, ports),
        facts,
        cross_match,
        oracle,
    }
}

fn harness() -> Harness {
    harness_with(AnalyzerConfig::default())
}

fn record(id: &str) -> LegacyClaimRecord {
    LegacyClaimRecord {
        claim_id: Some(format!("CLM-{id}")),
        claimant_id: Some(format!("CLT-{id}")),
        claimant_name: Some("Pat Rivera".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 4, 12),
        ssn_ref: Some(format!("ssn-{id}")),
        email: Some("pat.rivera@example.com".to_string()),
        phone: Some("555-0100".to_string()),
        employer_name: Some("Acme Logistics".to_string()),
        employment_status: Some("LAID_OFF".to_string()),
        wage_reported: Some(600.0),
        claim_amount: Some(450.0),
        claim_date: NaiveDate::from_ymd_opt(2026, 3, 2),
        ..Default::default()
    }
}

fn external(record_id: &str, ssn_ref: &str, source_type: SourceType) -> ExternalRecord {
    ExternalRecord {
        record_id: record_id.to_string(),
        source_type,
        ssn_ref: ssn_ref.to_string(),
        full_name: "Unrelated Person".to_string(),
        address: Address::default(),
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_clean_claim_is_auto_approvable() {
        let h = harness();

        let analysis = h.analyzer.analyze(&record("1")).await;

        assert_eq!(analysis.assessment.overall_risk_score, 0.0);
        assert_eq!(analysis.assessment.risk_level, RiskLevel::Low);
        assert!(analysis.assessment.auto_approval_eligible);
        assert!(analysis.case.is_none());
        assert!(h.analyzer.cases().cases().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_ssn_scores_medium() {
        let h = harness();
        h.facts.set_ssn_usage("ssn-2", 2).await;

        let analysis = h.analyzer.analyze(&record("2")).await;

        assert_eq!(analysis.assessment.overall_risk_score, 75.0);
        assert_eq!(analysis.assessment.risk_level, RiskLevel::Medium);
        assert!(!analysis.assessment.auto_approval_eligible);
        assert!(analysis.case.is_none());
    }

    #[tokio::test]
    async fn test_deceased_claimant_opens_critical_case() {
        let h = harness();
        h.facts.mark_deceased("ssn-3").await;

        let analysis = h.analyzer.analyze(&record("3")).await;

        assert!(analysis.assessment.blocked);
        assert_eq!(analysis.assessment.risk_level, RiskLevel::Critical);
        let case = analysis.case.expect("case opened");
        assert_eq!(case.priority, CasePriority::Critical);
        assert_eq!(case.related_claim_ids[0].as_str(), "CLM-3");
        assert!(h
            .analyzer
            .cases()
            .alerts()
            .iter()
            .any(|a| a.alert_type == AlertType::HighRiskCase && a.case_id == Some(case.case_id)));
    }

    #[tokio::test]
    async fn test_wage_ratio_uses_industry_average() {
        let h = harness();
        h.facts.set_industry_wage("4841", 200.0).await;
        let mut rec = record("4");
        rec.industry_code = Some("4841".to_string());

        let analysis = h.analyzer.analyze(&rec).await;

        // 600 / 200 = 3.0, above the 2.5 ratio rule
        assert_eq!(analysis.assessment.overall_risk_score, 40.0);
    }

    #[tokio::test]
    async fn test_lookup_outage_degrades_to_defaults() {
        let h = harness();
        h.facts.mark_deceased("ssn-5").await;
        h.facts.set_unavailable(true).await;

        let analysis = h.analyzer.analyze(&record("5")).await;

        assert!(!analysis.assessment.is_fallback());
        assert_eq!(analysis.assessment.overall_risk_score, 0.0);
    }
}

// ============================================================================
// Text Signal Tests
// ============================================================================

mod text_signal_tests {
    use super::*;

    const SUSPICIOUS: &str = "Urgent, I was paid under the table, cash only";

    #[tokio::test]
    async fn test_justification_adds_weighted_likelihood() {
        let h = harness();
        let mut rec = record("10");
        rec.justification = Some(SUSPICIOUS.to_string());

        let analysis = h.analyzer.analyze(&rec).await;

        assert_eq!(analysis.assessment.overall_risk_score, 75.0);
        let factor = analysis
            .assessment
            .risk_factors
            .iter()
            .find(|f| f.id == AI_FACTOR)
            .expect("text factor");
        assert_eq!(factor.category, RiskCategory::AiAnalysis);
        assert_eq!(factor.impact, 75.0);
    }

    #[tokio::test]
    async fn test_contribution_capped_at_configured_total() {
        let mut config = AnalyzerConfig::default();
        config.orchestrator.ai_score_cap = 100.0;
        let h = harness_with(config);
        h.facts.set_ssn_usage("ssn-11", 3).await;
        let mut rec = record("11");
        rec.justification = Some(SUSPICIOUS.to_string());

        let analysis = h.analyzer.analyze(&rec).await;

        // 75 from the rule, the 75-point text signal is capped to 25
        assert_eq!(analysis.assessment.overall_risk_score, 100.0);
        assert_eq!(analysis.assessment.risk_level, RiskLevel::High);
    }

    #[tokio::test]
    async fn test_no_headroom_adds_no_factor() {
        let mut config = AnalyzerConfig::default();
        config.orchestrator.ai_score_cap = 50.0;
        let h = harness_with(config);
        h.facts.set_ssn_usage("ssn-12", 2).await;
        let mut rec = record("12");
        rec.justification = Some(SUSPICIOUS.to_string());

        let analysis = h.analyzer.analyze(&rec).await;

        assert_eq!(analysis.assessment.overall_risk_score, 75.0);
        assert!(analysis.assessment.risk_factors.iter().all(|f| f.id != AI_FACTOR));
    }

    #[tokio::test]
    async fn test_oracle_outage_is_not_fatal() {
        let h = harness();
        h.oracle.set_unavailable(true).await;
        let mut rec = record("13");
        rec.justification = Some(SUSPICIOUS.to_string());

        let analysis = h.analyzer.analyze(&rec).await;

        assert!(!analysis.assessment.is_fallback());
        assert_eq!(analysis.assessment.overall_risk_score, 0.0);
    }
}

// ============================================================================
// Cross-Match Tests
// ============================================================================

mod cross_match_tests {
    use super::*;

    #[tokio::test]
    async fn test_bonus_per_match_with_single_factor() {
        let h = harness();
        h.cross_match
            .add_record(external("WAGE-1", "ssn-20", SourceType::StateWageRecords))
            .await;
        h.cross_match
            .add_record(external("OSC-1", "ssn-20", SourceType::OtherStateClaims))
            .await;

        let analysis = h.analyzer.analyze(&record("20")).await;

        assert_eq!(analysis.cross_matches.len(), 2);
        assert_eq!(analysis.assessment.overall_risk_score, 50.0);
        let factors: Vec<_> = analysis
            .assessment
            .risk_factors
            .iter()
            .filter(|f| f.id == CROSS_MATCH_FACTOR)
            .collect();
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].evidence.len(), 2);
    }

    #[tokio::test]
    async fn test_final_level_escalates_past_rule_level() {
        let h = harness();
        h.facts
            .set_claim_velocity(core_kernel::ClaimantId::new("CLT-21"), 4)
            .await;
        h.cross_match
            .add_record(external("WAGE-2", "ssn-21", SourceType::StateWageRecords))
            .await;
        h.cross_match
            .add_record(external("NH-2", "ssn-21", SourceType::NewHireRegistry))
            .await;

        let analysis = h.analyzer.analyze(&record("21")).await;

        // Velocity rule alone gives 50 (MEDIUM); two matches lift it to 100
        assert_eq!(analysis.assessment.overall_risk_score, 100.0);
        assert_eq!(analysis.assessment.risk_level, RiskLevel::High);
        let case = analysis.case.expect("verification rule requires investigation");
        assert_eq!(case.priority, CasePriority::High);
    }

    #[tokio::test]
    async fn test_cross_match_outage_is_not_fatal() {
        let h = harness();
        h.cross_match.set_unavailable(true).await;

        let analysis = h.analyzer.analyze(&record("22")).await;

        assert!(!analysis.assessment.is_fallback());
        assert!(analysis.cross_matches.is_empty());
    }
}

// ============================================================================
// Failure Isolation Tests
// ============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_claim_returns_fallback() {
        let h = harness();
        let mut rec = record("30");
        rec.claim_amount = Some(-100.0);

        let analysis = h.analyzer.analyze(&rec).await;

        assert!(analysis.assessment.is_fallback());
        assert_eq!(analysis.assessment.overall_risk_score, 0.0);
        assert_eq!(analysis.assessment.risk_level, RiskLevel::Low);
        assert!(analysis.assessment.requires_investigation);
        assert!(!analysis.assessment.auto_approval_eligible);
        assert_eq!(analysis.assessment.claim_id.as_str(), "CLM-30");
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let h = harness();
        let mut bad = record("31");
        bad.claim_amount = Some(-1.0);
        let records = vec![bad, record("32"), LegacyClaimRecord::default()];

        let results = h.analyzer.analyze_batch(&records).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].assessment.is_fallback());
        assert!(!results[1].assessment.is_fallback());
        assert!(results[2].assessment.claim_id.is_placeholder());

        let summary = BatchSummary::from_results(&results, &[]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.fallbacks, 1);
        assert_eq!(summary.by_level.get(&RiskLevel::Low), Some(&3));
    }

    #[tokio::test]
    async fn test_oversized_amount_is_isolated_in_batch() {
        let h = harness();
        let mut oversized = record("33");
        oversized.claim_amount = Some(5e27);
        let records = vec![record("34"), oversized, record("35")];

        let report = h.analyzer.run_batch(&records).await;

        assert_eq!(report.results.len(), 3);
        assert!(!report.results[0].assessment.is_fallback());
        assert!(report.results[1].assessment.is_fallback());
        assert_eq!(report.results[1].assessment.claim_id.as_str(), "CLM-33");
        assert!(report.results[1].assessment.requires_investigation);
        assert!(!report.results[2].assessment.is_fallback());
        assert_eq!(report.summary.fallbacks, 1);
    }

    #[tokio::test]
    async fn test_case_creation_failure_returns_fallback() {
        let mut config = AnalyzerConfig::default();
        config.cases.potential_loss_weeks = 100;
        let h = harness_with(config);
        h.facts.mark_deceased("ssn-36").await;
        let mut rec = record("36");
        rec.claim_amount = Some(1e27);

        let analysis = h.analyzer.analyze(&rec).await;

        assert!(analysis.assessment.is_fallback());
        assert!(analysis.case.is_none());
        assert!(h.analyzer.cases().cases().is_empty());
    }
}

// ============================================================================
// Batch Detection Tests
// ============================================================================

mod batch_tests {
    use super::*;

    #[tokio::test]
    async fn test_shared_ip_batch_raises_identity_ring() {
        let h = harness();
        let records: Vec<_> = (40..46)
            .map(|n| {
                let mut rec = record(&n.to_string());
                rec.ip_address = Some("203.0.113.5".to_string());
                rec
            })
            .collect();

        let report = h.analyzer.run_batch(&records).await;

        assert_eq!(report.summary.total, 6);
        let ring = report
            .pattern_alerts
            .iter()
            .find(|a| a.scheme_id.as_str() == IDENTITY_RING)
            .expect("identity ring alert");
        assert_eq!(ring.affected_claim_ids.len(), 6);
        assert_eq!(report.summary.pattern_alerts, report.pattern_alerts.len());
        assert!(h
            .analyzer
            .cases()
            .alerts()
            .iter()
            .any(|a| a.alert_type == AlertType::PatternDetected));
    }

    #[tokio::test]
    async fn test_realtime_score_uses_adapted_claim() {
        let h = harness();
        let adapted = h.analyzer.adapt(&record("50"));

        let result = h.analyzer.score_realtime(&adapted).await;

        assert_eq!(result.claim_id.as_str(), "CLM-50");
        assert!(result.overall_risk_score >= 0.0);
        assert_eq!(h.analyzer.scorer().processing_stats().total_processed, 1);
    }
}

// ============================================================================
// Maintenance Tests
// ============================================================================

mod maintenance_tests {
    use super::*;

    #[tokio::test]
    async fn test_scheduler_runs_scorer_maintenance() {
        let h = harness();
        let pattern_id = PatternId::new(NEW_ACCOUNT_HIGH_BENEFIT);
        h.analyzer.scorer().record_outcome(&pattern_id, true).unwrap();

        let scheduler = MaintenanceScheduler::start_with_intervals(
            h.analyzer.patterns().clone(),
            h.analyzer.scorer().clone(),
            Duration::from_millis(10),
            Duration::from_millis(10),
        );
        assert_eq!(scheduler.task_count(), 2);
        tokio::time::sleep(Duration::from_millis(200)).await;
        scheduler.shutdown();

        let pattern = h.analyzer.scorer().pattern(&pattern_id).unwrap();
        assert_eq!(pattern.weight, 52.0);
    }

    #[tokio::test]
    async fn test_disabled_scheduler_spawns_nothing() {
        let h = harness();
        let mut config = AnalyzerConfig::default();
        config.maintenance.enabled = false;

        let scheduler = MaintenanceScheduler::start(
            h.analyzer.patterns().clone(),
            h.analyzer.scorer().clone(),
            &config.maintenance,
        );
        assert_eq!(scheduler.task_count(), 0);
    }
}
