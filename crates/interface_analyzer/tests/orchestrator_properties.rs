//! Property tests for the orchestrator's final assessment

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;

use core_kernel::{ClaimantId, RiskLevel};
use domain_cases::crossmatch::mock::{ExternalRecord, MockCrossMatch};
use domain_cases::SourceType;
use domain_claims::Address;
use domain_rules::ports::mock::MockFactLookup;
use interface_analyzer::oracle::mock::MockScoringOracle;
use interface_analyzer::{AnalyzerConfig, AnalyzerPorts, ClaimAnalysis, EnterpriseAnalyzer, LegacyClaimRecord};

const SOURCES: [SourceType; 3] = [
    SourceType::StateWageRecords,
    SourceType::OtherStateClaims,
    SourceType::NewHireRegistry,
];

#[derive(Debug, Clone)]
struct Signals {
    ssn_usage: u32,
    deceased: bool,
    velocity: u32,
    industry_wage: Option<f64>,
    matches: usize,
    justification: Option<&'static str>,
    claim_amount: f64,
}

fn signals_strategy() -> impl Strategy<Value = Signals> {
    (
        0u32..4,
        any::<bool>(),
        0u32..6,
        proptest::option::of(50.0f64..900.0),
        0usize..=3,
        prop_oneof![
            Just(None),
            Just(Some("Laid off after the warehouse closed")),
            Just(Some("urgent need cash fast, please expedite, no questions")),
        ],
        0.0f64..2000.0,
    )
        .prop_map(
            |(ssn_usage, deceased, velocity, industry_wage, matches, justification, claim_amount)| Signals {
                ssn_usage,
                deceased,
                velocity,
                industry_wage,
                matches,
                justification,
                claim_amount,
            },
        )
}

fn analyze(signals: &Signals) -> ClaimAnalysis {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let facts = Arc::new(MockFactLookup::new());
        let cross_match = Arc::new(MockCrossMatch::new());
        let ports = AnalyzerPorts {
            facts: facts.clone(),
            cross_match: cross_match.clone(),
            oracle: Some(Arc::new(MockScoringOracle::new())),
        };
        let analyzer = EnterpriseAnalyzer::new(&AnalyzerConfig::default(), ports);

        facts.set_ssn_usage("ssn-p", signals.ssn_usage).await;
        facts.set_claim_velocity(ClaimantId::new("CLT-P"), signals.velocity).await;
        if signals.deceased {
            facts.mark_deceased("ssn-p").await;
        }
        if let Some(wage) = signals.industry_wage {
            facts.set_industry_wage("4841", wage).await;
        }
        for (n, source_type) in SOURCES.iter().take(signals.matches).enumerate() {
            cross_match
                .add_record(ExternalRecord {
                    record_id: format!("EXT-{n}"),
                    source_type: *source_type,
                    ssn_ref: "ssn-p".to_string(),
                    full_name: "Unrelated Person".to_string(),
                    address: Address::default(),
                })
                .await;
        }

        let record = LegacyClaimRecord {
            claim_id: Some("CLM-P".to_string()),
            claimant_id: Some("CLT-P".to_string()),
            claimant_name: Some("Robin Vale".to_string()),
            ssn_ref: Some("ssn-p".to_string()),
            employer_name: Some("Harbor Freight Lines".to_string()),
            industry_code: Some("4841".to_string()),
            wage_reported: Some(600.0),
            claim_amount: Some(signals.claim_amount),
            claim_date: NaiveDate::from_ymd_opt(2026, 3, 2),
            justification: signals.justification.map(str::to_string),
            ..Default::default()
        };
        analyzer.analyze(&record).await
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn auto_approval_implies_low_and_unblocked(signals in signals_strategy()) {
        let assessment = analyze(&signals).assessment;
        if assessment.auto_approval_eligible {
            prop_assert_eq!(assessment.risk_level, RiskLevel::Low);
            prop_assert!(!assessment.blocked);
        }
    }

    #[test]
    fn level_follows_final_score(signals in signals_strategy()) {
        let analysis = analyze(&signals);
        let assessment = &analysis.assessment;
        prop_assert!(!assessment.is_fallback());
        prop_assert_eq!(
            assessment.risk_level,
            RiskLevel::from_score(assessment.overall_risk_score, assessment.blocked)
        );
        prop_assert_eq!(analysis.case.is_some(), assessment.requires_investigation);
        if signals.deceased {
            prop_assert_eq!(assessment.risk_level, RiskLevel::Critical);
        }
    }
}
