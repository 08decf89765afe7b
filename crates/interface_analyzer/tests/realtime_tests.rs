//! Real-time scoring and pipeline tests built from shared fixtures

use core_kernel::RiskLevel;
use domain_claims::VerificationStatus;
use interface_analyzer::{AdaptedClaim, AnalyzerConfig, AnalyzerPorts, EnterpriseAnalyzer};
use test_utils::{
    assert_approval_consistent, assert_has_factor, assert_lacks_factor, assert_risk_level, assert_score,
    AmountFixtures, ClaimBuilder, ClaimantBuilder, ContextFixtures, EmployerBuilder, SessionFixtures,
    StringFixtures,
};

fn analyzer() -> EnterpriseAnalyzer {
    EnterpriseAnalyzer::new(&AnalyzerConfig::default(), AnalyzerPorts::offline())
}

fn adapted(n: u32) -> AdaptedClaim {
    AdaptedClaim {
        claim: ClaimBuilder::new().numbered(n).build(),
        claimant: ClaimantBuilder::new().numbered(n).build(),
        employer: Some(EmployerBuilder::new().build()),
        context: ContextFixtures::with_wage(AmountFixtures::reported_wage(), 450.0),
    }
}

// ============================================================================
// Behavioral Scoring
// ============================================================================

mod behavioral_tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_session_after_history_is_flagged() {
        let analyzer = analyzer();
        for _ in 0..2 {
            let mut claim = adapted(1);
            claim.context = claim.context.with_session(SessionFixtures::typical("device-a"));
            let result = analyzer.score_realtime(&claim).await;
            assert_lacks_factor(&result, "RTS-BEHAVIORAL");
        }

        let mut claim = adapted(1);
        claim.context = claim.context.with_session(SessionFixtures::scripted("device-b"));
        let result = analyzer.score_realtime(&claim).await;

        // typing 25 + duration 20 + location 35
        assert_has_factor(&result, "RTS-BEHAVIORAL");
        assert_score(&result, 80.0);
        assert_risk_level(&result, RiskLevel::Medium);
        assert_approval_consistent(&result);
    }

    #[tokio::test]
    async fn test_first_sessions_score_nothing() {
        let analyzer = analyzer();
        let mut claim = adapted(2);
        claim.context = claim.context.with_session(SessionFixtures::scripted("device-x"));

        let result = analyzer.score_realtime(&claim).await;

        assert_score(&result, 0.0);
        assert_eq!(analyzer.scorer().session_count(&claim.claimant.claimant_id), 1);
    }
}

// ============================================================================
// Pipeline With Builders
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_disposable_email_and_failed_identity() {
        let analyzer = analyzer();
        let mut claim = adapted(3);
        claim.claimant = ClaimantBuilder::new()
            .numbered(3)
            .with_email(StringFixtures::disposable_email())
            .with_verification(VerificationStatus::Failed)
            .build();

        let analysis = analyzer.analyze_claim(&claim).await;

        // Suspicious email 40 + failed identity 30
        assert_score(&analysis.assessment, 70.0);
        assert_risk_level(&analysis.assessment, RiskLevel::Medium);
        let case = analysis.case.expect("failed identity requires verification");
        assert_eq!(case.claimant_id, claim.claimant.claimant_id);
    }

    #[tokio::test]
    async fn test_high_risk_employer_contributes() {
        let analyzer = analyzer();
        let mut claim = adapted(4);
        claim.employer = Some(EmployerBuilder::new().with_risk_level(RiskLevel::High).build());

        let analysis = analyzer.analyze_claim(&claim).await;

        assert_score(&analysis.assessment, 35.0);
        assert!(analysis.case.is_none());
    }

    #[tokio::test]
    async fn test_claim_far_above_wage() {
        let analyzer = analyzer();
        let mut claim = adapted(5);
        claim.context = ContextFixtures::with_wage(600.0, 2500.0);

        let analysis = analyzer.analyze_claim(&claim).await;

        // 2500 / 600 = 4.17
        assert_score(&analysis.assessment, 30.0);
        assert_risk_level(&analysis.assessment, RiskLevel::Low);
    }
}
