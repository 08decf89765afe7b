//! Comprehensive tests for domain_patterns

use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, ClaimantId, RiskLevel, SchemeId};
use domain_claims::{Claim, ClaimantProfile};
use domain_patterns::scheme::{IDENTITY_RING, SSN_SHARING, SYNTHETIC_IDENTITY};
use domain_patterns::{DetectionConfig, PatternEngine, PatternError};

/// Claims filed at irregular intervals so cadence analysis stays quiet
fn claims_from_ip(prefix: &str, count: usize, ip: Option<&str>) -> Vec<Claim> {
    let start = Utc::now() - Duration::days(3);
    (0..count)
        .map(|n| {
            let mut claim = Claim::new(
                ClaimId::new(format!("{prefix}-{n}")),
                ClaimantId::new(format!("{prefix}-C{n}")),
                dec!(420),
                dec!(10920),
            );
            claim.ip_address = ip.map(str::to_string);
            claim.created_date = start + Duration::minutes((n * n * 7) as i64);
            claim
        })
        .collect()
}

// ============================================================================
// Scheme Detection
// ============================================================================

mod scheme_tests {
    use super::*;

    #[test]
    fn test_identity_ring_returns_exactly_shared_ip_claims() {
        let engine = PatternEngine::default();
        let mut claims = claims_from_ip("RING", 6, Some("203.0.113.5"));
        claims.extend(claims_from_ip("OTHER", 3, Some("198.51.100.20")));

        let alerts = engine.detect(&claims, &[]);
        let ring = alerts
            .iter()
            .find(|a| a.scheme_id == SchemeId::new(IDENTITY_RING))
            .expect("identity ring detected");

        let expected: Vec<ClaimId> = (0..6).map(|n| ClaimId::new(format!("RING-{n}"))).collect();
        assert_eq!(ring.affected_claim_ids, expected);
        assert_eq!(ring.severity, RiskLevel::Critical);
        assert_eq!(ring.confidence, 0.9);
        assert!(!ring.action_items.is_empty());
    }

    #[test]
    fn test_five_shared_ip_claims_do_not_trigger() {
        let engine = PatternEngine::default();
        let claims = claims_from_ip("RING", 5, Some("203.0.113.5"));
        let alerts = engine.detect(&claims, &[]);
        assert!(alerts.iter().all(|a| a.scheme_id != SchemeId::new(IDENTITY_RING)));
    }

    #[test]
    fn test_synthetic_identity() {
        let engine = PatternEngine::default();
        let mut claimant = ClaimantProfile::new(ClaimantId::new("SYN-1"), "Casey", "Moore", "ssn-syn");
        claimant.set_risk_score(85).unwrap();
        claimant.account_created = Utc::now() - Duration::days(10);

        let mut established = ClaimantProfile::new(ClaimantId::new("OLD-1"), "Lee", "Park", "ssn-old");
        established.set_risk_score(85).unwrap();
        established.account_created = Utc::now() - Duration::days(400);

        let alerts = engine.detect(&[], &[claimant, established]);
        let synthetic = alerts
            .iter()
            .find(|a| a.scheme_id == SchemeId::new(SYNTHETIC_IDENTITY))
            .expect("synthetic identity detected");
        assert_eq!(synthetic.affected_claimant_ids, vec![ClaimantId::new("SYN-1")]);
    }

    #[test]
    fn test_ssn_sharing() {
        let engine = PatternEngine::default();
        let a = ClaimantProfile::new(ClaimantId::new("A"), "A", "A", "ssn-dup");
        let b = ClaimantProfile::new(ClaimantId::new("B"), "B", "B", "ssn-dup");
        let alerts = engine.detect(&[], &[a, b]);
        assert!(alerts.iter().any(|a| a.scheme_id == SchemeId::new(SSN_SHARING)));
    }

    #[test]
    fn test_detection_updates_statistics() {
        let engine = PatternEngine::default();
        let claims = claims_from_ip("RING", 6, Some("203.0.113.5"));
        engine.detect(&claims, &[]);
        engine.detect(&claims, &[]);

        let scheme = engine.scheme(&SchemeId::new(IDENTITY_RING)).unwrap();
        assert_eq!(scheme.occurrences, 2);
        assert!(scheme.last_detected.is_some());
        assert_eq!(engine.recent_alerts().len(), 2);
    }

    #[test]
    fn test_clean_batch_has_no_alerts() {
        let engine = PatternEngine::default();
        let claims = claims_from_ip("SOLO", 4, None);
        assert!(engine.detect(&claims, &[]).is_empty());
    }
}

// ============================================================================
// Emerging Patterns and Maintenance
// ============================================================================

mod maintenance_tests {
    use super::*;

    #[test]
    fn test_emerging_pattern_observed_and_promoted() {
        let engine = PatternEngine::default();
        let claims = claims_from_ip("BURST", 9, Some("192.0.2.44"));

        for _ in 0..4 {
            engine.detect(&claims, &[]);
        }
        let emerging = engine.emerging_patterns();
        assert_eq!(emerging.len(), 1);
        assert_eq!(emerging[0].observations, 4);

        // not promoted before the fifth observation
        assert!(engine.run_maintenance().promoted.is_empty());

        engine.detect(&claims, &[]);
        let report = engine.run_maintenance();
        assert_eq!(report.promoted.len(), 1);
        assert!(engine.emerging_patterns().is_empty());

        let promoted = engine.scheme(&report.promoted[0]).unwrap();
        assert_eq!(promoted.success_rate, 0.5);
        assert!(promoted.promoted_from.is_some());
    }

    /// One burst of `size` claims opening at the given time, no shared IP
    fn burst(prefix: &str, size: usize, opened: chrono::DateTime<Utc>) -> Vec<Claim> {
        (0..size)
            .map(|n| {
                let mut claim = Claim::new(
                    ClaimId::new(format!("{prefix}-{n}")),
                    ClaimantId::new(format!("{prefix}-C{n}")),
                    dec!(420),
                    dec!(10920),
                );
                claim.created_date = opened + Duration::seconds((n * n * 9) as i64);
                claim
            })
            .collect()
    }

    #[test]
    fn test_daily_time_window_bursts_are_promoted() {
        let engine = PatternEngine::default();
        let opened = Utc.with_ymd_and_hms(2026, 3, 2, 2, 10, 0).unwrap();

        let mut promoted = Vec::new();
        for day in 0..5 {
            let claims = burst(&format!("NIGHT{day}"), 20, opened + Duration::days(day));
            engine.detect(&claims, &[]);
            promoted.extend(engine.run_maintenance().promoted);
        }

        assert_eq!(promoted.len(), 1);
        assert!(engine.emerging_patterns().is_empty());
        let scheme = engine.scheme(&promoted[0]).unwrap();
        assert!(scheme.description.contains("TIME_WINDOW"));
    }

    #[test]
    fn test_repeated_bursts_stay_one_emerging_pattern() {
        let engine = PatternEngine::default();
        let opened = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();

        // 16 of 20 scores exactly 0.8, which never clears promotion
        for n in 0..20 {
            let claims = burst(&format!("B{n}"), 16, opened + Duration::minutes(n));
            engine.detect(&claims, &[]);
            engine.run_maintenance();
        }

        let emerging = engine.emerging_patterns();
        assert_eq!(emerging.len(), 1);
        assert_eq!(emerging[0].observations, 20);
    }

    #[test]
    fn test_unseen_emerging_patterns_expire() {
        let config = DetectionConfig {
            emerging_max_idle_passes: 3,
            ..DetectionConfig::default()
        };
        let engine = PatternEngine::new(config);
        let claims = burst("ONCE", 16, Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
        engine.detect(&claims, &[]);

        for _ in 0..3 {
            assert!(engine.run_maintenance().expired.is_empty());
        }
        let report = engine.run_maintenance();

        assert_eq!(report.expired.len(), 1);
        assert!(engine.emerging_patterns().is_empty());
    }

    #[test]
    fn test_cluster_below_score_is_not_emerging() {
        let engine = PatternEngine::default();
        let claims = claims_from_ip("SMALL", 7, Some("192.0.2.45"));
        engine.detect(&claims, &[]);
        assert!(engine.emerging_patterns().is_empty());
    }

    #[test]
    fn test_outcomes_applied_on_maintenance() {
        let engine = PatternEngine::new(DetectionConfig::default());
        let id = SchemeId::new(IDENTITY_RING);
        let before = engine.scheme(&id).unwrap().success_rate;

        engine.record_outcome(&id, false).unwrap();
        engine.record_outcome(&id, false).unwrap();
        assert_eq!(engine.scheme(&id).unwrap().success_rate, before);

        let report = engine.run_maintenance();
        assert_eq!(report.outcomes_applied, 2);
        let after = engine.scheme(&id).unwrap();
        assert!(after.success_rate < before);
        assert_eq!(after.total_outcomes, 2);
    }

    #[test]
    fn test_outcome_for_unknown_scheme() {
        let engine = PatternEngine::default();
        let result = engine.record_outcome(&SchemeId::new("NOPE"), true);
        assert!(matches!(result, Err(PatternError::SchemeNotFound(_))));
    }
}
