//! Unit tests for identifier types
//!
//! Generated identifiers are UUID-backed and prefixed; reference identifiers
//! carry the external key verbatim.

use core_kernel::{
    AssessmentId, CaseId, NoteId, EvidenceId, AlertId, AuditEntryId,
    ClaimId, ClaimantId, EmployerId, RuleId, SchemeId, PatternId,
};

mod generated_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(CaseId::new(), CaseId::new());
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = CaseId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = CaseId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(AssessmentId::prefix(), "RA");
        assert_eq!(CaseId::prefix(), "CASE");
        assert_eq!(NoteId::prefix(), "NOTE");
        assert_eq!(EvidenceId::prefix(), "EVD");
        assert_eq!(AlertId::prefix(), "ALRT");
        assert_eq!(AuditEntryId::prefix(), "AUD");
    }

    #[test]
    fn test_from_str_with_and_without_prefix() {
        let original = EvidenceId::new_v7();
        let with_prefix: EvidenceId = original.to_string().parse().unwrap();
        let bare: EvidenceId = original.as_uuid().to_string().parse().unwrap();
        assert_eq!(original, with_prefix);
        assert_eq!(original, bare);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("CASE-not-a-uuid".parse::<CaseId>().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = AlertId::new_v7();
        let json = serde_json::to_string(&id).unwrap();
        let back: AlertId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}

mod reference_id_tests {
    use super::*;

    #[test]
    fn test_external_key_is_preserved() {
        let id = ClaimId::new("UI-2024-000017");
        assert_eq!(id.as_str(), "UI-2024-000017");
        assert_eq!(id.to_string(), "UI-2024-000017");
    }

    #[test]
    fn test_placeholders_are_unique() {
        let a = ClaimantId::placeholder();
        let b = ClaimantId::placeholder();
        assert_ne!(a, b);
        assert!(a.is_placeholder());
        assert!(a.as_str().starts_with("UNKNOWN-CLAIMANT-"));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(EmployerId::from("EMP-1"), EmployerId::new("EMP-1"));
        assert_eq!(RuleId::from("R1".to_string()).as_str(), "R1");
        assert_eq!(SchemeId::new("IDENTITY_RING_SCHEME").as_str(), "IDENTITY_RING_SCHEME");
        assert!(!PatternId::new("night_filing").is_placeholder());
    }
}
