//! Property tests for evidence custody

use chrono::Utc;
use proptest::prelude::*;

use domain_cases::{CustodyRecord, EvidenceItem, EvidenceType};

proptest! {
    /// Transfers, accepted or rejected, never remove or reorder earlier custody records
    #[test]
    fn custody_chain_is_append_only(
        transfers in prop::collection::vec((0usize..4, 0usize..4), 0..20),
    ) {
        let holders = ["inv-1", "inv-2", "lab", "court"];
        let mut item = EvidenceItem::collect(EvidenceType::Document, "Pay stub", holders[0]);

        for (from, to) in transfers {
            let before: Vec<CustodyRecord> = item.custody_chain().to_vec();
            let accepted = item.transfer(holders[from], holders[to], "Transfer", Utc::now()).is_ok();

            let after = item.custody_chain();
            prop_assert_eq!(&after[..before.len()], &before[..]);
            prop_assert_eq!(after.len(), before.len() + usize::from(accepted));
            if accepted {
                prop_assert_eq!(item.custodian(), holders[to]);
            }
        }
    }
}
