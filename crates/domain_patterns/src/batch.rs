//! Detection batch

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use core_kernel::ClaimantId;
use domain_claims::{Claim, ClaimantProfile};

/// The claims and claimants one detection pass looks at
#[derive(Debug, Clone, Copy)]
pub struct DetectionBatch<'a> {
    pub claims: &'a [Claim],
    pub claimants: &'a [ClaimantProfile],
    /// Reference time for age and recency checks
    pub now: DateTime<Utc>,
}

impl<'a> DetectionBatch<'a> {
    pub fn new(claims: &'a [Claim], claimants: &'a [ClaimantProfile], now: DateTime<Utc>) -> Self {
        Self { claims, claimants, now }
    }

    /// Claims grouped by a key, keeping batch order within each group
    ///
    /// Claims for which `key` returns `None` are left out.
    pub fn group_claims<K, F>(&self, key: F) -> Vec<(K, Vec<&'a Claim>)>
    where
        K: Eq + std::hash::Hash + Clone,
        F: Fn(&Claim) -> Option<K>,
    {
        let mut order: Vec<K> = Vec::new();
        let mut groups: HashMap<K, Vec<&'a Claim>> = HashMap::new();
        for claim in self.claims {
            let Some(k) = key(claim) else { continue };
            groups
                .entry(k.clone())
                .or_insert_with(|| {
                    order.push(k);
                    Vec::new()
                })
                .push(claim);
        }
        order
            .into_iter()
            .filter_map(|k| groups.remove(&k).map(|v| (k, v)))
            .collect()
    }

    /// Claims filed by any of the given claimants, in batch order
    pub fn claims_of(&self, claimant_ids: &[ClaimantId]) -> Vec<&'a Claim> {
        self.claims
            .iter()
            .filter(|c| claimant_ids.contains(&c.claimant_id))
            .collect()
    }
}
