//! Unsupervised clustering and emerging patterns

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use core_kernel::{ClaimId, ClaimantId, PatternId};
use domain_claims::Claim;

use crate::batch::DetectionBatch;
use crate::config::DetectionConfig;

/// Attribute a cluster was grouped on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterKind {
    IpAddress,
    TimeWindow,
    Address,
}

impl fmt::Display for ClusterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClusterKind::IpAddress => "IP_ADDRESS",
            ClusterKind::TimeWindow => "TIME_WINDOW",
            ClusterKind::Address => "ADDRESS",
        };
        f.write_str(s)
    }
}

/// A group of claims or claimants sharing an attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub kind: ClusterKind,
    /// Shared attribute value
    pub key: String,
    pub claim_ids: Vec<ClaimId>,
    pub claimant_ids: Vec<ClaimantId>,
    /// `min(1, size / denominator)`
    pub suspicious_score: f64,
}

impl Cluster {
    /// Number of members: claims for claim clusters, claimants for address clusters
    pub fn size(&self) -> usize {
        match self.kind {
            ClusterKind::Address => self.claimant_ids.len(),
            _ => self.claim_ids.len(),
        }
    }

    /// Identity of the cluster across batches
    pub fn signature(&self) -> String {
        format!("{}:{}", self.kind, self.key)
    }
}

/// A recurring suspicious cluster not yet in the scheme catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergingPattern {
    pub id: PatternId,
    pub signature: String,
    pub kind: ClusterKind,
    /// Highest suspicious score seen
    pub suspicious_score: f64,
    /// Number of batches the cluster appeared in
    pub observations: u32,
    pub member_count: usize,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Maintenance passes since the cluster was last seen
    #[serde(default)]
    pub idle_passes: u32,
}

impl EmergingPattern {
    pub fn from_cluster(cluster: &Cluster, now: DateTime<Utc>) -> Self {
        Self {
            id: PatternId::new(format!("EMERGING-{}", Uuid::now_v7().simple())),
            signature: cluster.signature(),
            kind: cluster.kind,
            suspicious_score: cluster.suspicious_score,
            observations: 1,
            member_count: cluster.size(),
            first_seen: now,
            last_seen: now,
            idle_passes: 0,
        }
    }

    /// Records another sighting of the same cluster
    pub fn observe(&mut self, cluster: &Cluster, now: DateTime<Utc>) {
        self.observations += 1;
        self.suspicious_score = self.suspicious_score.max(cluster.suspicious_score);
        self.member_count = self.member_count.max(cluster.size());
        self.last_seen = now;
        self.idle_passes = 0;
    }
}

fn score(size: usize, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 1.0;
    }
    (size as f64 / denominator).min(1.0)
}

/// Runs every clustering pass over the batch
pub fn cluster_batch(batch: &DetectionBatch<'_>, config: &DetectionConfig) -> Vec<Cluster> {
    let mut clusters = cluster_by_ip(batch, config);
    clusters.extend(cluster_by_time_window(batch, config));
    clusters.extend(cluster_by_address(batch, config));
    clusters
}

fn claim_cluster(kind: ClusterKind, key: String, claims: &[&Claim], denominator: f64) -> Cluster {
    let mut claimant_ids: Vec<ClaimantId> = Vec::new();
    for claim in claims {
        if !claimant_ids.contains(&claim.claimant_id) {
            claimant_ids.push(claim.claimant_id.clone());
        }
    }
    Cluster {
        kind,
        key,
        claim_ids: claims.iter().map(|c| c.claim_id.clone()).collect(),
        claimant_ids,
        suspicious_score: score(claims.len(), denominator),
    }
}

/// Claims sharing an IP address
pub fn cluster_by_ip(batch: &DetectionBatch<'_>, config: &DetectionConfig) -> Vec<Cluster> {
    batch
        .group_claims(|c| c.ip_address.clone())
        .into_iter()
        .filter(|(_, claims)| claims.len() >= config.ip_cluster_min_size)
        .map(|(ip, claims)| claim_cluster(ClusterKind::IpAddress, ip, &claims, config.ip_cluster_denominator))
        .collect()
}

/// Claims filed within one sliding time window
///
/// Windows are chosen greedily from the earliest claim and do not overlap.
/// The key is the UTC hour of day the window opened, so a burst that recurs
/// at the same time of day is recognised as the same cluster across batches.
/// Windows in one batch that share an hour are merged.
pub fn cluster_by_time_window(batch: &DetectionBatch<'_>, config: &DetectionConfig) -> Vec<Cluster> {
    let window = Duration::seconds(config.time_window_secs);
    let mut claims: Vec<&Claim> = batch.claims.iter().collect();
    claims.sort_by_key(|c| c.created_date);

    let mut windows: Vec<(String, Vec<&Claim>)> = Vec::new();
    let mut start = 0;
    while start < claims.len() {
        let opened = claims[start].created_date;
        let end = claims[start..]
            .iter()
            .position(|c| c.created_date - opened > window)
            .map_or(claims.len(), |offset| start + offset);

        if end - start >= config.time_cluster_min_size {
            let key = format!("{:02}:00Z", opened.hour());
            match windows.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.extend_from_slice(&claims[start..end]),
                None => windows.push((key, claims[start..end].to_vec())),
            }
            start = end;
        } else {
            start += 1;
        }
    }

    windows
        .into_iter()
        .map(|(key, members)| {
            claim_cluster(ClusterKind::TimeWindow, key, &members, config.time_cluster_denominator)
        })
        .collect()
}

/// Claimants sharing a normalized residential address
pub fn cluster_by_address(batch: &DetectionBatch<'_>, config: &DetectionConfig) -> Vec<Cluster> {
    let mut order: Vec<(String, String, String)> = Vec::new();
    let mut groups: HashMap<(String, String, String), Vec<ClaimantId>> = HashMap::new();
    for claimant in batch.claimants {
        let Some(key) = claimant.residential_address.normalized_key() else {
            continue;
        };
        let members = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Vec::new()
        });
        if !members.contains(&claimant.claimant_id) {
            members.push(claimant.claimant_id.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|key| {
            let members = groups.remove(&key)?;
            if members.len() < config.address_cluster_min_size {
                return None;
            }
            let claim_ids = batch.claims_of(&members).iter().map(|c| c.claim_id.clone()).collect();
            Some(Cluster {
                kind: ClusterKind::Address,
                key: format!("{}|{}|{}", key.0, key.1, key.2),
                suspicious_score: score(members.len(), config.address_cluster_denominator),
                claim_ids,
                claimant_ids: members,
            })
        })
        .collect()
}
