//! Named scheme detectors
//!
//! Each detector is a predicate over a whole [`DetectionBatch`], registered by
//! name so that scheme definitions stay plain data.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use core_kernel::{ClaimId, ClaimantId};
use domain_claims::Claim;

use crate::batch::DetectionBatch;
use crate::config::DetectionConfig;

pub const SHARED_IP: &str = "shared_ip_cluster";
pub const SYNTHETIC_IDENTITY: &str = "synthetic_identity";
pub const SSN_SHARING: &str = "ssn_sharing";
pub const EMPLOYER_SURGE: &str = "employer_claim_surge";
pub const FOREIGN_ACCESS: &str = "foreign_ip_access";
pub const REGULAR_CADENCE: &str = "regular_filing_cadence";
pub const ALWAYS_TRUE: &str = "always_true";

/// Result of running one detector over a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorOutcome {
    pub matched: bool,
    pub claim_ids: Vec<ClaimId>,
    pub claimant_ids: Vec<ClaimantId>,
}

impl DetectorOutcome {
    pub fn no_match() -> Self {
        Self::default()
    }

    /// Builds an outcome from the affected claims; matched if any
    fn from_claims<'a>(claims: impl IntoIterator<Item = &'a Claim>) -> Self {
        let mut claim_ids = Vec::new();
        let mut claimant_ids = Vec::new();
        for claim in claims {
            if !claim_ids.contains(&claim.claim_id) {
                claim_ids.push(claim.claim_id.clone());
            }
            if !claimant_ids.contains(&claim.claimant_id) {
                claimant_ids.push(claim.claimant_id.clone());
            }
        }
        Self {
            matched: !claim_ids.is_empty(),
            claim_ids,
            claimant_ids,
        }
    }
}

/// A batch-level fraud predicate
pub trait SchemeDetector: Send + Sync {
    fn name(&self) -> &str;
    fn evaluate(&self, batch: &DetectionBatch<'_>) -> DetectorOutcome;
}

/// More than `threshold` claims filed from one IP address
pub struct SharedIpDetector {
    pub threshold: usize,
}

impl SchemeDetector for SharedIpDetector {
    fn name(&self) -> &str {
        SHARED_IP
    }

    fn evaluate(&self, batch: &DetectionBatch<'_>) -> DetectorOutcome {
        let groups = batch.group_claims(|c| c.ip_address.clone());
        DetectorOutcome::from_claims(
            groups
                .into_iter()
                .filter(|(_, claims)| claims.len() > self.threshold)
                .flat_map(|(_, claims)| claims),
        )
    }
}

/// High-risk claimants with very new accounts
pub struct SyntheticIdentityDetector {
    pub min_risk_score: u8,
    pub max_account_age_days: i64,
}

impl SchemeDetector for SyntheticIdentityDetector {
    fn name(&self) -> &str {
        SYNTHETIC_IDENTITY
    }

    fn evaluate(&self, batch: &DetectionBatch<'_>) -> DetectorOutcome {
        let suspects: Vec<ClaimantId> = batch
            .claimants
            .iter()
            .filter(|p| {
                p.risk_score > self.min_risk_score
                    && p.account_age_days(batch.now) < self.max_account_age_days
            })
            .map(|p| p.claimant_id.clone())
            .collect();

        let mut outcome = DetectorOutcome::from_claims(batch.claims_of(&suspects));
        outcome.matched = !suspects.is_empty();
        outcome.claimant_ids = suspects;
        outcome
    }
}

/// One SSN reference used by more than `threshold` claimants
pub struct SsnSharingDetector {
    pub threshold: usize,
}

impl SchemeDetector for SsnSharingDetector {
    fn name(&self) -> &str {
        SSN_SHARING
    }

    fn evaluate(&self, batch: &DetectionBatch<'_>) -> DetectorOutcome {
        let mut by_ssn: HashMap<&str, BTreeSet<&ClaimantId>> = HashMap::new();
        for claimant in batch.claimants {
            if claimant.ssn_ref.is_empty() {
                continue;
            }
            by_ssn
                .entry(claimant.ssn_ref.as_str())
                .or_default()
                .insert(&claimant.claimant_id);
        }

        let sharing: Vec<ClaimantId> = batch
            .claimants
            .iter()
            .filter(|p| {
                by_ssn
                    .get(p.ssn_ref.as_str())
                    .is_some_and(|ids| ids.len() > self.threshold)
            })
            .map(|p| p.claimant_id.clone())
            .collect();

        let mut outcome = DetectorOutcome::from_claims(batch.claims_of(&sharing));
        outcome.matched = !sharing.is_empty();
        outcome.claimant_ids = sharing;
        outcome
    }
}

/// More than `threshold` claims against one employer within a rolling window
pub struct EmployerSurgeDetector {
    pub threshold: usize,
    pub window_days: i64,
}

impl SchemeDetector for EmployerSurgeDetector {
    fn name(&self) -> &str {
        EMPLOYER_SURGE
    }

    fn evaluate(&self, batch: &DetectionBatch<'_>) -> DetectorOutcome {
        let window = chrono::Duration::days(self.window_days);
        let mut affected: Vec<&Claim> = Vec::new();

        for (_, mut claims) in batch.group_claims(|c| c.employer_id.clone()) {
            if claims.len() <= self.threshold {
                continue;
            }
            claims.sort_by_key(|c| c.created_date);

            // widest run of claims whose filing dates fit inside the window
            let mut best = (0, 0);
            let mut start = 0;
            for end in 0..claims.len() {
                while claims[end].created_date - claims[start].created_date > window {
                    start += 1;
                }
                if end + 1 - start > best.1 - best.0 {
                    best = (start, end + 1);
                }
            }
            if best.1 - best.0 > self.threshold {
                affected.extend(&claims[best.0..best.1]);
            }
        }

        DetectorOutcome::from_claims(affected)
    }
}

/// More than `threshold` claims from non-domestic IP prefixes
pub struct ForeignAccessDetector {
    pub prefixes: Vec<String>,
    pub threshold: usize,
}

impl SchemeDetector for ForeignAccessDetector {
    fn name(&self) -> &str {
        FOREIGN_ACCESS
    }

    fn evaluate(&self, batch: &DetectionBatch<'_>) -> DetectorOutcome {
        let foreign: Vec<&Claim> = batch
            .claims
            .iter()
            .filter(|c| {
                c.ip_address
                    .as_deref()
                    .is_some_and(|ip| self.prefixes.iter().any(|p| ip.starts_with(p.as_str())))
            })
            .collect();

        if foreign.len() > self.threshold {
            DetectorOutcome::from_claims(foreign)
        } else {
            DetectorOutcome::no_match()
        }
    }
}

/// Bot-like filing: inter-arrival variance below a fraction of the mean
pub struct RegularCadenceDetector {
    pub min_samples: usize,
    pub variance_ratio: f64,
}

impl SchemeDetector for RegularCadenceDetector {
    fn name(&self) -> &str {
        REGULAR_CADENCE
    }

    fn evaluate(&self, batch: &DetectionBatch<'_>) -> DetectorOutcome {
        let mut claims: Vec<&Claim> = batch.claims.iter().collect();
        claims.sort_by_key(|c| c.created_date);

        let intervals: Vec<f64> = claims
            .windows(2)
            .map(|w| (w[1].created_date - w[0].created_date).num_milliseconds() as f64 / 1000.0)
            .collect();
        if intervals.len() < self.min_samples {
            return DetectorOutcome::no_match();
        }

        let n = intervals.len() as f64;
        let mean = intervals.iter().sum::<f64>() / n;
        let variance = intervals.iter().map(|i| (i - mean).powi(2)).sum::<f64>() / n;

        if mean > 0.0 && variance < mean * self.variance_ratio {
            DetectorOutcome::from_claims(claims)
        } else {
            DetectorOutcome::no_match()
        }
    }
}

/// Placeholder detector carried by promoted schemes
pub struct AlwaysTrueDetector;

impl SchemeDetector for AlwaysTrueDetector {
    fn name(&self) -> &str {
        ALWAYS_TRUE
    }

    fn evaluate(&self, _batch: &DetectionBatch<'_>) -> DetectorOutcome {
        DetectorOutcome {
            matched: true,
            ..Default::default()
        }
    }
}

/// Detectors looked up by name
#[derive(Clone, Default)]
pub struct DetectorRegistry {
    detectors: HashMap<String, Arc<dyn SchemeDetector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in detector, configured from `config`
    pub fn with_defaults(config: &DetectionConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SharedIpDetector {
            threshold: config.shared_ip_threshold,
        }));
        registry.register(Arc::new(SyntheticIdentityDetector {
            min_risk_score: config.synthetic_min_risk_score,
            max_account_age_days: config.synthetic_max_account_age_days,
        }));
        registry.register(Arc::new(SsnSharingDetector {
            threshold: config.ssn_sharing_threshold,
        }));
        registry.register(Arc::new(EmployerSurgeDetector {
            threshold: config.employer_claim_threshold,
            window_days: config.employer_window_days,
        }));
        registry.register(Arc::new(ForeignAccessDetector {
            prefixes: config.foreign_ip_prefixes.clone(),
            threshold: config.foreign_access_threshold,
        }));
        registry.register(Arc::new(RegularCadenceDetector {
            min_samples: config.cadence_min_samples,
            variance_ratio: config.cadence_variance_ratio,
        }));
        registry.register(Arc::new(AlwaysTrueDetector));
        registry
    }

    /// Registers a detector, replacing any with the same name
    pub fn register(&mut self, detector: Arc<dyn SchemeDetector>) {
        self.detectors.insert(detector.name().to_string(), detector);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SchemeDetector>> {
        self.detectors.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.detectors.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.detectors.keys().cloned().collect();
        names.sort();
        names
    }
}
