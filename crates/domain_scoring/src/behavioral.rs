//! Behavioral profiles
//!
//! Keeps a bounded history of filing sessions per claimant and compares each
//! new session against it.

use std::collections::{HashMap, HashSet, VecDeque};

use core_kernel::ClaimantId;
use domain_claims::SessionMetrics;

use crate::config::ScorerConfig;

const TYPING_POINTS: f64 = 25.0;
const DURATION_POINTS: f64 = 20.0;
const DEVICE_POINTS: f64 = 30.0;
const LOCATION_POINTS: f64 = 35.0;

/// A sub-score and the observations behind it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalScore {
    pub score: f64,
    pub evidence: Vec<String>,
}

impl SignalScore {
    pub(crate) fn add(&mut self, points: f64, evidence: String) {
        self.score += points;
        self.evidence.push(evidence);
    }
}

/// Session history per claimant
#[derive(Debug, Default)]
pub struct BehavioralProfiles {
    history: HashMap<ClaimantId, VecDeque<SessionMetrics>>,
}

impl BehavioralProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores a session against history, then records it
    ///
    /// Scores zero until the claimant has `min_history` stored sessions.
    pub fn score_session(
        &mut self,
        claimant_id: &ClaimantId,
        session: &SessionMetrics,
        config: &ScorerConfig,
    ) -> SignalScore {
        let sessions = self.history.entry(claimant_id.clone()).or_default();
        let mut signal = SignalScore::default();

        if sessions.len() >= config.min_history {
            let n = sessions.len() as f64;
            let avg_typing = sessions.iter().map(|s| s.typing_speed).sum::<f64>() / n;
            let avg_duration = sessions.iter().map(|s| s.session_duration_secs).sum::<f64>() / n;

            if let Some(dev) = relative_deviation(session.typing_speed, avg_typing) {
                if dev > config.typing_deviation {
                    signal.add(TYPING_POINTS, format!("typing speed deviates {:.0}% from history", dev * 100.0));
                }
            }
            if let Some(dev) = relative_deviation(session.session_duration_secs, avg_duration) {
                if dev > config.duration_deviation {
                    signal.add(DURATION_POINTS, format!("session duration deviates {:.0}% from history", dev * 100.0));
                }
            }

            let devices: HashSet<&str> = sessions
                .iter()
                .map(|s| s.device_fingerprint.as_str())
                .chain(std::iter::once(session.device_fingerprint.as_str()))
                .collect();
            if devices.len() > config.max_devices {
                signal.add(DEVICE_POINTS, format!("{} distinct devices used", devices.len()));
            }

            if session.location_consistency < config.min_location_consistency {
                signal.add(
                    LOCATION_POINTS,
                    format!("location consistency {:.2}", session.location_consistency),
                );
            }
        }

        sessions.push_back(session.clone());
        while sessions.len() > config.history_size {
            sessions.pop_front();
        }
        signal
    }

    /// Number of stored sessions for a claimant
    pub fn session_count(&self, claimant_id: &ClaimantId) -> usize {
        self.history.get(claimant_id).map_or(0, VecDeque::len)
    }
}

fn relative_deviation(current: f64, average: f64) -> Option<f64> {
    (average > 0.0).then(|| (current - average).abs() / average)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(typing: f64, duration: f64, device: &str, location: f64) -> SessionMetrics {
        SessionMetrics {
            typing_speed: typing,
            session_duration_secs: duration,
            device_fingerprint: device.to_string(),
            location_consistency: location,
        }
    }

    #[test]
    fn test_needs_history() {
        let mut profiles = BehavioralProfiles::new();
        let config = ScorerConfig::default();
        let id = ClaimantId::new("C-1");

        let first = profiles.score_session(&id, &session(400.0, 10.0, "d1", 0.1), &config);
        let second = profiles.score_session(&id, &session(400.0, 10.0, "d1", 0.1), &config);
        assert_eq!(first.score, 0.0);
        assert_eq!(second.score, 0.0);
        assert_eq!(profiles.session_count(&id), 2);
    }

    #[test]
    fn test_deviations_scored() {
        let mut profiles = BehavioralProfiles::new();
        let config = ScorerConfig::default();
        let id = ClaimantId::new("C-1");
        profiles.score_session(&id, &session(200.0, 600.0, "d1", 0.9), &config);
        profiles.score_session(&id, &session(200.0, 600.0, "d1", 0.9), &config);

        let signal = profiles.score_session(&id, &session(350.0, 60.0, "d1", 0.2), &config);
        assert_eq!(signal.score, 25.0 + 20.0 + 35.0);
        assert_eq!(signal.evidence.len(), 3);
    }

    #[test]
    fn test_device_count() {
        let mut profiles = BehavioralProfiles::new();
        let config = ScorerConfig::default();
        let id = ClaimantId::new("C-1");
        for device in ["d1", "d2", "d3"] {
            profiles.score_session(&id, &session(200.0, 600.0, device, 0.9), &config);
        }
        let signal = profiles.score_session(&id, &session(200.0, 600.0, "d4", 0.9), &config);
        assert_eq!(signal.score, 30.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut profiles = BehavioralProfiles::new();
        let config = ScorerConfig::default();
        let id = ClaimantId::new("C-1");
        for _ in 0..15 {
            profiles.score_session(&id, &session(200.0, 600.0, "d1", 0.9), &config);
        }
        assert_eq!(profiles.session_count(&id), 10);
    }
}
