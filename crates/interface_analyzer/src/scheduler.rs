//! Background maintenance
//!
//! Pattern-engine and scorer maintenance run on their own tokio intervals,
//! independent of foreground assessments. Each pass takes the engine's locks
//! only for the duration of the pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use domain_patterns::PatternEngine;
use domain_scoring::RealTimeScorer;

use crate::config::MaintenanceConfig;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handles of the running maintenance tasks
///
/// Tasks are aborted on [`shutdown`](Self::shutdown) or when dropped.
#[derive(Debug, Default)]
pub struct MaintenanceScheduler {
    handles: Vec<JoinHandle<()>>,
}

impl MaintenanceScheduler {
    /// Starts the configured tasks; must be called inside a tokio runtime
    pub fn start(patterns: Arc<PatternEngine>, scorer: Arc<RealTimeScorer>, config: &MaintenanceConfig) -> Self {
        if !config.enabled {
            info!("Background maintenance disabled");
            return Self::default();
        }
        Self::start_with_intervals(
            patterns,
            scorer,
            Duration::from_secs(config.pattern_interval_secs),
            Duration::from_secs(config.scorer_interval_secs),
        )
    }

    pub fn start_with_intervals(
        patterns: Arc<PatternEngine>,
        scorer: Arc<RealTimeScorer>,
        pattern_every: Duration,
        scorer_every: Duration,
    ) -> Self {
        let pattern_task = spawn_periodic("pattern-maintenance", pattern_every, move || {
            let report = patterns.run_maintenance();
            debug!(
                outcomes_applied = report.outcomes_applied,
                promoted = report.promoted.len(),
                expired = report.expired.len(),
                "Pattern maintenance pass"
            );
        });
        let scorer_task = spawn_periodic("scorer-maintenance", scorer_every, move || {
            let report = scorer.run_maintenance();
            debug!(
                frequency_updates = report.frequency_updates,
                new_emerging = report.new_emerging.len(),
                weights_tuned = report.weights_tuned,
                "Scorer maintenance pass"
            );
        });

        info!(?pattern_every, ?scorer_every, "Background maintenance started");
        Self {
            handles: vec![pattern_task, scorer_task],
        }
    }

    pub fn task_count(&self) -> usize {
        self.handles.len()
    }

    /// Stops every task
    pub fn shutdown(mut self) {
        self.abort_all();
        info!("Background maintenance stopped");
    }

    fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for MaintenanceScheduler {
    fn drop(&mut self) {
        self.abort_all();
    }
}

fn spawn_periodic<F>(name: &'static str, period: Duration, mut pass: F) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(period.max(MIN_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            debug!(task = name, "Maintenance tick");
            pass();
        }
    })
}
