//! Processing-time statistics

use serde::Serialize;
use std::collections::VecDeque;

/// Summary of recent scoring latencies
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessingStats {
    /// Claims scored since start
    pub total_processed: u64,
    /// Samples in the current window
    pub window_size: usize,
    pub mean_ms: f64,
    pub max_ms: u64,
    pub last_ms: Option<u64>,
}

/// Bounded window of processing times
#[derive(Debug)]
pub(crate) struct TimingWindow {
    samples: VecDeque<u64>,
    capacity: usize,
    total_processed: u64,
}

impl TimingWindow {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            total_processed: 0,
        }
    }

    pub(crate) fn record(&mut self, elapsed_ms: u64) {
        self.samples.push_back(elapsed_ms);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        self.total_processed += 1;
    }

    pub(crate) fn stats(&self) -> ProcessingStats {
        let window_size = self.samples.len();
        let mean_ms = if window_size == 0 {
            0.0
        } else {
            self.samples.iter().sum::<u64>() as f64 / window_size as f64
        };
        ProcessingStats {
            total_processed: self.total_processed,
            window_size,
            mean_ms,
            max_ms: self.samples.iter().copied().max().unwrap_or(0),
            last_ms: self.samples.back().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_bounded() {
        let mut window = TimingWindow::new(3);
        for ms in [10, 20, 30, 40] {
            window.record(ms);
        }
        let stats = window.stats();
        assert_eq!(stats.total_processed, 4);
        assert_eq!(stats.window_size, 3);
        assert_eq!(stats.mean_ms, 30.0);
        assert_eq!(stats.max_ms, 40);
        assert_eq!(stats.last_ms, Some(40));
    }
}
