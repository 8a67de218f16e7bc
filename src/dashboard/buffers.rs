//! Rolling sample buffers for the runtime sparklines
//!
//! Each buffer ends with a sentinel zero so the chart's auto-range always
//! includes the baseline. The sentinel is popped and re-pushed on every
//! update; it never counts as a sample.

use crate::models::{StatsMetric, StatsSample};
use std::collections::VecDeque;

/// Value appended after the newest sample
pub const SENTINEL: f64 = 0.0;

/// Smallest usable bound: one sample plus the sentinel
pub const MIN_BOUND: usize = 2;

/// FIFO buffer of samples with a trailing sentinel.
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    entries: VecDeque<f64>,
    bound: usize,
}

impl RollingBuffer {
    /// `bound` caps the total length, sentinel included.
    pub fn new(bound: usize) -> Self {
        let bound = bound.max(MIN_BOUND);
        Self {
            entries: VecDeque::with_capacity(bound),
            bound,
        }
    }

    /// Append a sample, evicting the oldest ones to stay within the bound.
    pub fn push(&mut self, value: f64) {
        if !self.entries.is_empty() {
            self.entries.pop_back();
        }
        while self.entries.len() + 2 > self.bound {
            self.entries.pop_front();
        }
        self.entries.push_back(value);
        self.entries.push_back(SENTINEL);
    }

    /// Total length, sentinel included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Real samples, oldest first
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        let real = self.entries.len().saturating_sub(1);
        self.entries.iter().copied().take(real)
    }

    /// Newest real sample
    pub fn latest(&self) -> Option<f64> {
        let len = self.entries.len();
        if len < 2 {
            return None;
        }
        self.entries.get(len - 2).copied()
    }

    /// Every entry as drawn, sentinel last
    pub fn chart_series(&self) -> Vec<f32> {
        self.entries.iter().map(|&v| v as f32).collect()
    }

    pub fn last_entry(&self) -> Option<f64> {
        self.entries.back().copied()
    }
}

/// Per-metric buffers plus the session-wide running maximum.
#[derive(Debug, Clone)]
pub struct StatsHistory {
    goroutine: RollingBuffer,
    thread: RollingBuffer,
    block: RollingBuffer,
    max: f64,
    updates: u64,
}

impl StatsHistory {
    pub fn new(bound: usize) -> Self {
        Self {
            goroutine: RollingBuffer::new(bound),
            thread: RollingBuffer::new(bound),
            block: RollingBuffer::new(bound),
            max: 0.0,
            updates: 0,
        }
    }

    /// Record one stats response across all buffers.
    ///
    /// `max` only ever grows; it is not recomputed after eviction.
    pub fn append(&mut self, sample: &StatsSample) {
        for metric in StatsMetric::all() {
            let value = metric.value_of(sample) as f64;
            if value > self.max {
                self.max = value;
            }
            self.buffer_mut(metric).push(value);
        }
        self.updates += 1;
    }

    pub fn buffer(&self, metric: StatsMetric) -> &RollingBuffer {
        match metric {
            StatsMetric::Goroutine => &self.goroutine,
            StatsMetric::Thread => &self.thread,
            StatsMetric::Block => &self.block,
        }
    }

    fn buffer_mut(&mut self, metric: StatsMetric) -> &mut RollingBuffer {
        match metric {
            StatsMetric::Goroutine => &mut self.goroutine,
            StatsMetric::Thread => &mut self.thread,
            StatsMetric::Block => &mut self.block,
        }
    }

    /// Running maximum across every buffer
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of samples appended this session
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_push_adds_sample_and_sentinel() {
        let mut buf = RollingBuffer::new(5);
        assert!(buf.is_empty());
        buf.push(7.0);
        assert_eq!(buf.chart_series(), vec![7.0, 0.0]);
        assert_eq!(buf.latest(), Some(7.0));
    }

    #[test]
    fn test_eviction_keeps_newest() {
        let mut buf = RollingBuffer::new(4);
        for v in 1..=6 {
            buf.push(v as f64);
        }
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.samples().collect::<Vec<_>>(), vec![4.0, 5.0, 6.0]);
        assert_eq!(buf.last_entry(), Some(SENTINEL));
    }

    #[test]
    fn test_zero_sample_is_not_mistaken_for_sentinel() {
        let mut buf = RollingBuffer::new(10);
        buf.push(0.0);
        buf.push(3.0);
        assert_eq!(buf.samples().collect::<Vec<_>>(), vec![0.0, 3.0]);
    }

    #[test]
    fn test_bound_is_at_least_two() {
        let mut buf = RollingBuffer::new(0);
        buf.push(1.0);
        buf.push(2.0);
        assert_eq!(buf.bound(), MIN_BOUND);
        assert_eq!(buf.chart_series(), vec![2.0, 0.0]);
    }

    #[test]
    fn test_goroutine_scenario() {
        let mut history = StatsHistory::new(270);
        history.append(&StatsSample { goroutine: 12, thread: 4, block: 0, timestamp: None });
        history.append(&StatsSample { goroutine: 15, thread: 4, block: 1, timestamp: None });

        let samples: Vec<f64> = history.buffer(StatsMetric::Goroutine).samples().collect();
        assert_eq!(&samples[samples.len() - 2..], &[12.0, 15.0]);
        assert_eq!(history.buffer(StatsMetric::Block).latest(), Some(1.0));
        assert_eq!(history.max(), 15.0);
        assert_eq!(history.updates(), 2);
    }

    #[test]
    fn test_max_survives_eviction() {
        let mut history = StatsHistory::new(3);
        history.append(&StatsSample { goroutine: 100, thread: 2, ..Default::default() });
        for _ in 0..5 {
            history.append(&StatsSample { goroutine: 3, thread: 2, ..Default::default() });
        }
        assert_eq!(history.max(), 100.0);
        assert!(history.buffer(StatsMetric::Goroutine).samples().all(|v| v == 3.0));
    }
}
