use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Timing and volume figures for a single pipeline run.
///
/// Purely observational: nothing here feeds back into scoring.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetrics {
    /// Correlates log lines of one run.
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub rows_in: u64,
    pub customers_out: u64,
    /// Row conversion plus grouping, in microseconds.
    pub aggregate_us: u64,
    /// Ranking, scoring and labelling, in microseconds.
    pub segment_us: u64,
    /// Throughput of the aggregation stage.
    pub rows_per_second: f64,
}

impl RunMetrics {
    pub(crate) fn start(rows_in: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            rows_in: rows_in as u64,
            customers_out: 0,
            aggregate_us: 0,
            segment_us: 0,
            rows_per_second: 0.0,
        }
    }

    /// Record completion of the aggregation stage.
    pub(crate) fn record_aggregate(&mut self, customers: usize, elapsed: Duration) {
        self.customers_out = customers as u64;
        self.aggregate_us = elapsed.as_micros() as u64;

        let elapsed_secs = elapsed.as_secs_f64();
        if elapsed_secs > 0.0 {
            self.rows_per_second = self.rows_in as f64 / elapsed_secs;
        }
    }

    /// Record completion of the segmentation stage.
    pub(crate) fn record_segment(&mut self, elapsed: Duration) {
        self.segment_us = elapsed.as_micros() as u64;
    }

    pub fn total_us(&self) -> u64 {
        self.aggregate_us + self.segment_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_stage_metrics() {
        let mut m = RunMetrics::start(1000);
        m.record_aggregate(40, Duration::from_millis(50));

        assert_eq!(m.rows_in, 1000);
        assert_eq!(m.customers_out, 40);
        assert_eq!(m.aggregate_us, 50_000);
        assert!((m.rows_per_second - 20_000.0).abs() < 1e-6);
    }

    #[test]
    fn zero_elapsed_leaves_throughput_unset() {
        let mut m = RunMetrics::start(10);
        m.record_aggregate(2, Duration::ZERO);
        assert_eq!(m.rows_per_second, 0.0);
    }

    #[test]
    fn total_sums_stages() {
        let mut m = RunMetrics::start(10);
        m.record_aggregate(2, Duration::from_micros(300));
        m.record_segment(Duration::from_micros(200));
        assert_eq!(m.total_us(), 500);
    }

    #[test]
    fn each_run_gets_its_own_id() {
        assert_ne!(RunMetrics::start(0).run_id, RunMetrics::start(0).run_id);
    }
}
