//! RFM pipeline orchestrator.
//!
//! Wires the two stages together over an in-memory row set:
//!
//! - **Aggregate**: rows → one [`CustomerMetrics`] per customer.
//! - **Segment**: the full metrics population → ranks, score and segment.
//!
//! Aggregation runs once and its output is both returned as the metrics
//! view and fed into segmentation.

pub mod aggregate;
pub mod metrics;
pub mod ranking;
pub mod segment;
pub mod summary;

use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, info_span};

use rfm_core::{
    default_reference_date, CustomerMetrics, OrderRecord, OrderRow, Result, ScoringParams,
    SegmentedCustomer,
};

use self::metrics::RunMetrics;
use self::summary::{leaderboard, LeaderboardKey, MetricAverages, SegmentDistribution};

/// Pipeline configuration. Holds no mutable state, so one instance can run
/// any number of independent datasets, including concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    reference_date: NaiveDate,
    scoring: ScoringParams,
}

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Metrics view, ordered by `customer_id`.
    pub customers: Vec<CustomerMetrics>,
    /// Segmented view, same order as `customers`.
    pub segmented: Vec<SegmentedCustomer>,
    pub run: RunMetrics,
}

impl Pipeline {
    pub fn new(reference_date: NaiveDate, scoring: ScoringParams) -> Self {
        Self {
            reference_date,
            scoring,
        }
    }

    /// Default scoring against a custom reference date.
    pub fn with_reference_date(reference_date: NaiveDate) -> Self {
        Self::new(reference_date, ScoringParams::default())
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Validate, aggregate and segment raw rows.
    ///
    /// Fails fast: a bad row or an empty population aborts the run with no
    /// partial output.
    pub fn run(&self, rows: &[OrderRow]) -> Result<PipelineOutput> {
        let mut run = RunMetrics::start(rows.len());
        let span = info_span!("rfm_pipeline", run_id = %run.run_id);
        let _enter = span.enter();

        let start = Instant::now();
        let customers = aggregate::aggregate(rows, self.reference_date)?;
        run.record_aggregate(customers.len(), start.elapsed());

        self.finish(customers, run)
    }

    /// Same as [`Pipeline::run`] for callers holding typed records.
    pub fn run_records(&self, records: &[OrderRecord]) -> Result<PipelineOutput> {
        let mut run = RunMetrics::start(records.len());
        let span = info_span!("rfm_pipeline", run_id = %run.run_id);
        let _enter = span.enter();

        let start = Instant::now();
        let customers = aggregate::aggregate_records(records, self.reference_date);
        run.record_aggregate(customers.len(), start.elapsed());

        self.finish(customers, run)
    }

    fn finish(&self, customers: Vec<CustomerMetrics>, mut run: RunMetrics) -> Result<PipelineOutput> {
        let start = Instant::now();
        let segmented = segment::segment(&customers, &self.scoring)?;
        run.record_segment(start.elapsed());

        info!(
            rows = run.rows_in,
            customers = run.customers_out,
            reference_date = %self.reference_date,
            elapsed_ms = run.total_us() / 1000,
            "pipeline completed"
        );

        Ok(PipelineOutput {
            customers,
            segmented,
            run,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(default_reference_date(), ScoringParams::default())
    }
}

impl PipelineOutput {
    /// Population averages; `None` never happens for a successful run.
    pub fn averages(&self) -> Option<MetricAverages> {
        MetricAverages::from_metrics(&self.customers)
    }

    pub fn leaderboard(&self, key: LeaderboardKey, n: usize) -> Vec<&CustomerMetrics> {
        leaderboard(&self.customers, key, n)
    }

    pub fn distribution(&self) -> SegmentDistribution {
        SegmentDistribution::from_segmented(&self.segmented)
    }
}
