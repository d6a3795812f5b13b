use std::io::{self, Write};

use chrono::NaiveDate;
use serde::Serialize;

use rfm_compute::{LeaderboardKey, MetricAverages, PipelineOutput, RunMetrics, SegmentDistribution};
use rfm_core::CustomerMetrics;

/// Everything printed after a run, in display order.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub reference_date: NaiveDate,
    pub run: &'a RunMetrics,
    pub averages: Option<MetricAverages>,
    pub leaderboards: Vec<Leaderboard<'a>>,
    pub distribution: SegmentDistribution,
}

#[derive(Debug, Serialize)]
pub struct Leaderboard<'a> {
    pub key: LeaderboardKey,
    pub customers: Vec<&'a CustomerMetrics>,
}

impl<'a> Report<'a> {
    pub fn build(output: &'a PipelineOutput, reference_date: NaiveDate, top_n: usize) -> Self {
        let leaderboards = LeaderboardKey::ALL
            .iter()
            .map(|&key| Leaderboard {
                key,
                customers: output.leaderboard(key, top_n),
            })
            .collect();

        Self {
            reference_date,
            run: &output.run,
            averages: output.averages(),
            leaderboards,
            distribution: output.distribution(),
        }
    }

    pub fn write_json<W: Write>(&self, out: &mut W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out).map_err(serde_json::Error::io)
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "RFM analysis: {} customers from {} rows (reference date {})",
            self.run.customers_out, self.run.rows_in, self.reference_date
        )?;

        if let Some(avg) = &self.averages {
            writeln!(out)?;
            writeln!(out, "Averages")?;
            writeln!(out, "  recency    {:>10.1} days", avg.recency)?;
            writeln!(out, "  frequency  {:>10.2} orders", avg.frequency)?;
            writeln!(out, "  monetary   {:>10.2}", avg.monetary)?;
        }

        for board in &self.leaderboards {
            writeln!(out)?;
            writeln!(out, "Top {} {}", board.customers.len(), board.key.title().to_lowercase())?;
            writeln!(
                out,
                "  {:<34} {:>8} {:>10} {:>12}",
                "customer_id", "recency", "frequency", "monetary"
            )?;
            for c in &board.customers {
                writeln!(
                    out,
                    "  {:<34} {:>8} {:>10} {:>12.2}",
                    c.customer_id, c.recency, c.frequency, c.monetary
                )?;
            }
        }

        writeln!(out)?;
        writeln!(out, "Segments")?;
        for entry in &self.distribution.counts {
            writeln!(
                out,
                "  {:<24} {:>8} {:>6.1}%",
                entry.segment.label(),
                entry.customers,
                self.distribution.share(entry.segment) * 100.0
            )?;
        }

        Ok(())
    }
}
