//! Read-only views over finished outputs for dashboards and reports:
//! population averages, top-N leaderboards, and segment distribution.

use std::cmp::Ordering;

use serde::Serialize;

use rfm_core::{CustomerMetrics, CustomerSegment, RoundingMode, SegmentedCustomer};

/// Population means, rounded for display (recency 1 dp, others 2 dp).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAverages {
    pub customers: usize,
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
}

impl MetricAverages {
    /// Returns `None` for an empty population.
    pub fn from_metrics(metrics: &[CustomerMetrics]) -> Option<Self> {
        if metrics.is_empty() {
            return None;
        }
        let n = metrics.len() as f64;
        let recency = metrics.iter().map(|m| m.recency as f64).sum::<f64>() / n;
        let frequency = metrics.iter().map(|m| m.frequency as f64).sum::<f64>() / n;
        let monetary = metrics.iter().map(|m| m.monetary).sum::<f64>() / n;

        let round = RoundingMode::HalfEven;
        Some(Self {
            customers: metrics.len(),
            recency: round.round(recency, 1),
            frequency: round.round(frequency, 2),
            monetary: round.round(monetary, 2),
        })
    }
}

/// Which metric a leaderboard ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardKey {
    /// Most recent first (smallest recency).
    Recency,
    /// Most orders first.
    Frequency,
    /// Highest spend first.
    Monetary,
}

impl LeaderboardKey {
    pub const ALL: [LeaderboardKey; 3] = [
        LeaderboardKey::Recency,
        LeaderboardKey::Frequency,
        LeaderboardKey::Monetary,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            LeaderboardKey::Recency => "By recency",
            LeaderboardKey::Frequency => "By frequency",
            LeaderboardKey::Monetary => "By monetary",
        }
    }

    fn compare(&self, a: &CustomerMetrics, b: &CustomerMetrics) -> Ordering {
        let primary = match self {
            LeaderboardKey::Recency => a.recency.cmp(&b.recency),
            LeaderboardKey::Frequency => b.frequency.cmp(&a.frequency),
            LeaderboardKey::Monetary => b.monetary.total_cmp(&a.monetary),
        };
        primary.then_with(|| a.customer_id.cmp(&b.customer_id))
    }
}

/// Top `n` customers by `key`. Ties break on `customer_id` ascending.
pub fn leaderboard(metrics: &[CustomerMetrics], key: LeaderboardKey, n: usize) -> Vec<&CustomerMetrics> {
    let mut sorted: Vec<&CustomerMetrics> = metrics.iter().collect();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentCount {
    pub segment: CustomerSegment,
    pub customers: usize,
}

/// Customer count per segment, largest first. Every segment is listed,
/// including empty ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentDistribution {
    pub total: usize,
    pub counts: Vec<SegmentCount>,
}

impl SegmentDistribution {
    pub fn from_segmented(segmented: &[SegmentedCustomer]) -> Self {
        let mut counts: Vec<SegmentCount> = CustomerSegment::ALL
            .iter()
            .map(|&segment| SegmentCount {
                segment,
                customers: segmented
                    .iter()
                    .filter(|c| c.customer_segment == segment)
                    .count(),
            })
            .collect();
        counts.sort_by(|a, b| {
            b.customers
                .cmp(&a.customers)
                .then_with(|| a.segment.cmp(&b.segment))
        });

        Self {
            total: segmented.len(),
            counts,
        }
    }

    pub fn count(&self, segment: CustomerSegment) -> usize {
        self.counts
            .iter()
            .find(|c| c.segment == segment)
            .map(|c| c.customers)
            .unwrap_or(0)
    }

    /// Fraction of the population in `segment`; 0.0 when empty.
    pub fn share(&self, segment: CustomerSegment) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(segment) as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(id: &str, recency: i64, frequency: u64, monetary: f64) -> CustomerMetrics {
        CustomerMetrics {
            customer_id: id.to_owned(),
            recency,
            frequency,
            monetary,
        }
    }

    fn segmented(id: &str, segment: CustomerSegment) -> SegmentedCustomer {
        SegmentedCustomer {
            customer_id: id.to_owned(),
            frequency: 1,
            monetary: 1.0,
            recency: 1,
            r_rank_norm: 100.0,
            f_rank_norm: 100.0,
            m_rank_norm: 100.0,
            rfm_score: 0.0,
            customer_segment: segment,
        }
    }

    fn population() -> Vec<CustomerMetrics> {
        vec![
            metrics("a", 10, 1, 50.0),
            metrics("b", 3, 4, 10.0),
            metrics("c", 3, 2, 120.0),
            metrics("d", 90, 4, 75.5),
        ]
    }

    #[test]
    fn averages() {
        let avg = MetricAverages::from_metrics(&population()).unwrap();
        assert_eq!(avg.customers, 4);
        assert_eq!(avg.recency, 26.5);
        assert_eq!(avg.frequency, 2.75);
        assert_eq!(avg.monetary, 63.88);
    }

    #[test]
    fn averages_of_empty_population() {
        assert!(MetricAverages::from_metrics(&[]).is_none());
    }

    #[test]
    fn leaderboard_by_recency_is_most_recent_first() {
        let pop = population();
        let top = leaderboard(&pop, LeaderboardKey::Recency, 3);
        let ids: Vec<&str> = top.iter().map(|m| m.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn leaderboard_by_frequency_breaks_ties_on_id() {
        let pop = population();
        let top = leaderboard(&pop, LeaderboardKey::Frequency, 2);
        let ids: Vec<&str> = top.iter().map(|m| m.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[test]
    fn leaderboard_by_monetary() {
        let pop = population();
        let top = leaderboard(&pop, LeaderboardKey::Monetary, 10);
        let ids: Vec<&str> = top.iter().map(|m| m.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn distribution_lists_every_segment() {
        let customers = vec![
            segmented("a", CustomerSegment::Lost),
            segmented("b", CustomerSegment::Lost),
            segmented("c", CustomerSegment::TopCustomers),
            segmented("d", CustomerSegment::MediumValue),
            segmented("e", CustomerSegment::MediumValue),
            segmented("f", CustomerSegment::Lost),
        ];
        let dist = SegmentDistribution::from_segmented(&customers);

        assert_eq!(dist.total, 6);
        assert_eq!(dist.counts.len(), 5);
        assert_eq!(dist.counts[0].segment, CustomerSegment::Lost);
        assert_eq!(dist.counts[1].segment, CustomerSegment::MediumValue);
        assert_eq!(dist.counts[2].segment, CustomerSegment::TopCustomers);
        // Empty segments keep tier order.
        assert_eq!(dist.counts[3].segment, CustomerSegment::HighValue);
        assert_eq!(dist.counts[4].segment, CustomerSegment::LowValue);
        assert_eq!(dist.count(CustomerSegment::HighValue), 0);
        assert!((dist.share(CustomerSegment::Lost) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn distribution_of_nothing() {
        let dist = SegmentDistribution::from_segmented(&[]);
        assert_eq!(dist.total, 0);
        assert_eq!(dist.share(CustomerSegment::Lost), 0.0);
    }
}
