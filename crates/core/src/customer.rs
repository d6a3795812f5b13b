use serde::{Deserialize, Serialize};

use crate::scoring::SegmentThresholds;

/// Per-customer behavioral metrics produced by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerMetrics {
    pub customer_id: String,
    /// Whole days between the reference date and the latest purchase date.
    /// Negative when the latest purchase postdates the reference date.
    pub recency: i64,
    /// Distinct orders, not line items.
    pub frequency: u64,
    pub monetary: f64,
}

/// A customer with normalized ranks, composite score and segment label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedCustomer {
    pub customer_id: String,
    pub frequency: u64,
    pub monetary: f64,
    pub recency: i64,
    pub r_rank_norm: f64,
    pub f_rank_norm: f64,
    pub m_rank_norm: f64,
    #[serde(rename = "RFM_score")]
    pub rfm_score: f64,
    pub customer_segment: CustomerSegment,
}

/// Customer value tiers, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CustomerSegment {
    #[serde(rename = "Top customers")]
    TopCustomers,
    #[serde(rename = "High value customer")]
    HighValue,
    #[serde(rename = "Medium value customer")]
    MediumValue,
    #[serde(rename = "Low value customers")]
    LowValue,
    #[serde(rename = "Lost customers")]
    Lost,
}

impl CustomerSegment {
    pub const ALL: [CustomerSegment; 5] = [
        CustomerSegment::TopCustomers,
        CustomerSegment::HighValue,
        CustomerSegment::MediumValue,
        CustomerSegment::LowValue,
        CustomerSegment::Lost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CustomerSegment::TopCustomers => "Top customers",
            CustomerSegment::HighValue => "High value customer",
            CustomerSegment::MediumValue => "Medium value customer",
            CustomerSegment::LowValue => "Low value customers",
            CustomerSegment::Lost => "Lost customers",
        }
    }

    /// Classify a score. Checked top-down, first match wins, all comparisons
    /// strict, so a score sitting exactly on a bound falls to the tier below.
    pub fn from_score(score: f64, thresholds: &SegmentThresholds) -> Self {
        if score > thresholds.top_customers {
            CustomerSegment::TopCustomers
        } else if score > thresholds.high_value {
            CustomerSegment::HighValue
        } else if score > thresholds.medium_value {
            CustomerSegment::MediumValue
        } else if score > thresholds.low_value {
            CustomerSegment::LowValue
        } else {
            CustomerSegment::Lost
        }
    }
}

impl std::fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
