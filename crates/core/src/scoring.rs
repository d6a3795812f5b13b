//! Scoring parameters for RFM segmentation: weights, post-weight scale,
//! segment thresholds and the score rounding convention.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Analysis date the bundled dataset was scored against.
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 2).expect("2023-10-02 is a valid calendar date")
}

/// Weights applied to the normalized recency/frequency/monetary ranks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreWeights {
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
}

impl ScoreWeights {
    /// Weighted sum of the three normalized ranks.
    pub fn composite(&self, r_norm: f64, f_norm: f64, m_norm: f64) -> f64 {
        self.recency * r_norm + self.frequency * f_norm + self.monetary * m_norm
    }

    pub fn total(&self) -> f64 {
        self.recency + self.frequency + self.monetary
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            recency: 0.15,
            frequency: 0.28,
            monetary: 0.57,
        }
    }
}

/// Lower bounds (exclusive) for each segment, highest first.
/// A score must be strictly greater than a bound to enter that segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentThresholds {
    pub top_customers: f64,
    pub high_value: f64,
    pub medium_value: f64,
    pub low_value: f64,
}

impl Default for SegmentThresholds {
    fn default() -> Self {
        Self {
            top_customers: 4.5,
            high_value: 4.0,
            medium_value: 3.0,
            low_value: 1.6,
        }
    }
}

/// How the final score is rounded to `decimals` places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Banker's rounding on `value * 10^decimals` (0.125 → 0.12).
    #[default]
    HalfEven,
    /// Ties move away from zero (0.125 → 0.13).
    HalfAwayFromZero,
}

impl RoundingMode {
    pub fn round(self, value: f64, decimals: u32) -> f64 {
        let factor = 10f64.powi(decimals as i32);
        let scaled = value * factor;
        let rounded = match self {
            RoundingMode::HalfEven => scaled.round_ties_even(),
            RoundingMode::HalfAwayFromZero => scaled.round(),
        };
        rounded / factor
    }
}

/// Everything the segmentation engine needs besides the population itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    pub weights: ScoreWeights,
    /// Multiplier applied to the weighted composite (maps [0, 100] onto [0, 5]).
    pub scale: f64,
    pub thresholds: SegmentThresholds,
    pub rounding: RoundingMode,
    pub decimals: u32,
}

impl ScoringParams {
    /// Final RFM score for a set of normalized ranks.
    pub fn score(&self, r_norm: f64, f_norm: f64, m_norm: f64) -> f64 {
        let composite = self.weights.composite(r_norm, f_norm, m_norm);
        self.rounding.round(composite * self.scale, self.decimals)
    }
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            scale: 0.05,
            thresholds: SegmentThresholds::default(),
            rounding: RoundingMode::default(),
            decimals: 2,
        }
    }
}
