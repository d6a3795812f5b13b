//! RfmScoring rule kind: rank weights, post-weight scale, segment
//! thresholds and score rounding.

use serde::{Deserialize, Serialize};

use rfm_core::{RoundingMode, ScoreWeights, ScoringParams, SegmentThresholds};

use crate::metadata::CommonMetadata;

pub const RFM_SCORING_KIND: &str = "RfmScoring";

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level RfmScoring rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RfmScoringRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: RfmScoringSpec,
}

/// Specification section of an RfmScoring rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RfmScoringSpec {
    /// Weights for the recency/frequency/monetary rank norms (expected to sum to 1.0).
    pub weights: ScoreWeights,
    /// Multiplier applied to the weighted composite.
    pub scale: f64,
    /// Exclusive lower bounds per segment, highest first.
    pub thresholds: SegmentThresholds,
    #[serde(default)]
    pub rounding: RoundingMode,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

fn default_decimals() -> u32 {
    2
}

// ── Compiled (hot-path) types ───────────────────────────────────────

impl RfmScoringRule {
    /// Compile the YAML config into the parameters the segmentation engine takes.
    pub fn compile(&self) -> ScoringParams {
        ScoringParams {
            weights: self.spec.weights,
            scale: self.spec.scale,
            thresholds: self.spec.thresholds,
            rounding: self.spec.rounding,
            decimals: self.spec.decimals,
        }
    }

    /// The built-in rule, equivalent to [`ScoringParams::default`].
    pub fn builtin() -> Self {
        let params = ScoringParams::default();
        Self {
            api_version: "v1".to_string(),
            kind: RFM_SCORING_KIND.to_string(),
            metadata: CommonMetadata {
                id: "rfm-scoring-default".to_string(),
                name: "Default RFM scoring".to_string(),
                description: None,
                tags: None,
                enabled: true,
            },
            spec: RfmScoringSpec {
                weights: params.weights,
                scale: params.scale,
                thresholds: params.thresholds,
                rounding: params.rounding,
                decimals: params.decimals,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED: &str = include_str!("../../../data/rules/scoring/rfm-scoring.yml");

    #[test]
    fn parse_shipped_rule() {
        let rule: RfmScoringRule = serde_yaml::from_str(SHIPPED).unwrap();
        assert_eq!(rule.kind, RFM_SCORING_KIND);
        assert_eq!(rule.metadata.id, "rfm-scoring-default");

        let sum = rule.spec.weights.total();
        assert!((sum - 1.0).abs() < 1e-10, "Weights should sum to 1.0");
    }

    #[test]
    fn shipped_rule_compiles_to_defaults() {
        let rule: RfmScoringRule = serde_yaml::from_str(SHIPPED).unwrap();
        assert_eq!(rule.compile(), ScoringParams::default());
        assert_eq!(rule.compile(), RfmScoringRule::builtin().compile());
    }

    #[test]
    fn rounding_and_decimals_are_optional() {
        let yaml = r#"
apiVersion: v1
kind: RfmScoring
metadata:
  id: rfm-minimal
  name: Minimal
spec:
  weights:
    recency: 0.2
    frequency: 0.3
    monetary: 0.5
  scale: 0.05
  thresholds:
    top_customers: 4.5
    high_value: 4.0
    medium_value: 3.0
    low_value: 1.6
"#;
        let rule: RfmScoringRule = serde_yaml::from_str(yaml).unwrap();
        assert!(rule.metadata.enabled);
        assert_eq!(rule.spec.rounding, RoundingMode::HalfEven);
        assert_eq!(rule.spec.decimals, 2);
        assert_eq!(rule.compile().weights.monetary, 0.5);
    }

    #[test]
    fn unknown_spec_field_rejected() {
        let yaml = r#"
apiVersion: v1
kind: RfmScoring
metadata:
  id: rfm-typo
  name: Typo
spec:
  weights: { recency: 0.15, frequency: 0.28, monetary: 0.57 }
  scale: 0.05
  thresholds: { top_customers: 4.5, high_value: 4.0, medium_value: 3.0, low_value: 1.6 }
  treshold_mode: strict
"#;
        assert!(serde_yaml::from_str::<RfmScoringRule>(yaml).is_err());
    }

    #[test]
    fn half_away_rounding_parses() {
        let yaml = SHIPPED.replace("rounding: half_even", "rounding: half_away_from_zero");
        let rule: RfmScoringRule = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(rule.spec.rounding, RoundingMode::HalfAwayFromZero);
    }
}
