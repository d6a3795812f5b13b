//! YAML scoring rules for RFM segmentation.
//!
//! This crate provides:
//! - The `RfmScoring` rule document (weights, scale, thresholds, rounding)
//! - Validation with blocking errors and advisory warnings
//! - File loading that compiles a rule into [`rfm_core::ScoringParams`]

pub mod loader;
pub mod metadata;
pub mod scoring_config;
pub mod validation;

pub use loader::{load_scoring_params, load_scoring_rule, parse_scoring_rule, Result, RuleError};
pub use metadata::CommonMetadata;
pub use scoring_config::{RfmScoringRule, RfmScoringSpec, RFM_SCORING_KIND};
pub use validation::{validate_scoring_rule, ValidationResult};
