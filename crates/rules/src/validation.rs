//! Validation for RfmScoring rules with structured errors and warnings.
//!
//! Errors block a rule from being applied; warnings are advisory.

use serde::{Deserialize, Serialize};

use crate::scoring_config::{RfmScoringRule, RFM_SCORING_KIND};

/// Upper bound on score decimals; beyond this rounding stops being meaningful for f64.
const MAX_DECIMALS: u32 = 6;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted location, e.g. `"spec.thresholds.high_value"`.
    pub path: String,
    pub message: String,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    /// All error messages joined into one line, `path: message; ...`.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed [`RfmScoringRule`].
pub fn validate_scoring_rule(rule: &RfmScoringRule) -> ValidationResult {
    let mut result = ValidationResult::new();
    validate_envelope(rule, &mut result);
    validate_weights(rule, &mut result);
    validate_scale(rule, &mut result);
    validate_thresholds(rule, &mut result);
    result
}

// ── Checks ──────────────────────────────────────────────────────────

fn validate_envelope(rule: &RfmScoringRule, result: &mut ValidationResult) {
    if rule.api_version != "v1" {
        result.error(
            "apiVersion",
            format!("apiVersion must be 'v1', got '{}'", rule.api_version),
        );
    }
    if rule.kind != RFM_SCORING_KIND {
        result.error(
            "kind",
            format!("kind must be '{}', got '{}'", RFM_SCORING_KIND, rule.kind),
        );
    }
    if !is_kebab_case(&rule.metadata.id) {
        result.error(
            "metadata.id",
            format!(
                "id must be kebab-case (lowercase alphanumeric + hyphens), got '{}'",
                rule.metadata.id
            ),
        );
    }
}

fn validate_weights(rule: &RfmScoringRule, result: &mut ValidationResult) {
    let w = &rule.spec.weights;
    let named = [
        ("spec.weights.recency", w.recency),
        ("spec.weights.frequency", w.frequency),
        ("spec.weights.monetary", w.monetary),
    ];

    let mut all_valid = true;
    for (path, value) in named {
        if !value.is_finite() || value < 0.0 {
            result.error(path, format!("weight must be a finite non-negative number, got {value}"));
            all_valid = false;
        }
    }
    if !all_valid {
        return;
    }

    let total = w.total();
    if total == 0.0 {
        result.error("spec.weights", "at least one weight must be positive");
    } else if (total - 1.0).abs() > 1e-6 {
        result.warn(
            "spec.weights",
            format!("weights sum to {total}, scores will not span the usual 0-5 range"),
        );
    }
}

fn validate_scale(rule: &RfmScoringRule, result: &mut ValidationResult) {
    let scale = rule.spec.scale;
    if !scale.is_finite() || scale <= 0.0 {
        result.error("spec.scale", format!("scale must be a positive number, got {scale}"));
    }
    if rule.spec.decimals > MAX_DECIMALS {
        result.error(
            "spec.decimals",
            format!("decimals must be at most {MAX_DECIMALS}, got {}", rule.spec.decimals),
        );
    }
}

fn validate_thresholds(rule: &RfmScoringRule, result: &mut ValidationResult) {
    let t = &rule.spec.thresholds;
    let ordered = [
        ("spec.thresholds.top_customers", t.top_customers),
        ("spec.thresholds.high_value", t.high_value),
        ("spec.thresholds.medium_value", t.medium_value),
        ("spec.thresholds.low_value", t.low_value),
    ];

    for (path, value) in ordered {
        if !value.is_finite() {
            result.error(path, format!("threshold must be finite, got {value}"));
            return;
        }
    }

    for pair in ordered.windows(2) {
        let (upper_path, upper) = pair[0];
        let (lower_path, lower) = pair[1];
        if upper <= lower {
            result.error(
                lower_path,
                format!("must be strictly below {upper_path} ({upper}), got {lower}"),
            );
        }
    }

    let w = &rule.spec.weights;
    let max_score = 100.0 * w.total() * rule.spec.scale;
    if max_score.is_finite() && t.top_customers >= max_score {
        result.warn(
            "spec.thresholds.top_customers",
            format!(
                "threshold {} is not below the highest attainable score {max_score}, the top segment is unreachable",
                t.top_customers
            ),
        );
    }
}

fn is_kebab_case(s: &str) -> bool {
    if s.is_empty() || s.ends_with('-') {
        return false;
    }
    let mut prev_was_hyphen = true;
    for ch in s.chars() {
        if ch == '-' {
            if prev_was_hyphen {
                return false;
            }
            prev_was_hyphen = true;
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            prev_was_hyphen = false;
        } else {
            return false;
        }
    }
    true
}
