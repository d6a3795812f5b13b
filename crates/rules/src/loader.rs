//! Loading RfmScoring rule files from disk.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use rfm_core::ScoringParams;

use crate::scoring_config::RfmScoringRule;
use crate::validation::validate_scoring_rule;

// ── Error type ──────────────────────────────────────────────────────

/// Errors that can occur while loading a scoring rule.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The rule parsed but failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

// ── Loading ─────────────────────────────────────────────────────────

/// Parse and validate a rule from YAML text.
///
/// Validation warnings are logged; validation errors fail the parse.
pub fn parse_scoring_rule(yaml: &str) -> Result<RfmScoringRule> {
    let rule: RfmScoringRule = serde_yaml::from_str(yaml)?;

    let result = validate_scoring_rule(&rule);
    for w in &result.warnings {
        warn!(rule_id = %rule.metadata.id, path = %w.path, "{}", w.message);
    }
    if !result.valid {
        return Err(RuleError::Validation(result.error_summary()));
    }

    Ok(rule)
}

/// Read, parse and validate a rule file.
pub fn load_scoring_rule(path: &Path) -> Result<RfmScoringRule> {
    let contents = fs::read_to_string(path)?;
    let rule = parse_scoring_rule(&contents)?;
    info!(rule_id = %rule.metadata.id, path = %path.display(), "loaded scoring rule");
    Ok(rule)
}

/// Load a rule file and compile it.
///
/// A disabled rule is not applied: the built-in defaults are returned instead.
pub fn load_scoring_params(path: &Path) -> Result<ScoringParams> {
    let rule = load_scoring_rule(path)?;
    if !rule.metadata.enabled {
        warn!(
            rule_id = %rule.metadata.id,
            "scoring rule is disabled, falling back to built-in scoring"
        );
        return Ok(ScoringParams::default());
    }
    Ok(rule.compile())
}
