use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::default_reference_date;

pub const DEFAULT_RULES_PATH: &str = "data/rules/scoring/rfm-scoring.yml";
pub const DEFAULT_TOP_N: usize = 5;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    match profiled_env_opt(profile, key) {
        Some(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %v, default, "invalid integer, using default");
            default
        }),
        None => default,
    }
}

fn profiled_env_date(profile: &str, key: &str, default: NaiveDate) -> NaiveDate {
    match profiled_env_opt(profile, key) {
        Some(v) => NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").unwrap_or_else(|e| {
            tracing::warn!(key, value = %v, error = %e, %default, "invalid date, using default");
            default
        }),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub analysis: AnalysisConfig,
    pub report: ReportConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `RFM_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("RFM_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            analysis: AnalysisConfig::from_env_profiled(p),
            report: ReportConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  analysis:  reference_date={}, rules={}",
            self.analysis.reference_date,
            self.analysis.rules_path.display()
        );
        tracing::info!("  report:    top_n={}", self.report.top_n);
    }
}

// ── Analysis ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Date recency is measured against.
    pub reference_date: NaiveDate,
    /// Scoring rule document (weights, scale, thresholds).
    pub rules_path: PathBuf,
}

impl AnalysisConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            reference_date: profiled_env_date(p, "RFM_REFERENCE_DATE", default_reference_date()),
            rules_path: PathBuf::from(profiled_env_or(p, "RFM_RULES_PATH", DEFAULT_RULES_PATH)),
        }
    }
}

// ── Report ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Leaderboard length.
    pub top_n: usize,
}

impl ReportConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            top_n: profiled_env_usize(p, "RFM_TOP_N", DEFAULT_TOP_N),
        }
    }
}
