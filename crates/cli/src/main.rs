mod cli;
mod loader;
mod report;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use rfm_compute::Pipeline;
use rfm_core::{config, Config, ScoringParams};

use crate::cli::{CliArgs, OutputFormat};
use crate::report::Report;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    config::load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let args = CliArgs::parse();

    let reference_date = args.reference_date.unwrap_or(config.analysis.reference_date);
    let top_n = args.top.unwrap_or(config.report.top_n);
    let scoring = resolve_scoring(args.rules.as_deref(), &config.analysis.rules_path)?;

    let rows = loader::read_orders(&args.input)?;
    let output = Pipeline::new(reference_date, scoring)
        .run(&rows)
        .with_context(|| format!("RFM analysis of {} failed", args.input.display()))?;

    if let Some(path) = &args.output_metrics {
        loader::write_table(path, &output.customers)?;
    }
    if let Some(path) = &args.output_segments {
        loader::write_table(path, &output.segmented)?;
    }

    let report = Report::build(&output, reference_date, top_n);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => report.write_text(&mut out)?,
        OutputFormat::Json => report.write_json(&mut out)?,
    }
    out.flush()?;

    Ok(())
}

/// An explicit `--rules` file must load. The configured default path is
/// optional: when it does not exist the built-in scoring applies.
fn resolve_scoring(explicit: Option<&Path>, configured: &Path) -> Result<ScoringParams> {
    if let Some(path) = explicit {
        return rfm_rules::load_scoring_params(path)
            .with_context(|| format!("failed to load scoring rules from {}", path.display()));
    }

    if configured.exists() {
        return rfm_rules::load_scoring_params(configured)
            .with_context(|| format!("failed to load scoring rules from {}", configured.display()));
    }

    warn!(
        path = %configured.display(),
        "scoring rules not found, using built-in scoring"
    );
    Ok(ScoringParams::default())
}
