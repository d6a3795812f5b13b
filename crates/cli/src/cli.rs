use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

/// RFM customer segmentation.
///
/// Reads order line items from a CSV file, scores every customer on
/// recency, frequency and monetary value, and prints a summary report.
#[derive(Parser, Debug)]
#[command(name = "rfm", version, about = "RFM customer analytics and segmentation")]
pub struct CliArgs {
    /// Order line items CSV (customer_id, order_id, order_purchase_timestamp, price)
    #[arg(long, env = "RFM_INPUT")]
    pub input: PathBuf,

    /// Date recency is measured against, YYYY-MM-DD (default: RFM_REFERENCE_DATE or 2023-10-02)
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,

    /// Scoring rule YAML (default: RFM_RULES_PATH, built-in scoring if that file is absent)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Leaderboard length (default: RFM_TOP_N or 5)
    #[arg(long)]
    pub top: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the customer metrics table to this CSV file
    #[arg(long)]
    pub output_metrics: Option<PathBuf>,

    /// Write the segmented customer table to this CSV file
    #[arg(long)]
    pub output_segments: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command_line() {
        let args = CliArgs::try_parse_from([
            "rfm",
            "--input",
            "orders.csv",
            "--reference-date",
            "2024-01-31",
            "--rules",
            "custom.yml",
            "--top",
            "10",
            "--format",
            "json",
            "--output-segments",
            "segments.csv",
        ])
        .unwrap();

        assert_eq!(args.input, PathBuf::from("orders.csv"));
        assert_eq!(args.reference_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(args.rules, Some(PathBuf::from("custom.yml")));
        assert_eq!(args.top, Some(10));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.output_metrics.is_none());
        assert_eq!(args.output_segments, Some(PathBuf::from("segments.csv")));
    }

    #[test]
    fn defaults_to_text() {
        let args = CliArgs::try_parse_from(["rfm", "--input", "orders.csv"]).unwrap();
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.reference_date.is_none());
        assert!(args.top.is_none());
    }

    #[test]
    fn rejects_bad_reference_date() {
        let result = CliArgs::try_parse_from([
            "rfm",
            "--input",
            "orders.csv",
            "--reference-date",
            "02/10/2023",
        ]);
        assert!(result.is_err());
    }
}
