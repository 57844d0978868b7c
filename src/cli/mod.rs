//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! ingest and estimation. Environment defaults are resolved in `app`.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(name = "tdeer", version, about = "Accurately estimate your TDEE.")]
pub struct Cli {
    /// Path to CSV file containing weight and calorie data.
    pub file_path: PathBuf,

    /// Also require a `steps` column in the CSV.
    #[arg(long)]
    pub steps: bool,

    /// Expected fraction of outlier days, in [0, 0.5).
    ///
    /// Defaults to `TDEER_CONTAMINATION` from the environment (or `.env`),
    /// otherwise 0.1.
    #[arg(long)]
    pub contamination: Option<f64>,

    /// Print a diagnostic summary after the estimate.
    #[arg(long)]
    pub summary: bool,

    /// Write the estimate and fit diagnostics to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_path_only() {
        let cli = Cli::try_parse_from(["tdeer", "log.csv"]).unwrap();
        assert_eq!(cli.file_path, PathBuf::from("log.csv"));
        assert!(!cli.steps);
        assert_eq!(cli.contamination, None);
        assert_eq!(cli.export, None);
    }

    #[test]
    fn parses_optional_flags() {
        let cli = Cli::try_parse_from([
            "tdeer",
            "log.csv",
            "--steps",
            "--contamination",
            "0.2",
            "--summary",
            "--export",
            "out.json",
        ])
        .unwrap();
        assert!(cli.steps);
        assert!(cli.summary);
        assert_eq!(cli.contamination, Some(0.2));
        assert_eq!(cli.export, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn file_path_is_required() {
        assert!(Cli::try_parse_from(["tdeer"]).is_err());
    }
}
