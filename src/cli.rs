//! CLI argument parsing for jetsub

use crate::config::AnalysisConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per accepted event (default)
    Jsonl,
    /// CSV for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "jetsub")]
#[command(version)]
#[command(about = "Boosted jet clustering, pruning and N-subjettiness over JSON Lines events", long_about = None)]
pub struct Cli {
    /// Event file in JSON Lines format (stdin when omitted or "-")
    #[arg(value_name = "EVENTS")]
    pub input: Option<PathBuf>,

    /// Analysis configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write records to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Record output format
    #[arg(long = "format", value_enum, default_value = "jsonl")]
    pub format: OutputFormat,

    /// Write the run summary (JSON) to FILE instead of stderr
    #[arg(long = "summary", value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Number of worker threads (default: available parallelism)
    #[arg(short = 'j', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Override the clustering cone size R
    #[arg(long = "cone-size", value_name = "R")]
    pub cone_size: Option<f64>,

    /// Override the leading pruned jet pt threshold
    #[arg(long = "min-pt", value_name = "GEV")]
    pub min_pt: Option<f64>,

    /// Override how many upstream jets contribute constituents
    #[arg(long = "max-jets", value_name = "N")]
    pub max_jets: Option<usize>,

    /// Run the generator-level branch as well
    #[arg(long = "simulated")]
    pub simulated: bool,

    /// Skip ghost particles (no jet areas)
    #[arg(long = "no-area")]
    pub no_area: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long = "print-config")]
    pub print_config: bool,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut AnalysisConfig) {
        if let Some(cone_size) = self.cone_size {
            config.cone_size = cone_size;
        }
        if let Some(min_pt) = self.min_pt {
            config.min_leading_pt = min_pt;
        }
        if let Some(max_jets) = self.max_jets {
            config.max_jets_considered = max_jets;
        }
        if self.simulated {
            config.simulated = true;
        }
        if self.no_area {
            config.area.enabled = false;
        }
    }

    /// Input path, `None` for stdin
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["jetsub"]);
        assert!(cli.input.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.format, OutputFormat::Jsonl);
        assert!(!cli.simulated);
        assert!(!cli.no_area);
        assert!(!cli.debug);
        assert!(cli.workers.is_none());
    }

    #[test]
    fn test_cli_input_and_output() {
        let cli = Cli::parse_from(["jetsub", "events.jsonl", "-o", "out.csv", "--format", "csv"]);
        assert_eq!(cli.input, Some(PathBuf::from("events.jsonl")));
        assert_eq!(cli.output, Some(PathBuf::from("out.csv")));
        assert_eq!(cli.format, OutputFormat::Csv);
    }

    #[test]
    fn test_cli_dash_means_stdin() {
        let cli = Cli::parse_from(["jetsub", "-"]);
        assert!(cli.input_path().is_none());
        let cli = Cli::parse_from(["jetsub", "events.jsonl"]);
        assert!(cli.input_path().is_some());
    }

    #[test]
    fn test_cli_workers_flag() {
        let cli = Cli::parse_from(["jetsub", "-j", "4"]);
        assert_eq!(cli.workers, Some(4));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["jetsub", "--format", "text"]).is_err());
    }

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let cli = Cli::parse_from([
            "jetsub",
            "--cone-size",
            "1.2",
            "--min-pt",
            "250",
            "--max-jets",
            "2",
            "--simulated",
            "--no-area",
        ]);
        let mut config = AnalysisConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.cone_size, 1.2);
        assert_eq!(config.min_leading_pt, 250.0);
        assert_eq!(config.max_jets_considered, 2);
        assert!(config.simulated);
        assert!(!config.area.enabled);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let cli = Cli::parse_from(["jetsub"]);
        let mut config = AnalysisConfig {
            simulated: true,
            ..AnalysisConfig::default()
        };
        cli.apply_overrides(&mut config);
        assert!(config.simulated);
        assert_eq!(config, AnalysisConfig {
            simulated: true,
            ..AnalysisConfig::default()
        });
    }
}
