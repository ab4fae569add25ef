use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "keyword-monitor")]
#[command(about = "Watch a directory and rank its text files by TF-IDF against a set of terms", long_about = None)]
#[command(after_help = "Example: keyword-monitor -d dir -n 5 -p 300 -t \"password try again\"")]
pub struct Cli {
    /// Directory to monitor
    #[arg(short, long)]
    pub directory: PathBuf,
    /// Number of results to report each cycle
    #[arg(short = 'n', long)]
    pub results: usize,
    /// Reporting period in seconds
    #[arg(short, long)]
    pub period: u64,
    /// Whitespace-separated set of terms
    #[arg(short, long)]
    pub terms: String,
    /// How results are reported
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Log lines through the tracing subscriber
    Text,
    /// One JSON object per cycle on stdout
    Json,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub directory: PathBuf,
    pub results: usize,
    pub period: Duration,
    pub terms: Vec<String>,
    pub format: ReportFormat,
}

impl MonitorConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.period == 0 {
            bail!("reporting period must be at least one second");
        }
        let terms: Vec<String> = cli.terms.split_whitespace().map(str::to_string).collect();
        if terms.is_empty() {
            bail!("at least one term is required");
        }
        if !cli.directory.is_dir() {
            bail!("directory {} not found", cli.directory.display());
        }
        Ok(Self {
            directory: cli.directory.clone(),
            results: cli.results,
            period: Duration::from_secs(cli.period),
            terms,
            format: cli.format,
        })
    }
}
