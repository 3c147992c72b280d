//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for consensus reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full report: verdict, reviewer outcomes, every finding
    Full,
    /// Verdict, severity tally, and blocking findings only
    Summary,
    /// JSON output
    Json,
}

/// CLI arguments for config-council
#[derive(Parser, Debug)]
#[command(name = "config-council")]
#[command(author, version, about = "AI review council for generated Claude Code configurations")]
#[command(long_about = r#"
config-council submits a configuration artifact to a council of independent
AI reviewers, merges their findings into one deduplicated issue set, and
computes a consensus verdict.

The verdict is conservative: one critical or high finding from any reviewer
fails the review, even if every other reviewer reported nothing. When no
reviewer responds at all the verdict is indeterminate, which is an
operational problem rather than an artifact problem.

Exit codes: 0 = pass, 1 = fail, 2 = indeterminate.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/config-council/config.toml   Global config

Example:
  config-council ./my-config
  config-council --output full --timeout 120 ./my-config
  config-council --output json --quiet ./my-config > report.json
"#)]
pub struct Cli {
    /// Path to the configuration artifact to review
    pub artifact: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub output: OutputFormat,

    /// Shared reviewer deadline in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the banner and progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print a default council.toml to stdout and exit
    #[arg(long)]
    pub init_config: bool,
}
