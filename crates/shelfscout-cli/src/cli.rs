//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use shelfscout_batch::BatchConfig;
use std::path::PathBuf;

/// ShelfScout - Turn free-text shopping intents into filtered catalog searches.
#[derive(Debug, Parser)]
#[command(name = "shelfscout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.shelfscout/config.toml)
    #[arg(short, long, global = true, env = "SHELFSCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog endpoint URL, overriding the config file
    #[arg(short, long, global = true, env = "SHELFSCOUT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per result)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process every query in an input file and write one record per query
    Run(RunArgs),

    /// Extract the search intent of a query without searching
    Extract(QueryArgs),

    /// Run one query through extraction, two-phase search and reduction
    Search(QueryArgs),

    /// Test connectivity of the LLM provider and the catalog endpoint
    Check,

    /// Print the effective configuration, or write a default config file
    Config(ConfigArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Input file (.txt, .json or .jsonl)
    pub input: PathBuf,

    /// Output file receiving one JSON record per line
    #[arg(short, long)]
    pub output: PathBuf,

    /// Append to the output file instead of truncating it
    #[arg(long)]
    pub append: bool,

    /// Batch pacing preset, replacing the [batch] section
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Pause between items (milliseconds)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Process items that already carry output or have blank input
    #[arg(long)]
    pub no_skip: bool,
}

impl RunArgs {
    /// Apply the command-line overrides to the configured batch settings
    pub fn batch_config(&self, configured: &BatchConfig) -> BatchConfig {
        let mut config = match self.preset {
            Some(preset) => preset.into(),
            None => configured.clone(),
        };
        if let Some(delay) = self.delay_ms {
            config.delay_between_items_ms = delay;
        }
        if self.no_skip {
            config.skip_processed = false;
        }
        config
    }
}

/// Arguments for single-query commands.
#[derive(Debug, Parser)]
pub struct QueryArgs {
    /// Query text; several words are joined with spaces
    #[arg(required = true)]
    pub query: Vec<String>,
}

impl QueryArgs {
    /// The query as one string
    pub fn text(&self) -> String {
        self.query.join(" ")
    }
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Write a default config file to the config path
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

/// Batch preset argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PresetArg {
    /// 1s between items, flush every 50
    Default,
    /// Short pauses, large flushes
    Aggressive,
    /// Long pauses, frequent flushes
    Lenient,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<PresetArg> for BatchConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => BatchConfig::default(),
            PresetArg::Aggressive => BatchConfig::aggressive(),
            PresetArg::Lenient => BatchConfig::lenient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::parse_from(["shelfscout"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from([
            "shelfscout",
            "run",
            "queries.txt",
            "--output",
            "results.jsonl",
            "--preset",
            "lenient",
            "--no-skip",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Some(Command::Run(args)) => {
                assert_eq!(args.input, PathBuf::from("queries.txt"));
                assert_eq!(args.output, PathBuf::from("results.jsonl"));
                let batch = args.batch_config(&BatchConfig::default());
                assert_eq!(batch, BatchConfig { skip_processed: false, ..BatchConfig::lenient() });
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_requires_output() {
        assert!(Cli::try_parse_from(["shelfscout", "run", "queries.txt"]).is_err());
    }

    #[test]
    fn test_delay_override_keeps_configured_flush() {
        let cli = Cli::parse_from(["shelfscout", "run", "q.txt", "-o", "r.jsonl", "--delay-ms", "0"]);
        let Some(Command::Run(args)) = cli.command else {
            panic!("Expected Run command");
        };
        let configured = BatchConfig {
            flush_every: 7,
            ..BatchConfig::default()
        };
        let batch = args.batch_config(&configured);
        assert_eq!(batch.delay_between_items_ms, 0);
        assert_eq!(batch.flush_every, 7);
        assert!(batch.skip_processed);
    }

    #[test]
    fn test_query_words_are_joined() {
        let cli = Cli::parse_from(["shelfscout", "--format", "json", "search", "blue", "linen", "shirts"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        match cli.command {
            Some(Command::Search(args)) => assert_eq!(args.text(), "blue linen shirts"),
            _ => panic!("Expected Search command"),
        }
        assert!(Cli::try_parse_from(["shelfscout", "extract"]).is_err());
    }

    #[test]
    fn test_force_requires_init() {
        assert!(Cli::try_parse_from(["shelfscout", "config", "--force"]).is_err());
        assert!(Cli::try_parse_from(["shelfscout", "config", "--init", "--force"]).is_ok());
    }
}
