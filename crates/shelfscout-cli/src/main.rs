//! ShelfScout CLI - Command-line interface for two-phase catalog search.

use anyhow::Context;
use clap::Parser;
use shelfscout_cli::commands;
use shelfscout_cli::repl;
use shelfscout_cli::{Cli, Command, Formatter, Services, ShelfScoutConfig};
use tracing_subscriber::EnvFilter;

/// Directives applied by `--verbose`
const VERBOSE_FILTER: &str = "info,shelfscout_cli=debug,shelfscout_batch=debug,\
shelfscout_search=debug,shelfscout_extractor=debug,shelfscout_llm=debug";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => ShelfScoutConfig::default_path()?,
    };
    // `config --init` must work while the file is missing or broken
    let initializing = matches!(&cli.command, Some(Command::Config(args)) if args.init);
    let mut config = if initializing {
        ShelfScoutConfig::default()
    } else {
        ShelfScoutConfig::load(cli.config.as_deref()).with_context(|| {
            format!("failed to load configuration from {}", config_path.display())
        })?
    };

    if let Some(endpoint) = cli.endpoint {
        config.api.endpoint = endpoint;
    }

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&config, &formatter).await?;
        }
        Some(Command::Run(args)) => {
            commands::execute_run(args, &config, &formatter)
                .await
                .context("batch run failed")?;
        }
        Some(Command::Config(args)) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
        Some(cmd) => {
            let services = Services::from_config(&config).context("invalid configuration")?;

            match cmd {
                Command::Extract(args) => {
                    commands::execute_extract(args, &services, &formatter).await?;
                }
                Command::Search(args) => {
                    commands::execute_search(args, &services, &formatter).await?;
                }
                Command::Check => {
                    commands::execute_check(&services, &formatter).await?;
                }
                Command::Run(_) | Command::Config(_) | Command::Repl => {
                    unreachable!("handled above")
                }
            }
        }
    }

    Ok(())
}
