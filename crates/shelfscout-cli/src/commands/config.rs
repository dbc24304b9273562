//! Config command implementation.

use crate::cli::ConfigArgs;
use crate::config::{OutputFormat, ShelfScoutConfig};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
///
/// Prints `config` as TOML (JSON with `--format json`), or with `--init`
/// writes the defaults to `path`.
pub fn execute_config(
    args: ConfigArgs,
    config: &ShelfScoutConfig,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    if args.init {
        if path.exists() && !args.force {
            return Err(CliError::Config(format!(
                "{} already exists; use --force to overwrite",
                path.display()
            )));
        }
        ShelfScoutConfig::default().save(path)?;
        println!(
            "{}",
            formatter.success(&format!("Wrote default config to {}", path.display()))
        );
        return Ok(());
    }

    let rendered = match formatter.format() {
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
        _ => config.to_toml()?,
    };
    println!("{}", rendered);
    Ok(())
}
