//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! A line that is not a command is searched as a query.

use crate::cli::QueryArgs;
use crate::commands;
use crate::config::{ShelfScoutConfig, CONFIG_DIR};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::services::Services;
use rustyline::config::Config as EditorConfig;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
pub async fn run_repl(config: &ShelfScoutConfig, formatter: &Formatter) -> Result<()> {
    let services = Services::from_config(config)?;

    println!(
        "{}",
        formatter.info("ShelfScout REPL - Type a query to search, 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(config.output.history_size)
        .map_err(|e| CliError::Config(format!("Invalid history size: {}", e)))?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(|e| {
        CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e)))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("shelfscout> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, &services, config, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Extract(String),
    Search(String),
    Check,
    Config,
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "" => Err(CliError::InvalidInput("Empty command".to_string())),
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "check" => Ok(ReplCommand::Check),
        "config" => Ok(ReplCommand::Config),
        "extract" | "search" if rest.is_empty() => Err(CliError::InvalidInput(format!(
            "Usage: {} <query>",
            head
        ))),
        "extract" => Ok(ReplCommand::Extract(rest.to_string())),
        "search" => Ok(ReplCommand::Search(rest.to_string())),
        _ => Ok(ReplCommand::Search(line.to_string())),
    }
}

/// Execute a REPL command.
async fn execute_repl_command(
    cmd: ReplCommand,
    services: &Services,
    config: &ShelfScoutConfig,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::Extract(query) => {
            commands::execute_extract(query_args(query), services, formatter).await
        }
        ReplCommand::Search(query) => {
            commands::execute_search(query_args(query), services, formatter).await
        }
        ReplCommand::Check => commands::execute_check(services, formatter).await,
        ReplCommand::Config => {
            println!("{}", config.to_toml()?);
            Ok(())
        }
        ReplCommand::Exit | ReplCommand::Help => Ok(()),
    }
}

fn query_args(query: String) -> QueryArgs {
    QueryArgs { query: vec![query] }
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let dir = home.join(CONFIG_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <query>                        - Search (same as 'search <query>')");
    println!("  search <query>                 - Extract, discover, search and reduce");
    println!("  extract <query>                - Show the extracted intent only");
    println!("  check                          - Test the LLM and catalog endpoint");
    println!("  config                         - Print the effective configuration");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}
