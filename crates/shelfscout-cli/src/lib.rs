//! ShelfScout CLI library.
//!
//! This library provides the core functionality for the `shelfscout`
//! command-line interface, including configuration management, component
//! wiring, command execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;
pub mod services;

pub use cli::{Cli, Command};
pub use config::ShelfScoutConfig;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use services::{AnyProvider, Pipeline, Services};
