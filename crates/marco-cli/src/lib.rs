//! Marco CLI library.
//!
//! Command-line front end for the document analysis pipeline: configuration,
//! command execution, output formatting, saved results and prospectus
//! rendering.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod persist;
pub mod prospectus;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
