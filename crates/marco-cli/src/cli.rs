//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use marco_domain::ModelId;
use std::path::PathBuf;

/// Marco - Extract structured company information from documents.
#[derive(Debug, Parser)]
#[command(name = "marco")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MARCO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a PDF, DOCX or TXT document
    Analyze(AnalyzeArgs),

    /// Render a saved analysis as prospectus markdown
    Prospectus(ProspectusArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Document to analyze
    pub file: PathBuf,

    /// Model to run the extraction with
    #[arg(short, long, value_enum)]
    pub model: Option<ModelArg>,

    /// Extraction template (defaults to prompts/analysis_agent.md)
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Save the result as JSON in the data directory
    #[arg(short, long)]
    pub save: bool,

    /// Directory for saved results
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Also print the prospectus rendering of the result
    #[arg(short, long)]
    pub prospectus: bool,

    /// Print the raw response and parse trace
    #[arg(short, long)]
    pub debug: bool,
}

/// Arguments for the prospectus command.
#[derive(Debug, Parser)]
pub struct ProspectusArgs {
    /// Saved analysis JSON file
    pub json_file: PathBuf,
}

/// Model argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModelArg {
    /// gpt-4o
    #[value(name = "gpt-4o")]
    Gpt4o,
    /// gpt-4o-mini
    #[value(name = "gpt-4o-mini")]
    Gpt4oMini,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<ModelArg> for ModelId {
    fn from(model: ModelArg) -> Self {
        match model {
            ModelArg::Gpt4o => ModelId::Gpt4o,
            ModelArg::Gpt4oMini => ModelId::Gpt4oMini,
        }
    }
}
