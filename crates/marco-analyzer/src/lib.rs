//! Marco Analyzer
//!
//! Extracts structured company information from uploaded documents with a
//! single language-model call.
//!
//! # Architecture
//!
//! ```text
//! RawDocument → DocumentLoader → TextChunker → PromptBuilder → LLM → parse_response
//!                                                  ↑ template
//! ```
//!
//! # Key Features
//!
//! - **Document Loading**: PDF (per page), DOCX and plain text
//! - **Chunking**: fixed-size overlapping character windows
//! - **Deterministic Extraction**: temperature zero, bounded timeout, no retries
//! - **Traceable Parsing**: every response line is classified in a `DebugTrace`
//!
//! # Example Usage
//!
//! ```no_run
//! use marco_analyzer::{Analyzer, AnalyzerConfig, AnalysisRequest, ExtractionTemplate};
//! use marco_domain::{ModelId, RawDocument};
//! use marco_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("# Basic Information\ncompany_name: Acme Corp");
//! let template = ExtractionTemplate::load("prompts/analysis_agent.md")?;
//! let analyzer = Analyzer::new(llm, template, AnalyzerConfig::default())?;
//!
//! let document = RawDocument::from_file_name("acme.txt", "Acme Corp was founded in 1999.");
//! let report = analyzer.analyze(AnalysisRequest::new(document, ModelId::Gpt4o)).await?;
//!
//! println!("{}", serde_json::to_string_pretty(&report.result)?);
//! println!("Skipped lines: {:?}", report.trace.skipped_lines());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod chunking;
mod config;
mod error;
mod loader;
mod parser;
mod prompt;
mod template;
mod types;


pub use analyzer::Analyzer;
pub use chunking::TextChunker;
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, ErrorKind, Stage};
pub use loader::{DocumentLoader, LoadedDocument};
pub use parser::parse_response;
pub use prompt::PromptBuilder;
pub use template::ExtractionTemplate;
pub use types::{AnalysisMetadata, AnalysisReport, AnalysisRequest};
