//! Error types for the Analyzer

use std::fmt;
use thiserror::Error;

/// Errors that can occur during analysis
///
/// Every variant aborts the run it occurred in; nothing is retried and no
/// partial result is returned.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Declared extension is not a recognized document format
    #[error("Unsupported format: '{0}' (expected pdf, docx or txt)")]
    UnsupportedFormat(String),

    /// Payload could not be decoded by the format reader
    #[error("Failed to load {format} document: {reason}")]
    LoadFailure {
        /// Format the payload was read as
        format: String,
        /// Underlying reader error
        reason: String,
    },

    /// Language-model call failed (network, auth, rate limit or timeout)
    #[error("Extraction failed: {0}")]
    ExtractionFailure(String),

    /// Model output was not parseable text
    #[error("Failed to parse response: {0}")]
    ParseFailure(String),

    /// Configuration error, including a missing template
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Discriminant of [`AnalyzerError`], for callers that branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`AnalyzerError::UnsupportedFormat`]
    UnsupportedFormat,
    /// See [`AnalyzerError::LoadFailure`]
    LoadFailure,
    /// See [`AnalyzerError::ExtractionFailure`]
    ExtractionFailure,
    /// See [`AnalyzerError::ParseFailure`]
    ParseFailure,
    /// See [`AnalyzerError::Configuration`]
    ConfigurationError,
}

/// Pipeline step an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Session setup (template, config)
    Setup,
    /// Document loading
    Load,
    /// Language-model call
    Extraction,
    /// Response parsing
    Parse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Setup => "setup",
            Stage::Load => "document loading",
            Stage::Extraction => "extraction",
            Stage::Parse => "response parsing",
        };
        f.write_str(name)
    }
}

impl AnalyzerError {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyzerError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            AnalyzerError::LoadFailure { .. } => ErrorKind::LoadFailure,
            AnalyzerError::ExtractionFailure(_) => ErrorKind::ExtractionFailure,
            AnalyzerError::ParseFailure(_) => ErrorKind::ParseFailure,
            AnalyzerError::Configuration(_) => ErrorKind::ConfigurationError,
        }
    }

    /// Step of the pipeline that failed
    pub fn stage(&self) -> Stage {
        match self {
            AnalyzerError::UnsupportedFormat(_) | AnalyzerError::LoadFailure { .. } => Stage::Load,
            AnalyzerError::ExtractionFailure(_) => Stage::Extraction,
            AnalyzerError::ParseFailure(_) => Stage::Parse,
            AnalyzerError::Configuration(_) => Stage::Setup,
        }
    }

    pub(crate) fn load(format: impl fmt::Display, reason: impl fmt::Display) -> Self {
        AnalyzerError::LoadFailure {
            format: format.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<marco_llm::LlmError> for AnalyzerError {
    fn from(e: marco_llm::LlmError) -> Self {
        AnalyzerError::ExtractionFailure(e.to_string())
    }
}
