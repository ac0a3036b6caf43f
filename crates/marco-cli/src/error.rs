//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Analysis pipeline error
    #[error("Analysis failed during {stage}: {0}", stage = .0.stage())]
    Analyzer(#[from] marco_analyzer::AnalyzerError),

    /// LLM backend setup error
    #[error("LLM error: {0}")]
    Llm(#[from] marco_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Result cannot be rendered as a prospectus
    #[error("Prospectus error: {0}")]
    Prospectus(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use marco_analyzer::AnalyzerError;

    #[test]
    fn test_analyzer_error_names_stage() {
        let err: CliError = AnalyzerError::UnsupportedFormat("xyz".to_string()).into();
        let message = err.to_string();
        assert!(message.starts_with("Analysis failed during document loading"));
        assert!(message.contains("xyz"));
    }
}
