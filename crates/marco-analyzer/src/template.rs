//! Extraction template loading

use crate::error::AnalyzerError;
use marco_domain::normalize_key;
use std::fs;
use std::path::{Path, PathBuf};

/// Static text listing the sections and fields the model should extract.
///
/// Loaded once per session; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTemplate {
    text: String,
    source: Option<PathBuf>,
}

impl ExtractionTemplate {
    /// Default location, relative to the working directory
    pub const DEFAULT_PATH: &'static str = "prompts/analysis_agent.md";

    /// Read a template file.
    ///
    /// A missing, unreadable or blank file is a configuration error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::Configuration(format!(
                "Analysis template not found at {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut template = Self::from_text(text)?;
        template.source = Some(path.to_path_buf());
        Ok(template)
    }

    /// Build a template from text already in memory
    pub fn from_text(text: impl Into<String>) -> Result<Self, AnalyzerError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AnalyzerError::Configuration("Analysis template is empty".to_string()));
        }
        Ok(Self { text, source: None })
    }

    /// Template text, verbatim
    pub fn text(&self) -> &str {
        &self.text
    }

    /// File the template was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Normalized names of the `#` headers the template declares
    pub fn section_names(&self) -> Vec<String> {
        self.text
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with('#'))
            .map(|line| normalize_key(line.trim_start_matches('#')))
            .filter(|name| !name.is_empty())
            .collect()
    }
}
