//! Configuration for the Analyzer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum chunk length (characters)
    pub max_chunk_chars: usize,

    /// Characters shared by consecutive chunks; must be below `max_chunk_chars`
    pub chunk_overlap_chars: usize,

    /// Maximum time for the language-model call (seconds)
    pub extraction_timeout_secs: u64,
}

impl AnalyzerConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_chars == 0 {
            return Err("max_chunk_chars must be greater than 0".to_string());
        }
        if self.chunk_overlap_chars >= self.max_chunk_chars {
            return Err(format!(
                "chunk_overlap_chars ({}) must be less than max_chunk_chars ({})",
                self.chunk_overlap_chars, self.max_chunk_chars
            ));
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 2_000,
            chunk_overlap_chars: 200,
            extraction_timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_chunk_size() {
        let mut config = AnalyzerConfig::default();
        config.max_chunk_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlap_must_be_below_chunk_size() {
        let mut config = AnalyzerConfig::default();
        config.chunk_overlap_chars = config.max_chunk_chars;
        assert!(config.validate().is_err());

        config.chunk_overlap_chars = config.max_chunk_chars - 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AnalyzerConfig::default();
        config.extraction_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnalyzerConfig {
            max_chunk_chars: 500,
            chunk_overlap_chars: 50,
            extraction_timeout_secs: 30,
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = AnalyzerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = AnalyzerConfig::from_toml("max_chunk_chars = 4000").unwrap();
        assert_eq!(parsed.max_chunk_chars, 4000);
        assert_eq!(parsed.chunk_overlap_chars, 200);
        assert_eq!(parsed.extraction_timeout_secs, 120);
    }
}
