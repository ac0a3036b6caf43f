//! Language models an analysis may run against

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized model identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelId {
    /// Full-size model, the default
    #[default]
    #[serde(rename = "gpt-4o")]
    Gpt4o,

    /// Smaller, cheaper model
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
}

impl ModelId {
    /// Get the model identifier as sent to the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gpt4o => "gpt-4o",
            ModelId::Gpt4oMini => "gpt-4o-mini",
        }
    }

    /// Parse a model identifier
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gpt-4o" => Some(ModelId::Gpt4o),
            "gpt-4o-mini" => Some(ModelId::Gpt4oMini),
            _ => None,
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unrecognized model: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_models() {
        assert_eq!("gpt-4o".parse::<ModelId>(), Ok(ModelId::Gpt4o));
        assert_eq!("GPT-4o-Mini".parse::<ModelId>(), Ok(ModelId::Gpt4oMini));
    }

    #[test]
    fn test_parse_unknown_model() {
        assert!("gpt-3.5-turbo".parse::<ModelId>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&ModelId::Gpt4oMini).unwrap();
        assert_eq!(json, "\"gpt-4o-mini\"");
        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelId::Gpt4oMini);
    }
}
