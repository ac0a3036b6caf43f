//! Diagnostic record of how a model response was parsed

use serde::Serialize;

/// How many response lines fell into each classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LineCounts {
    /// `#`-prefixed section header lines
    pub headers: usize,

    /// `key: value` lines
    pub fields: usize,

    /// Lines that matched neither form
    pub skipped: usize,

    /// Empty or whitespace-only lines
    pub blank: usize,
}

impl LineCounts {
    /// Sum over all classes; equals the number of input lines
    pub fn total(&self) -> usize {
        self.headers + self.fields + self.skipped + self.blank
    }
}

/// Raw model output plus the parser's line classification.
///
/// Built once by the parser and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DebugTrace {
    raw_response: String,
    parsed_sections: Vec<String>,
    skipped_lines: Vec<String>,
    line_counts: LineCounts,
}

impl DebugTrace {
    /// Assemble a trace
    pub fn new(
        raw_response: impl Into<String>,
        parsed_sections: Vec<String>,
        skipped_lines: Vec<String>,
        line_counts: LineCounts,
    ) -> Self {
        Self {
            raw_response: raw_response.into(),
            parsed_sections,
            skipped_lines,
            line_counts,
        }
    }

    /// Trace for a run that never reached the model
    pub fn empty() -> Self {
        Self::default()
    }

    /// Model output exactly as received
    pub fn raw_response(&self) -> &str {
        &self.raw_response
    }

    /// Section names in the order first encountered
    pub fn parsed_sections(&self) -> &[String] {
        &self.parsed_sections
    }

    /// Lines that were neither headers nor fields, trimmed
    pub fn skipped_lines(&self) -> &[String] {
        &self.skipped_lines
    }

    /// Per-class line tallies
    pub fn line_counts(&self) -> LineCounts {
        self.line_counts
    }
}
