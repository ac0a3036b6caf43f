//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use marco_analyzer::AnalysisMetadata;
use marco_domain::{DebugTrace, StructuredResult};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Output format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extracted result.
    pub fn format_result(&self, result: &StructuredResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Table => Ok(self.format_result_table(result)),
        }
    }

    /// Format a result as a table, one row per field.
    fn format_result_table(&self, result: &StructuredResult) -> String {
        if result.field_count() == 0 {
            return self.colorize("No fields extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Section", "Field", "Value"]);

        for (key, value) in result.top_level() {
            builder.push_record(["", key.as_str(), value.as_str()]);
        }
        for section in result.sections() {
            for (key, value) in section.fields() {
                builder.push_record([section.name(), key.as_str(), value.as_str()]);
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the debug trace of a run.
    pub fn format_trace(&self, trace: &DebugTrace) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(trace)?);
        }

        let counts = trace.line_counts();
        let mut out = String::new();
        out.push_str(&self.colorize("Raw response:", "cyan"));
        out.push('\n');
        out.push_str(trace.raw_response());
        out.push_str("\n\n");
        out.push_str(&self.colorize("Parsed sections:", "cyan"));
        out.push_str(&format!(" {}\n", trace.parsed_sections().join(", ")));
        out.push_str(&format!(
            "Lines: {} headers, {} fields, {} skipped, {} blank\n",
            counts.headers, counts.fields, counts.skipped, counts.blank
        ));
        if !trace.skipped_lines().is_empty() {
            out.push_str(&self.colorize("Skipped lines:", "yellow"));
            out.push('\n');
            for line in trace.skipped_lines() {
                out.push_str(&format!("  {}\n", line));
            }
        }
        Ok(out)
    }

    /// One-line summary of a run.
    pub fn run_summary(&self, metadata: &AnalysisMetadata) -> String {
        let msg = format!(
            "Analyzed {} ({}, {} chunk(s)) with {} in {} ms",
            metadata.source_name.as_deref().unwrap_or("<upload>"),
            metadata.format,
            metadata.chunk_count,
            metadata.model,
            metadata.processing_time_ms
        );
        self.info(&msg)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
