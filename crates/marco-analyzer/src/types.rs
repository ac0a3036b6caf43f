//! Request and response types for analysis

use crate::error::AnalyzerError;
use marco_domain::{DebugTrace, DocumentFormat, ModelId, RawDocument, RunId, StructuredResult};
use serde::Serialize;

/// Request to analyze one uploaded document
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Uploaded document
    pub document: RawDocument,

    /// Model to run the extraction with
    pub model: ModelId,
}

impl AnalysisRequest {
    /// Create a request
    pub fn new(document: RawDocument, model: ModelId) -> Self {
        Self { document, model }
    }

    /// Create a request from a model identifier string.
    ///
    /// Anything other than `gpt-4o` or `gpt-4o-mini` is a configuration error.
    pub fn with_model_name(document: RawDocument, model: &str) -> Result<Self, AnalyzerError> {
        let model = model.parse::<ModelId>().map_err(AnalyzerError::Configuration)?;
        Ok(Self::new(document, model))
    }
}

/// Result of a successful analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Extracted sections and fields
    pub result: StructuredResult,

    /// Raw response and line classification
    pub trace: DebugTrace,

    /// Metadata about the run
    pub metadata: AnalysisMetadata,
}

impl AnalysisReport {
    /// Split into the `(result, trace)` pair
    pub fn into_parts(self) -> (StructuredResult, DebugTrace) {
        (self.result, self.trace)
    }
}

/// Metadata about an analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// Run identifier
    pub run_id: RunId,

    /// Model the request asked for
    pub model: ModelId,

    /// Backend that served the call
    pub backend: String,

    /// Uploaded file name, if known
    pub source_name: Option<String>,

    /// Detected document format
    pub format: DocumentFormat,

    /// Segments produced by the loader
    pub segment_count: usize,

    /// Chunks produced by the chunker
    pub chunk_count: usize,

    /// Characters of document text sent to the model
    pub content_chars: usize,

    /// False when the run short-circuited on empty content
    pub model_invoked: bool,

    /// Unix timestamp (seconds) when the run finished
    pub timestamp: u64,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_with_model_name() {
        let doc = RawDocument::new(b"text".to_vec(), "txt");
        let request = AnalysisRequest::with_model_name(doc.clone(), " GPT-4o-mini ").unwrap();
        assert_eq!(request.model, ModelId::Gpt4oMini);

        let err = AnalysisRequest::with_model_name(doc, "gpt-3.5-turbo").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
        assert!(err.to_string().contains("gpt-3.5-turbo"));
    }

    #[test]
    fn test_into_parts() {
        let mut result = StructuredResult::new();
        let idx = result.open_section("basic_information");
        result.insert_in_section(idx, "company_name", "Acme");
        let report = AnalysisReport {
            result: result.clone(),
            trace: DebugTrace::empty(),
            metadata: AnalysisMetadata {
                run_id: RunId::new(),
                model: ModelId::Gpt4o,
                backend: "mock".to_string(),
                source_name: None,
                format: DocumentFormat::Txt,
                segment_count: 1,
                chunk_count: 1,
                content_chars: 4,
                model_invoked: true,
                timestamp: 0,
                processing_time_ms: 0,
            },
        };

        let (parts_result, parts_trace) = report.into_parts();
        assert_eq!(parts_result, result);
        assert_eq!(parts_trace, DebugTrace::empty());
    }
}
