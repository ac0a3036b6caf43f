//! Core Analyzer implementation

use crate::chunking::TextChunker;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::loader::{DocumentLoader, LoadedDocument};
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::template::ExtractionTemplate;
use crate::types::{AnalysisMetadata, AnalysisReport, AnalysisRequest};
use marco_domain::traits::LlmProvider;
use marco_domain::{DebugTrace, ModelId, RawDocument, RunId, StructuredResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs the document analysis pipeline:
/// load → chunk → prompt → model call → parse.
///
/// The template is fixed for the lifetime of an `Analyzer`; each call to
/// [`analyze`](Self::analyze) is an independent run.
pub struct Analyzer<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    template: ExtractionTemplate,
    config: AnalyzerConfig,
    chunker: TextChunker,
    staging_dir: Option<PathBuf>,
}

impl<L> Analyzer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new Analyzer
    pub fn new(
        llm_provider: L,
        template: ExtractionTemplate,
        config: AnalyzerConfig,
    ) -> Result<Self, AnalyzerError> {
        config.validate().map_err(AnalyzerError::Configuration)?;
        let chunker = TextChunker::new(config.max_chunk_chars, config.chunk_overlap_chars)?;
        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            template,
            config,
            chunker,
            staging_dir: None,
        })
    }

    /// Create an Analyzer, reading the template from `path`.
    ///
    /// Fails with a configuration error before any document is seen if the
    /// template is missing.
    pub fn from_template_file(
        llm_provider: L,
        path: impl AsRef<Path>,
        config: AnalyzerConfig,
    ) -> Result<Self, AnalyzerError> {
        let template = ExtractionTemplate::load(path)?;
        Self::new(llm_provider, template, config)
    }

    /// Stage uploads in `dir` instead of the system temporary directory
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Template in use
    pub fn template(&self) -> &ExtractionTemplate {
        &self.template
    }

    /// Configuration in use
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one document
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisReport, AnalyzerError> {
        let started = Instant::now();
        let run_id = RunId::new();
        let document = &request.document;

        info!(
            "Starting analysis {} of '{}' ({} bytes, model {})",
            run_id,
            document.display_name(),
            document.bytes.len(),
            request.model
        );

        // 1. Load
        let loaded = self.load(document)?;
        debug!(
            "Loaded {} segment(s), {} chars as {}",
            loaded.segments.len(),
            loaded.char_count(),
            loaded.format
        );

        // 2. Chunk
        let chunks = self.chunker.chunk_segments(&loaded.segments);
        info!("Split document into {} chunks", chunks.len());

        let mut metadata = AnalysisMetadata {
            run_id,
            model: request.model,
            backend: self.llm_provider.backend_name().to_string(),
            source_name: document.file_name.clone(),
            format: loaded.format,
            segment_count: loaded.segments.len(),
            chunk_count: chunks.len(),
            content_chars: 0,
            model_invoked: false,
            timestamp: 0,
            processing_time_ms: 0,
        };

        if chunks.is_empty() {
            warn!("Document '{}' has no text content; skipping model call", document.display_name());
            finish(&mut metadata, started);
            return Ok(AnalysisReport {
                result: StructuredResult::new(),
                trace: DebugTrace::empty(),
                metadata,
            });
        }

        // 3. Prompt
        let builder = PromptBuilder::from_chunks(&self.template, &chunks);
        metadata.content_chars = builder.content().chars().count();
        let prompt = builder.build();
        debug!("Prompt length: {} chars", prompt.len());

        // 4. Model call, bounded by the configured timeout. A blocking call
        // cannot be cancelled: after a timeout its thread keeps running until
        // the provider's own HTTP request timeout ends it.
        metadata.model_invoked = true;
        let response = timeout(
            self.config.extraction_timeout(),
            self.call_llm(request.model, prompt),
        )
        .await
        .map_err(|_| {
            AnalyzerError::ExtractionFailure(format!(
                "model call timed out after {}s",
                self.config.extraction_timeout_secs
            ))
        })??;
        debug!("LLM response length: {} chars", response.len());

        // 5. Parse
        let (result, trace) = parse_response(&response)?;
        self.log_missing_sections(&trace);

        finish(&mut metadata, started);
        info!(
            "Analysis {} complete: {} sections, {} fields, {} skipped lines in {} ms",
            run_id,
            result.sections().len(),
            result.field_count(),
            trace.skipped_lines().len(),
            metadata.processing_time_ms
        );

        Ok(AnalysisReport { result, trace, metadata })
    }

    /// Load and chunk a document without calling the model
    pub fn prepare(&self, document: &RawDocument) -> Result<(LoadedDocument, Vec<String>), AnalyzerError> {
        let loaded = self.load(document)?;
        let chunks = self.chunker.chunk_segments(&loaded.segments);
        Ok((loaded, chunks))
    }

    fn load(&self, document: &RawDocument) -> Result<LoadedDocument, AnalyzerError> {
        match &self.staging_dir {
            Some(dir) => DocumentLoader::load_in(document, dir),
            None => DocumentLoader::load(document),
        }
    }

    fn log_missing_sections(&self, trace: &DebugTrace) {
        let missing: Vec<String> = self
            .template
            .section_names()
            .into_iter()
            .filter(|name| !trace.parsed_sections().contains(name))
            .collect();
        if !missing.is_empty() {
            debug!("Template sections absent from response: {}", missing.join(", "));
        }
    }

    /// Call the LLM provider
    async fn call_llm(&self, model: ModelId, prompt: String) -> Result<String, AnalyzerError> {
        let llm = Arc::clone(&self.llm_provider);

        // LlmProvider is blocking
        tokio::task::spawn_blocking(move || {
            llm.generate(model.as_str(), &prompt)
                .map_err(|e| AnalyzerError::ExtractionFailure(e.to_string()))
        })
        .await
        .map_err(|e| AnalyzerError::ExtractionFailure(format!("Task join error: {}", e)))?
    }
}

fn finish(metadata: &mut AnalysisMetadata, started: Instant) {
    metadata.processing_time_ms = started.elapsed().as_millis() as u64;
    metadata.timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use marco_llm::MockProvider;

    fn create_test_analyzer(response: &str) -> (Analyzer<MockProvider>, MockProvider) {
        let llm = MockProvider::new(response);
        let template = ExtractionTemplate::from_text("# Basic Information\n- Company Name:").unwrap();
        let analyzer = Analyzer::new(llm.clone(), template, AnalyzerConfig::default()).unwrap();
        (analyzer, llm)
    }

    fn txt_request(text: &str) -> AnalysisRequest {
        AnalysisRequest::new(RawDocument::new(text.as_bytes().to_vec(), "txt"), ModelId::Gpt4o)
    }

    #[tokio::test]
    async fn test_analyze_returns_parsed_result() {
        let (analyzer, llm) = create_test_analyzer("# Basic Information\ncompany_name: Acme Corp");

        let report = analyzer.analyze(txt_request("Acme Corp annual report")).await.unwrap();

        assert_eq!(report.result.get("basic_information", "company_name"), Some("Acme Corp"));
        assert!(report.metadata.model_invoked);
        assert_eq!(report.metadata.chunk_count, 1);
        assert_eq!(llm.call_count(), 1);
        assert_eq!(llm.last_model().as_deref(), Some("gpt-4o"));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let template = ExtractionTemplate::from_text("# A").unwrap();
        let config = AnalyzerConfig {
            max_chunk_chars: 10,
            chunk_overlap_chars: 10,
            extraction_timeout_secs: 5,
        };
        let result = Analyzer::new(MockProvider::default(), template, config);
        assert!(matches!(result, Err(AnalyzerError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_whitespace_document_short_circuits() {
        let (analyzer, llm) = create_test_analyzer("# Should not be used");

        let report = analyzer.analyze(txt_request("  \n\t ")).await.unwrap();

        assert!(report.result.is_empty());
        assert!(!report.metadata.model_invoked);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_format_propagates() {
        let (analyzer, llm) = create_test_analyzer("");
        let request = AnalysisRequest::new(RawDocument::new(b"data".to_vec(), "xyz"), ModelId::Gpt4o);

        let err = analyzer.analyze(request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert_eq!(llm.call_count(), 0);
    }
}
