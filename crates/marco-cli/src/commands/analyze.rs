//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::{persist, prospectus};
use marco_analyzer::{AnalysisReport, AnalysisRequest, Analyzer, ExtractionTemplate};
use marco_domain::traits::LlmProvider;
use marco_domain::{ModelId, RawDocument};
use marco_llm::OpenAiProvider;
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the analyze command.
pub async fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let model: ModelId = args.model.map(Into::into).unwrap_or(config.model);
    let template_path = args.template.as_deref().unwrap_or(&config.template_path);

    // Template problems surface before the document or credentials are touched
    let template = ExtractionTemplate::load(template_path)?;

    // The blocking HTTP client must be built off the async runtime
    let timeout = config.analyzer.extraction_timeout();
    let provider = tokio::task::spawn_blocking(move || OpenAiProvider::from_env(timeout))
        .await
        .map_err(|e| CliError::Config(format!("Failed to start LLM client: {}", e)))??;

    let analyzer = Analyzer::new(provider, template, config.analyzer.clone())?;
    let report = analyze_file(&analyzer, &args.file, model).await?;

    println!("{}", render_report(&report, args.debug, formatter)?);
    let (result, _trace) = report.into_parts();

    if args.save {
        let data_dir = args.data_dir.as_deref().unwrap_or(&config.data_dir);
        let company = prospectus::company_name(&result).unwrap_or("company");
        let path = persist::save_json(&result, company, data_dir)?;
        eprintln!("{}", formatter.success(&format!("Saved to {}", path.display())));
    }

    if args.prospectus {
        println!("{}", prospectus::render(&result)?);
    }

    Ok(())
}

/// Read `path` and run it through `analyzer`.
pub async fn analyze_file<L>(analyzer: &Analyzer<L>, path: &Path, model: ModelId) -> Result<AnalysisReport>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::InvalidInput(format!("Not a file: {}", path.display())))?;

    info!("Analyzing {} ({} bytes)", path.display(), bytes.len());
    let request = AnalysisRequest::new(RawDocument::from_file_name(file_name, bytes), model);
    Ok(analyzer.analyze(request).await?)
}

/// Text printed for a finished run.
///
/// JSON output is a single document: the result alone, or the whole report
/// when `debug` is set.
pub fn render_report(report: &AnalysisReport, debug: bool, formatter: &Formatter) -> Result<String> {
    if formatter.format() == OutputFormat::Json {
        return Ok(if debug {
            serde_json::to_string_pretty(report)?
        } else {
            formatter.format_result(&report.result)?
        });
    }

    let mut out = String::new();
    out.push_str(&formatter.run_summary(&report.metadata));
    out.push('\n');
    if !report.metadata.model_invoked {
        out.push_str(&formatter.warning("Document has no text content; the model was not called"));
        out.push('\n');
    }
    out.push_str(&formatter.format_result(&report.result)?);
    if debug {
        out.push_str("\n\n");
        out.push_str(&formatter.format_trace(&report.trace)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marco_analyzer::AnalyzerConfig;
    use marco_llm::MockProvider;
    use tempfile::TempDir;

    const RESPONSE: &str = "# Basic Information\n- Company Name: Acme Corp\nnote without colon";

    fn analyzer(llm: MockProvider) -> Analyzer<MockProvider> {
        let template = ExtractionTemplate::from_text("# Basic Information\n- Company Name:").unwrap();
        Analyzer::new(llm, template, AnalyzerConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_file_uses_file_name_for_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("acme.txt");
        fs::write(&path, "Acme Corp is a Delaware corporation.").unwrap();
        let llm = MockProvider::new(RESPONSE);

        let report = analyze_file(&analyzer(llm.clone()), &path, ModelId::Gpt4oMini)
            .await
            .unwrap();

        assert_eq!(report.result.get("basic_information", "-_company_name"), Some("Acme Corp"));
        assert_eq!(report.metadata.source_name.as_deref(), Some("acme.txt"));
        assert!(llm.last_prompt().unwrap().contains("Delaware corporation"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = analyze_file(
            &analyzer(MockProvider::new(RESPONSE)),
            &dir.path().join("absent.pdf"),
            ModelId::Gpt4o,
        )
        .await;
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_analyzer_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sheet.xlsx");
        fs::write(&path, "data").unwrap();
        let llm = MockProvider::new(RESPONSE);

        let result = analyze_file(&analyzer(llm.clone()), &path, ModelId::Gpt4o).await;

        assert!(matches!(result, Err(CliError::Analyzer(_))));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_render_report_formats() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("acme.txt");
        fs::write(&path, "Acme").unwrap();
        let report = analyze_file(&analyzer(MockProvider::new(RESPONSE)), &path, ModelId::Gpt4o)
            .await
            .unwrap();

        let table = render_report(&report, true, &Formatter::new(OutputFormat::Table, false)).unwrap();
        assert!(table.contains("Acme Corp"));
        assert!(table.contains("note without colon"));

        let json = render_report(&report, false, &Formatter::new(OutputFormat::Json, false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["basic_information"]["-_company_name"], "Acme Corp");

        let full = render_report(&report, true, &Formatter::new(OutputFormat::Json, false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&full).unwrap();
        assert_eq!(value["trace"]["skipped_lines"][0], "note without colon");
    }
}
