//! Document loading: uploaded bytes to plain text segments
//!
//! The payload is staged in a temporary file that the format reader opens.
//! The file is a [`tempfile::NamedTempFile`] owned by the loading call, so it
//! is removed when that call returns, whether it succeeded or failed.

use crate::error::AnalyzerError;
use marco_domain::{DocumentFormat, RawDocument};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Text extracted from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    /// Detected format
    pub format: DocumentFormat,

    /// Ordered text segments: one per page for PDF, one otherwise
    pub segments: Vec<String>,
}

impl LoadedDocument {
    /// Total characters across all segments
    pub fn char_count(&self) -> usize {
        self.segments.iter().map(|s| s.chars().count()).sum()
    }
}

/// Reads uploaded documents
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load a document, staging it in the system temporary directory
    pub fn load(document: &RawDocument) -> Result<LoadedDocument, AnalyzerError> {
        let format = detect(document)?;
        let staged = stage(document, format, None)?;
        read(format, staged.path())
    }

    /// Load a document, staging it inside `dir`
    pub fn load_in(document: &RawDocument, dir: &Path) -> Result<LoadedDocument, AnalyzerError> {
        let format = detect(document)?;
        let staged = stage(document, format, Some(dir))?;
        read(format, staged.path())
    }
}

fn detect(document: &RawDocument) -> Result<DocumentFormat, AnalyzerError> {
    document
        .format()
        .ok_or_else(|| AnalyzerError::UnsupportedFormat(document.extension.clone()))
}

fn stage(
    document: &RawDocument,
    format: DocumentFormat,
    dir: Option<&Path>,
) -> Result<NamedTempFile, AnalyzerError> {
    let suffix = format!(".{}", format.extension());
    let mut builder = tempfile::Builder::new();
    builder.prefix("marco-upload-").suffix(&suffix);

    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| AnalyzerError::load(format, format!("cannot create temporary file: {}", e)))?;

    file.write_all(&document.bytes)
        .and_then(|_| file.flush())
        .map_err(|e| AnalyzerError::load(format, format!("cannot stage upload: {}", e)))?;

    debug!(
        "Staged {} ({} bytes) at {}",
        document.display_name(),
        document.bytes.len(),
        file.path().display()
    );
    Ok(file)
}

fn read(format: DocumentFormat, path: &Path) -> Result<LoadedDocument, AnalyzerError> {
    let segments = match format {
        DocumentFormat::Pdf => read_pdf(path)?,
        DocumentFormat::Docx => vec![read_docx(path)?],
        DocumentFormat::Txt => vec![read_txt(path)?],
    };
    Ok(LoadedDocument { format, segments })
}

fn read_pdf(path: &Path) -> Result<Vec<String>, AnalyzerError> {
    let pdf = lopdf::Document::load(path).map_err(|e| AnalyzerError::load("pdf", e))?;
    if pdf.is_encrypted() {
        return Err(AnalyzerError::load("pdf", "document is encrypted"));
    }

    // get_pages is keyed by 1-based page number, already in order
    pdf.get_pages()
        .keys()
        .map(|&page| {
            pdf.extract_text(&[page])
                .map_err(|e| AnalyzerError::load("pdf", format!("page {}: {}", page, e)))
        })
        .collect()
}

fn read_docx(path: &Path) -> Result<String, AnalyzerError> {
    let bytes = fs::read(path).map_err(|e| AnalyzerError::load("docx", e))?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| AnalyzerError::load("docx", format!("{:?}", e)))?;

    let mut blocks = Vec::new();
    for child in &docx.document.children {
        let text = match child {
            docx_rs::DocumentChild::Paragraph(para) => paragraph_text(para),
            docx_rs::DocumentChild::Table(table) => table_text(table),
            _ => continue,
        };
        if !text.trim().is_empty() {
            blocks.push(text);
        }
    }
    Ok(blocks.join("\n"))
}

/// One line per row, cells separated by tabs
fn table_text(table: &docx_rs::Table) -> String {
    let mut rows = Vec::new();
    for docx_rs::TableChild::TableRow(row) in &table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|docx_rs::TableRowChild::TableCell(cell)| cell_text(cell))
            .collect();
        if cells.iter().any(|c| !c.trim().is_empty()) {
            rows.push(cells.join("\t"));
        }
    }
    rows.join("\n")
}

fn cell_text(cell: &docx_rs::TableCell) -> String {
    let mut parts = Vec::new();
    for content in &cell.children {
        let text = match content {
            docx_rs::TableCellContent::Paragraph(para) => paragraph_text(para),
            docx_rs::TableCellContent::Table(table) => table_text(table),
            _ => continue,
        };
        if !text.trim().is_empty() {
            parts.push(text);
        }
    }
    parts.join(" ")
}

/// Runs in a paragraph are parts of the same sentence, so they join without a separator
fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for rc in &run.children {
                match rc {
                    docx_rs::RunChild::Text(t) => text.push_str(&t.text),
                    docx_rs::RunChild::Tab(_) => text.push('\t'),
                    docx_rs::RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}

fn read_txt(path: &Path) -> Result<String, AnalyzerError> {
    let text = fs::read_to_string(path).map_err(|e| AnalyzerError::load("txt", e))?;
    Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn staged_files(dir: &TempDir) -> usize {
        fs::read_dir(dir.path()).unwrap().count()
    }

    #[test]
    fn test_unsupported_extension() {
        let doc = RawDocument::new(b"whatever".to_vec(), "xyz");
        let err = DocumentLoader::load(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.to_string().contains("xyz"));
    }

    #[test]
    fn test_unsupported_extension_stages_nothing() {
        let dir = TempDir::new().unwrap();
        let doc = RawDocument::new(b"whatever".to_vec(), ".xyz");
        assert!(DocumentLoader::load_in(&doc, dir.path()).is_err());
        assert_eq!(staged_files(&dir), 0);
    }

    #[test]
    fn test_load_txt() {
        let doc = RawDocument::from_file_name("notes.txt", "Company: Acme\nFounded 1999".as_bytes());
        let loaded = DocumentLoader::load(&doc).unwrap();
        assert_eq!(loaded.format, DocumentFormat::Txt);
        assert_eq!(loaded.segments, vec!["Company: Acme\nFounded 1999".to_string()]);
        assert_eq!(loaded.char_count(), 26);
    }

    #[test]
    fn test_txt_strips_byte_order_mark() {
        let doc = RawDocument::new("\u{feff}hello".as_bytes().to_vec(), "TXT");
        let loaded = DocumentLoader::load(&doc).unwrap();
        assert_eq!(loaded.segments, vec!["hello".to_string()]);
    }

    #[test]
    fn test_invalid_utf8_txt_is_load_failure() {
        let doc = RawDocument::new(vec![0xff, 0xfe, 0xfd, 0x00], "txt");
        let err = DocumentLoader::load(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LoadFailure);
    }

    #[test]
    fn test_garbage_pdf_is_load_failure() {
        let doc = RawDocument::new(b"this is not a pdf".to_vec(), "pdf");
        let err = DocumentLoader::load(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LoadFailure);
        assert!(err.to_string().contains("pdf"));
    }

    #[test]
    fn test_garbage_docx_is_load_failure() {
        let doc = RawDocument::new(b"PK not really a zip".to_vec(), "docx");
        let err = DocumentLoader::load(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LoadFailure);
    }

    #[test]
    fn test_temp_file_removed_after_success() {
        let dir = TempDir::new().unwrap();
        let doc = RawDocument::new(b"plain text".to_vec(), "txt");
        DocumentLoader::load_in(&doc, dir.path()).unwrap();
        assert_eq!(staged_files(&dir), 0);
    }

    #[test]
    fn test_temp_file_removed_after_failure() {
        let dir = TempDir::new().unwrap();
        let doc = RawDocument::new(b"%PDF-1.4 truncated".to_vec(), "pdf");
        assert!(DocumentLoader::load_in(&doc, dir.path()).is_err());
        assert_eq!(staged_files(&dir), 0);
    }

    #[test]
    fn test_load_docx_paragraphs() {
        let mut buf = std::io::Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Acme Corp")))
            .add_paragraph(docx_rs::Paragraph::new())
            .add_paragraph(
                docx_rs::Paragraph::new()
                    .add_run(docx_rs::Run::new().add_text("Founded "))
                    .add_run(docx_rs::Run::new().add_text("1999")),
            )
            .build()
            .pack(&mut buf)
            .unwrap();

        let doc = RawDocument::new(buf.into_inner(), "docx");
        let loaded = DocumentLoader::load(&doc).unwrap();
        assert_eq!(loaded.format, DocumentFormat::Docx);
        assert_eq!(loaded.segments, vec!["Acme Corp\nFounded 1999".to_string()]);
    }

    #[test]
    fn test_load_docx_table_text() {
        let cell = |text: &str| {
            docx_rs::TableCell::new()
                .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(text)))
        };
        let table = docx_rs::Table::new(vec![
            docx_rs::TableRow::new(vec![cell("Revenue"), cell("10M")]),
            docx_rs::TableRow::new(vec![cell("Net Income"), cell("2M")]),
        ]);

        let mut buf = std::io::Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Acme Corp")))
            .add_table(table)
            .build()
            .pack(&mut buf)
            .unwrap();

        let doc = RawDocument::new(buf.into_inner(), "docx");
        let loaded = DocumentLoader::load(&doc).unwrap();
        assert_eq!(
            loaded.segments,
            vec!["Acme Corp\nRevenue\t10M\nNet Income\t2M".to_string()]
        );
    }
}
