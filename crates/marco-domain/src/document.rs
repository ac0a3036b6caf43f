//! Uploaded documents and the formats the loader understands

use serde::Serialize;
use std::fmt;

/// Document formats recognized by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Portable Document Format, one text segment per page
    Pdf,

    /// Office Open XML word processing document
    Docx,

    /// Plain UTF-8 text
    Txt,
}

impl DocumentFormat {
    /// All recognized formats
    pub const ALL: [DocumentFormat; 3] = [DocumentFormat::Pdf, DocumentFormat::Docx, DocumentFormat::Txt];

    /// Canonical file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
        }
    }

    /// Detect the format from an extension hint.
    ///
    /// Matching is case-insensitive and tolerates a leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use marco_domain::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_extension(".PDF"), Some(DocumentFormat::Pdf));
    /// assert_eq!(DocumentFormat::from_extension("xyz"), None);
    /// ```
    pub fn from_extension(hint: &str) -> Option<Self> {
        let hint = hint.trim().trim_start_matches('.');
        match hint.to_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" => Some(DocumentFormat::Txt),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// An uploaded document: opaque bytes plus the extension the uploader declared
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// File contents
    pub bytes: Vec<u8>,

    /// Declared extension (e.g. "pdf"), used for format detection
    pub extension: String,

    /// Original file name, for display and logging only
    pub file_name: Option<String>,
}

impl RawDocument {
    /// Create a document from bytes and an extension hint
    pub fn new(bytes: impl Into<Vec<u8>>, extension: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            extension: extension.into(),
            file_name: None,
        }
    }

    /// Create a document from a file name, taking the extension from
    /// whatever follows the last dot
    ///
    /// # Examples
    ///
    /// ```
    /// use marco_domain::RawDocument;
    ///
    /// let doc = RawDocument::from_file_name("Acme Annual Report.PDF", vec![1, 2, 3]);
    /// assert_eq!(doc.extension, "PDF");
    /// assert_eq!(doc.file_name.as_deref(), Some("Acme Annual Report.PDF"));
    /// ```
    pub fn from_file_name(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default();
        Self {
            bytes: bytes.into(),
            extension,
            file_name: Some(file_name),
        }
    }

    /// Format detected from the declared extension, if recognized
    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_extension(&self.extension)
    }

    /// Name to show in logs and reports
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("<upload>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_extension("DOCX"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_extension("Txt"), Some(DocumentFormat::Txt));
        assert_eq!(DocumentFormat::from_extension(".pdf"), Some(DocumentFormat::Pdf));
    }

    #[test]
    fn test_unknown_extensions() {
        assert_eq!(DocumentFormat::from_extension("xyz"), None);
        assert_eq!(DocumentFormat::from_extension(""), None);
        assert_eq!(DocumentFormat::from_extension("doc"), None);
    }

    #[test]
    fn test_file_name_without_extension() {
        let doc = RawDocument::from_file_name("README", b"hello".to_vec());
        assert_eq!(doc.extension, "");
        assert_eq!(doc.format(), None);
    }

    #[test]
    fn test_extension_round_trip() {
        for format in DocumentFormat::ALL {
            assert_eq!(DocumentFormat::from_extension(format.extension()), Some(format));
        }
    }
}
