//! Sliding-window text chunking

use crate::error::AnalyzerError;

/// Splits text into overlapping windows of at most `max_chars` characters.
///
/// Chunk *i* starts at character `i * (max_chars - overlap_chars)`; the last
/// chunk ends at the end of the text. Lengths count Unicode scalar values, so
/// a chunk boundary never falls inside a UTF-8 sequence.
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    max_chars: usize,
    overlap_chars: usize,
}

impl TextChunker {
    /// Create a new text chunker; requires `0 <= overlap_chars < max_chars`
    pub fn new(max_chars: usize, overlap_chars: usize) -> Result<Self, AnalyzerError> {
        if max_chars == 0 {
            return Err(AnalyzerError::Configuration(
                "chunk length must be greater than 0".to_string(),
            ));
        }
        if overlap_chars >= max_chars {
            return Err(AnalyzerError::Configuration(format!(
                "chunk overlap ({}) must be less than chunk length ({})",
                overlap_chars, max_chars
            )));
        }
        Ok(Self {
            max_chars,
            overlap_chars,
        })
    }

    /// Distance between the starts of consecutive chunks
    fn stride(&self) -> usize {
        self.max_chars - self.overlap_chars
    }

    /// Chunk the given text. Empty text yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        // byte offset of every char boundary, including the end
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = bounds.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < total {
            let end = std::cmp::min(start + self.max_chars, total);
            chunks.push(text[bounds[start]..bounds[end]].to_string());
            if end == total {
                break;
            }
            start += self.stride();
        }
        chunks
    }

    /// Chunk each loader segment in order.
    ///
    /// Segments that are empty or whitespace-only contribute nothing.
    pub fn chunk_segments<S: AsRef<str>>(&self, segments: &[S]) -> Vec<String> {
        segments
            .iter()
            .map(AsRef::as_ref)
            .filter(|segment| !segment.trim().is_empty())
            .flat_map(|segment| self.chunk(segment))
            .collect()
    }

    /// Number of chunks [`chunk`](Self::chunk) produces for a text of `len` characters
    pub fn expected_chunks(&self, len: usize) -> usize {
        match len {
            0 => 0,
            n if n <= self.max_chars => 1,
            n => (n - self.overlap_chars).div_ceil(self.stride()),
        }
    }
}
