//! Parse LLM output into a structured result
//!
//! The model is asked to answer in `# Section` / `key: value` lines. Parsing
//! is a single forward pass; the only state is the currently open section.

use crate::error::AnalyzerError;
use marco_domain::{normalize_key, DebugTrace, LineCounts, StructuredResult};
use tracing::debug;

/// Parse a model response into a [`StructuredResult`] and its [`DebugTrace`].
///
/// Each line is classified as exactly one of:
/// - blank: ignored
/// - header: starts with `#`; opens (or reopens and empties) a section
/// - field: contains `:`; split at the first colon, stored in the open
///   section or at the top level
/// - skipped: anything else, kept verbatim (trimmed) in the trace
///
/// A header is recognized before the colon check, so `# Terms: 2024` is a
/// section named `terms:_2024`. Values keep any later colons (`3:1`).
///
/// # Errors
///
/// Returns [`AnalyzerError::ParseFailure`] when the response is not text,
/// i.e. contains NUL or another C0 control character that is not whitespace
/// (tab, LF, VT, FF and CR are accepted), or DEL.
pub fn parse_response(response: &str) -> Result<(StructuredResult, DebugTrace), AnalyzerError> {
    check_is_text(response)?;

    let mut result = StructuredResult::new();
    let mut parsed_sections: Vec<String> = Vec::new();
    let mut skipped_lines = Vec::new();
    let mut counts = LineCounts::default();
    let mut current: Option<usize> = None;

    for raw in response.lines() {
        let line = raw.trim();
        if line.is_empty() {
            counts.blank += 1;
            continue;
        }

        if line.starts_with('#') {
            counts.headers += 1;
            let name = normalize_key(line.trim_start_matches('#'));
            let idx = result.open_section(name.clone());
            // an empty header name leaves fields at the top level
            current = if name.is_empty() { None } else { Some(idx) };
            if !parsed_sections.contains(&name) {
                parsed_sections.push(name);
            }
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            counts.fields += 1;
            let key = normalize_key(key);
            let value = value.trim();
            match current {
                Some(idx) => result.insert_in_section(idx, key, value),
                None => result.insert_top_level(key, value),
            }
        } else {
            counts.skipped += 1;
            skipped_lines.push(line.to_string());
        }
    }

    debug!(
        "Parsed {} sections, {} fields, skipped {} lines",
        parsed_sections.len(),
        counts.fields,
        counts.skipped
    );

    let trace = DebugTrace::new(response, parsed_sections, skipped_lines, counts);
    Ok((result, trace))
}

fn check_is_text(response: &str) -> Result<(), AnalyzerError> {
    if let Some((offset, c)) = response
        .char_indices()
        .find(|(_, c)| is_binary_control(*c))
    {
        return Err(AnalyzerError::ParseFailure(format!(
            "response is not text: control character U+{:04X} at byte {}",
            c as u32, offset
        )));
    }
    Ok(())
}

/// C0 controls other than whitespace, plus DEL. Form feed, vertical tab and
/// C1 controls such as NEL occur in ordinary text and are treated as text.
fn is_binary_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{e}'..='\u{1f}' | '\u{7f}')
}
