//! Saving extracted results to the data directory.

use crate::error::Result;
use chrono::{DateTime, Local};
use marco_domain::StructuredResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File stem used when a company name sanitizes to nothing.
const FALLBACK_STEM: &str = "company";

/// Keep alphanumerics, spaces, `-` and `_`; trim the rest.
pub fn sanitize_file_stem(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let trimmed = kept.trim();
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Path a result for `company` saved at `at` is written to.
pub fn artifact_path(dir: &Path, company: &str, at: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "{}_{}.json",
        sanitize_file_stem(company),
        at.format("%Y%m%d_%H%M%S")
    ))
}

/// Write `result` as pretty JSON into `dir`, creating it if needed.
pub fn save_json(result: &StructuredResult, company: &str, dir: &Path) -> Result<PathBuf> {
    save_json_at(result, company, dir, Local::now())
}

/// [`save_json`] with an explicit timestamp.
pub fn save_json_at(
    result: &StructuredResult,
    company: &str,
    dir: &Path,
    at: DateTime<Local>,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = artifact_path(dir, company, at);
    let json = serde_json::to_string_pretty(result)?;
    fs::write(&path, json)?;
    info!("Saved analysis to {}", path.display());
    Ok(path)
}

/// Read a saved result back.
pub fn load_json(path: &Path) -> Result<StructuredResult> {
    let contents = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    StructuredResult::from_json(&value).map_err(crate::error::CliError::InvalidInput)
}
