//! Prospectus markdown rendering of an extracted result.

use crate::error::{CliError, Result};
use chrono::{DateTime, Local};
use marco_domain::StructuredResult;

/// Sections a result must have to be rendered.
pub const REQUIRED_SECTIONS: [&str; 3] = ["basic_information", "share_offering_details", "company_overview"];

/// Rendered sections in order, with their headings.
const SECTIONS: [(&str, &str); 8] = [
    ("basic_information", "Basic Information"),
    ("share_offering_details", "Share Offering Details"),
    ("company_overview", "Company Overview"),
    ("management_structure", "Management Structure"),
    ("financial_information", "Financial Information"),
    ("market_analysis", "Market Analysis"),
    ("risk_factors", "Risk Factors"),
    ("future_plans", "Future Plans"),
];

/// Company name from `basic_information`, in either the plain or the
/// bulleted (`- Company Name:`) key form. Empty values count as absent.
pub fn company_name(result: &StructuredResult) -> Option<&str> {
    let section = result.section("basic_information")?;
    ["company_name", "-_company_name"]
        .iter()
        .filter_map(|key| section.get(key))
        .map(str::trim)
        .find(|name| !name.is_empty())
}

/// Check that a result carries enough to render a prospectus.
pub fn validate(result: &StructuredResult) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|name| result.section(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(CliError::Prospectus(format!(
            "Missing required sections: {}",
            missing.join(", ")
        )));
    }

    if company_name(result).is_none() {
        return Err(CliError::Prospectus("Company name is required".to_string()));
    }
    Ok(())
}

/// Render a prospectus stamped with the current local time.
pub fn render(result: &StructuredResult) -> Result<String> {
    render_at(result, Local::now())
}

/// Render a prospectus stamped with `generated_at`.
pub fn render_at(result: &StructuredResult, generated_at: DateTime<Local>) -> Result<String> {
    validate(result)?;

    let mut body = String::new();
    for (name, title) in SECTIONS {
        let Some(section) = result.section(name) else {
            continue;
        };
        let fields: Vec<(&str, &str)> = section
            .fields()
            .iter()
            .map(|(k, v)| (k.as_str(), v.trim()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        if fields.is_empty() {
            continue;
        }

        body.push_str(&format!("## {}\n\n", title));
        for (key, value) in fields {
            body.push_str(&format!("**{}**: {}\n\n", display_key(key), value));
        }
    }

    if body.is_empty() {
        return Err(CliError::Prospectus("No valid data found to generate prospectus".to_string()));
    }

    let mut md = String::from("# Company Prospectus\n\n");
    md.push_str(&format!(
        "Generated on: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    md.push_str(&body);
    Ok(md)
}

/// `-_number_of_shares` → `Number Of Shares`
fn display_key(key: &str) -> String {
    let words = key.replace("-_", "").replace('_', " ");
    let mut out = String::with_capacity(words.len());
    let mut at_word_start = true;
    for c in words.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = !c.is_alphabetic();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn complete_result() -> StructuredResult {
        let mut result = StructuredResult::new();
        let idx = result.open_section("basic_information");
        result.insert_in_section(idx, "-_company_name", "Acme Corp");
        result.insert_in_section(idx, "-_jurisdiction", "Delaware");
        let idx = result.open_section("share_offering_details");
        result.insert_in_section(idx, "-_number_of_shares", "1,000,000");
        result.insert_in_section(idx, "-_nominal_value_per_share", "");
        result.open_section("company_overview");
        let idx = result.open_section("risk_factors");
        result.insert_in_section(idx, "market_risk", "high");
        let idx = result.open_section("unrelated");
        result.insert_in_section(idx, "ignored", "yes");
        result
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn test_render_layout() {
        let md = render_at(&complete_result(), fixed_time()).unwrap();
        let expected = "# Company Prospectus\n\n\
                        Generated on: 2024-03-05 14:07:09\n\n\
                        ## Basic Information\n\n\
                        **Company Name**: Acme Corp\n\n\
                        **Jurisdiction**: Delaware\n\n\
                        ## Share Offering Details\n\n\
                        **Number Of Shares**: 1,000,000\n\n\
                        ## Risk Factors\n\n\
                        **Market Risk**: high\n\n";
        assert_eq!(md, expected);
    }

    #[test]
    fn test_missing_sections_listed() {
        let mut result = StructuredResult::new();
        let idx = result.open_section("basic_information");
        result.insert_in_section(idx, "company_name", "Acme");

        let err = validate(&result).unwrap_err().to_string();
        assert!(err.contains("share_offering_details, company_overview"));
    }

    #[test]
    fn test_company_name_required() {
        let mut result = complete_result();
        result
            .section_mut("basic_information")
            .unwrap()
            .insert("-_company_name", "  ");
        let err = validate(&result).unwrap_err().to_string();
        assert!(err.contains("Company name is required"));
    }

    #[test]
    fn test_plain_company_name_accepted() {
        let mut result = StructuredResult::new();
        let idx = result.open_section("basic_information");
        result.insert_in_section(idx, "company_name", "Acme");
        result.open_section("share_offering_details");
        result.open_section("company_overview");

        assert_eq!(company_name(&result), Some("Acme"));
        assert!(validate(&result).is_ok());
    }

    #[test]
    fn test_display_key() {
        assert_eq!(display_key("-_number_of_shares"), "Number Of Shares");
        assert_eq!(display_key("company_name"), "Company Name");
        assert_eq!(display_key("ceo's_NAME"), "Ceo'S Name");
    }
}
