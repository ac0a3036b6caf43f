//! LLM prompt engineering for field extraction

use crate::template::ExtractionTemplate;

/// Builds the single instruction payload sent to the model
pub struct PromptBuilder<'a> {
    template: &'a ExtractionTemplate,
    content: String,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder for already-joined document content
    pub fn new(template: &'a ExtractionTemplate, content: impl Into<String>) -> Self {
        Self {
            template,
            content: content.into(),
        }
    }

    /// Create a prompt builder from chunks, joining them with a single space
    pub fn from_chunks<S: AsRef<str>>(template: &'a ExtractionTemplate, chunks: &[S]) -> Self {
        let content = chunks
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        Self::new(template, content)
    }

    /// Document content that will be embedded
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(
            ANALYST_INSTRUCTIONS.len() + self.template.text().len() + self.content.len() + 512,
        );

        // 1. Role and output format
        prompt.push_str(ANALYST_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Template, verbatim
        prompt.push_str("Template Structure:\n");
        prompt.push_str(self.template.text());
        prompt.push_str("\n\n");

        // 3. Document content, verbatim
        prompt.push_str("Document content:\n");
        prompt.push_str(&self.content);
        prompt.push_str("\n\n");

        // 4. Closing reminder
        prompt.push_str(CLOSING_INSTRUCTIONS);

        prompt
    }
}

const ANALYST_INSTRUCTIONS: &str = r#"You are an expert financial analyst and due diligence specialist. Your task is to analyze company documents and extract relevant information according to the provided template structure.

Instructions:
1. Carefully read and analyze the provided document
2. Extract all relevant information that matches the template sections
3. For each piece of information:
   - Ensure accuracy of extracted data
   - Keep numerical values in their original format
   - Maintain proper context
   - Include source context where relevant
4. Format the response as follows:
   # Section Name
   field_name: extracted value

5. Special handling:
   - For missing information, skip the field rather than leaving it empty
   - For numerical values, maintain original units and formatting
   - For dates, use consistent YYYY-MM-DD format
   - For lists (like Board Members), use comma-separated values
   - For longer text fields, maintain paragraph structure"#;

const CLOSING_INSTRUCTIONS: &str = "Please analyze the document and extract information following the template structure above.
Be thorough but only include information that is explicitly present in the document.";
