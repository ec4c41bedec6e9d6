//! LLM prompt engineering for document analysis

use termsense_domain::Category;

/// Builds the analysis prompt for a document
///
/// The prompt is a pure function of the text: the same input always yields
/// the same prompt.
pub struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Build the complete analysis prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(self.text.len() + 1024);

        // 1. Instruction and schema
        prompt.push_str(ANALYSIS_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(&schema_template());
        prompt.push_str("\n\n");

        // 2. The text to analyze, verbatim
        prompt.push_str("Text to analyze:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.text);
        prompt.push_str("\n---\n\n");

        // 3. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

/// JSON template naming every category with its description
fn schema_template() -> String {
    let lines: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("  \"{}\": [\"{}\"]", c.key(), c.description()))
        .collect();

    format!("{{\n{}\n}}", lines.join(",\n"))
}

const ANALYSIS_INSTRUCTIONS: &str = "Analyze the following terms and conditions text and return \
ONLY a valid JSON object with exactly these 6 keys, each containing an array of strings:";

const OUTPUT_FORMAT_REMINDER: &str = "IMPORTANT: Return ONLY the JSON object, no additional text, \
no markdown formatting, no code fences, no explanations. The response must be valid JSON that \
can be parsed directly.";
