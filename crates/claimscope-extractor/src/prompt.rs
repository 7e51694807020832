//! Prompt construction for claim analysis

use claimscope_domain::Category;

/// System message sent with every analysis request
pub const SYSTEM_PROMPT: &str = "You are an expert research analyst. You read scientific papers \
carefully and report only claims the text actually supports, quoting it verbatim. \
You always respond with a single valid JSON object.";

const INSTRUCTIONS: &str = "Analyse the paper below against the numbered reference claims. \
A claim is supported only if the paper presents evidence or argument for it; \
mentioning a topic is not enough. For every supported claim give direct quotes, \
an interpretation, a strength rating and any limitations.";

const OUTPUT_FORMAT: &str = r#"OUTPUT FORMAT
Return one JSON object with exactly these fields:
{
  "paper_metadata": {"title": "<paper title>", "link": "<paper link>"},
  "theory_synthesis": {"description": "<how the supported claims fit together>", "type": "<kind of theory>"},
  "supported_claims": [<claim numbers, each 1-50, no repeats>],
  "evidence_details": {
    "<claim number>": {
      "claim_text": "<claim wording>",
      "direct_quotes": [{"quote": "<verbatim text>", "page_or_section": "<location>"}],
      "interpretation": "<how the quotes bear on the claim>",
      "strength": "strong" | "moderate" | "weak",
      "limitations": "<caveats, or empty>"
    }
  },
  "additional_or_contradictory_insights": ["<insight>", ...]
}
Every key of evidence_details must appear in supported_claims."#;

/// Default prompt template: instructions, the claim table by category, output format
pub fn default_template() -> String {
    let mut template = String::new();

    template.push_str(INSTRUCTIONS);
    template.push_str("\n\nREFERENCE CLAIMS\n");

    for category in Category::ALL {
        template.push_str(&format!("\n{}\n", category.display_name()));
        for claim in category.claims() {
            template.push_str(&format!("{}. {}\n", claim.number, claim.text));
        }
    }

    template.push('\n');
    template.push_str(OUTPUT_FORMAT);
    template
}

/// Builds the user prompt for one paper
pub struct PromptBuilder {
    text: String,
    link: String,
    template: Option<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
            template: None,
        }
    }

    /// Replace the default template
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let template = match &self.template {
            Some(t) => t.clone(),
            None => default_template(),
        };

        format!(
            "{}\n\nPAPER CONTENT:\n{}\n\nPAPER LINK: {}",
            template.trim_end(),
            self.text,
            self.link
        )
    }
}

/// Whitespace-delimited word count, recorded as a rough token estimate
pub(crate) fn estimate_words(prompt: &str) -> usize {
    prompt.split_whitespace().count()
}
