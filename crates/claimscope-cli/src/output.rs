//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use claimscope_corpus::{ClaimSupport, CorpusLoadError, CorpusStatistics, PaperRecord};
use claimscope_domain::{AnalysisArtifact, Claim, Strength};
use claimscope_extractor::{AnalysisOutcome, CumulativeTheory, TheoryUpdate};
use colored::{Color, Colorize};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const TITLE_WIDTH: usize = 50;
const CLAIM_TEXT_WIDTH: usize = 80;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a paper listing.
    pub fn format_papers(&self, papers: &[PaperRecord]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(papers)?);
        }
        if papers.is_empty() {
            return Ok(self.paint("No papers found.", Color::Yellow));
        }

        let mut builder = Builder::default();
        builder.push_record(["Date", "Title", "Model", "Claims", "Strong", "Moderate", "Weak", "Insights"]);

        for paper in papers {
            let artifact = &paper.artifact;
            let date = paper
                .created_at
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            let title = if artifact.paper_metadata.title.is_empty() {
                paper.file_name.as_str()
            } else {
                artifact.paper_metadata.title.as_str()
            };
            let model = artifact
                .model()
                .map(|m| m.model_id().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let [strong, moderate, weak] = Strength::ALL.map(|s| strength_count(artifact, s).to_string());

            builder.push_record([
                date,
                truncate(title, TITLE_WIDTH),
                model,
                artifact.claim_count().to_string(),
                strong,
                moderate,
                weak,
                artifact.insight_count().to_string(),
            ]);
        }

        Ok(format!("{}\n{} paper(s)", self.table(builder), papers.len()))
    }

    /// Format corpus statistics.
    pub fn format_statistics(&self, stats: &CorpusStatistics) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(stats)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        builder.push_record(["Papers".to_string(), stats.total_papers.to_string()]);
        builder.push_record(["Evidence entries".to_string(), stats.total_evidence.to_string()]);
        builder.push_record(["Papers with insights".to_string(), stats.papers_with_insights.to_string()]);
        for (strength, count) in &stats.strength_counts {
            builder.push_record([format!("Evidence: {}", strength), count.to_string()]);
        }
        for (model, count) in &stats.model_counts {
            builder.push_record([format!("Model: {}", model), count.to_string()]);
        }

        Ok(self.table(builder))
    }

    /// Format per-claim support counts.
    pub fn format_distribution(&self, rows: &[ClaimSupport]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(rows)?);
        }
        if rows.is_empty() {
            return Ok(self.paint("No claims are supported by any paper.", Color::Yellow));
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Category", "Claim", "Papers"]);
        for row in rows {
            builder.push_record([
                row.number.to_string(),
                row.category_name.to_string(),
                truncate(row.text, CLAIM_TEXT_WIDTH),
                row.count.to_string(),
            ]);
        }

        Ok(self.table(builder))
    }

    /// Format the reference claim table.
    pub fn format_claims(&self, claims: &[Claim]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(claims)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Category", "Claim"]);
        for claim in claims {
            builder.push_record([
                claim.number.to_string(),
                claim.category.display_name().to_string(),
                claim.text.to_string(),
            ]);
        }

        Ok(self.table(builder))
    }

    /// Format the result of an analysis run.
    pub fn format_analysis(&self, outcome: &AnalysisOutcome) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&outcome.artifact)?);
        }
        Ok(self.success(&format!(
            "Analysis written to {} ({} attempt(s), {:.1}s)",
            outcome.path.display(),
            outcome.attempts,
            outcome.elapsed.as_secs_f64()
        )))
    }

    /// Console summary of an artifact.
    pub fn analysis_summary(&self, artifact: &AnalysisArtifact) -> String {
        let rule = "=".repeat(60);
        let mut lines = vec![
            rule.clone(),
            self.paint("ANALYSIS SUMMARY", Color::Cyan),
            rule.clone(),
            String::new(),
            format!("Paper: {}", or_placeholder(&artifact.paper_metadata.title, "Unknown")),
            format!("Link: {}", or_placeholder(&artifact.paper_metadata.link, "N/A")),
            String::new(),
            "Theory Synthesis:".to_string(),
            format!("  {}", or_placeholder(&artifact.theory_synthesis.description, "N/A")),
        ];
        if !artifact.theory_synthesis.kind.is_empty() {
            lines.push(format!("  Type: {}", artifact.theory_synthesis.kind));
        }

        let supported: Vec<String> = artifact.supported_claims.iter().map(|n| n.to_string()).collect();
        lines.push(String::new());
        lines.push(format!(
            "Supported Claims ({} total): {}",
            supported.len(),
            supported.join(", ")
        ));

        if !artifact.evidence_details.is_empty() {
            lines.push(String::new());
            lines.push("Evidence Details:".to_string());
            for (claim, entry) in &artifact.evidence_details {
                lines.push(format!("  Claim {}: {}", claim, truncate(&entry.claim_text, CLAIM_TEXT_WIDTH)));
                lines.push(format!("    Strength: {}", self.strength(entry.strength)));
                lines.push(format!("    Quotes: {} found", entry.direct_quotes.len()));
            }
        }

        if artifact.insight_count() > 0 {
            lines.push(String::new());
            lines.push(format!("Additional Insights: {} found", artifact.insight_count()));
        }

        lines.push(rule);
        lines.join("\n")
    }

    /// Format the result of a theory update.
    pub fn format_theory_update(&self, update: &TheoryUpdate) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&update.theory)?);
        }

        let mut lines = vec![self.success(&format!(
            "Incorporated {} into {} ({} attempt(s))",
            update.analysis,
            update.saved.current.display(),
            update.attempts
        ))];
        lines.push(format!("  Backup: {}", update.saved.backup.display()));

        let changes = &update.theory.changes_from_previous;
        if changes.is_empty() {
            lines.push("  No changes reported".to_string());
        } else {
            let counts: Vec<String> = changes
                .counts()
                .iter()
                .filter(|(_, n)| *n > 0)
                .map(|(kind, n)| format!("{} {}", n, kind))
                .collect();
            lines.push(format!("  Changes: {}", counts.join(", ")));
        }
        Ok(lines.join("\n"))
    }

    /// Format a stored theory.
    pub fn format_theory(&self, theory: &CumulativeTheory) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(theory)?);
        }
        Ok(self.theory_summary(theory))
    }

    /// Console summary of the cumulative theory.
    pub fn theory_summary(&self, theory: &CumulativeTheory) -> String {
        let rule = "=".repeat(60);
        let mut lines = vec![
            rule.clone(),
            self.paint("CUMULATIVE THEORY", Color::Cyan),
            rule.clone(),
            String::new(),
            format!("Synthesis: {}", theory.synthesis),
            format!("Analyses incorporated: {}", theory.incorporated_analyses.len()),
        ];
        if let Some(metadata) = &theory.metadata {
            lines.push(format!(
                "Last update: {} ({}, latest paper: {})",
                metadata.update_timestamp, metadata.model_used, metadata.latest_paper
            ));
        }

        let body = &theory.theory;
        push_section(&mut lines, "Core Principles", &body.core_principles);
        if !body.mechanisms.is_empty() {
            lines.push(String::new());
            lines.push("Mechanisms:".to_string());
            for (name, role) in &body.mechanisms {
                lines.push(format!("  - {}: {}", name, truncate(role, CLAIM_TEXT_WIDTH)));
            }
        }
        if !body.integration_framework.is_empty() {
            lines.push(String::new());
            lines.push(format!("Integration: {}", body.integration_framework));
        }
        push_section(&mut lines, "Key Predictions", &body.key_predictions);

        let levels = &body.confidence_levels;
        lines.push(String::new());
        lines.push(format!(
            "Confidence: {} high, {} moderate, {} low",
            self.paint(&levels.high.len().to_string(), Color::Green),
            self.paint(&levels.moderate.len().to_string(), Color::Yellow),
            self.paint(&levels.low.len().to_string(), Color::Red)
        ));
        push_section(&mut lines, "Next Research Priorities", &theory.next_research_priorities);

        lines.push(rule);
        lines.join("\n")
    }

    /// Format a per-file load failure.
    pub fn load_error(&self, error: &CorpusLoadError) -> String {
        self.warning(&format!("Skipped {}", error))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.paint(&format!("✓ {}", message), Color::Green)
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.paint(&format!("✗ {}", message), Color::Red)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.paint(&format!("ℹ {}", message), Color::Blue)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.paint(&format!("⚠ {}", message), Color::Yellow)
    }

    fn strength(&self, strength: Strength) -> String {
        let color = match strength {
            Strength::Strong => Color::Green,
            Strength::Moderate => Color::Yellow,
            Strength::Weak => Color::Red,
        };
        self.paint(strength.as_str(), color)
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color_enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

fn strength_count(artifact: &AnalysisArtifact, strength: Strength) -> usize {
    artifact
        .evidence_details
        .values()
        .filter(|e| e.strength == strength)
        .count()
}

fn push_section(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("{}:", heading));
    lines.extend(items.iter().map(|item| format!("  - {}", item)));
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
