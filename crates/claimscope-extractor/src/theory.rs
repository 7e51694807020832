//! Cumulative theory updates
//!
//! Folds one analysis at a time into a running theory. The theory lives in
//! `current_theory.json` and remembers which analysis files it already
//! incorporates; every update also leaves a timestamped backup beside it.
//!
//! Provider calls go through the same retry loop as [`Extractor::analyze`],
//! and a response is validated before anything is written.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::parser::{extract_json, preview};
use crate::writer::{replace_json, write_json_noclobber};
use chrono::{Local, NaiveDateTime};
use claimscope_corpus::{load_corpus, PaperRecord};
use claimscope_domain::naming::{FILE_PREFIX, TIMESTAMP_FORMAT};
use claimscope_domain::traits::{CompletionRequest, LlmProvider};
use claimscope_domain::{AnalysisArtifact, ClaimNumber, ModelVariant, Strength, TheorySynthesis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Default directory for the cumulative theory
pub const DEFAULT_THEORY_DIR: &str = "output/cumulative_theory";

/// File holding the current theory
pub const CURRENT_THEORY_FILE: &str = "current_theory.json";

/// Prefix of per-update backups (`theory_backup_<YYYYmmdd_HHMMSS>.json`)
pub const BACKUP_PREFIX: &str = "theory_backup_";

/// System message for theory updates
pub const THEORY_SYSTEM_PROMPT: &str = "You maintain a cumulative, evidence-based theory of consciousness. \
Respond only with a single valid JSON object.";

const MAX_KEY_INSIGHTS: usize = 3;

const THEORY_TASK: &str = r#"TASK:
Revise the cumulative theory in light of the new analysis. Decide whether the new
evidence supports, contradicts or extends the current theory, which mechanisms or
principles should be added, which should be revised or dropped, and how confident
each part of the theory now is. If the new paper adds nothing meaningful, record
minimal changes but still return the complete theory.

Return exactly one JSON object of this shape:
{
  "theory": {
    "core_principles": ["<principle supported by the evidence>"],
    "mechanisms": {"<mechanism>": "<role and evidence summary>"},
    "integration_framework": "<how the mechanisms work together>",
    "key_predictions": ["<testable prediction>"],
    "confidence_levels": {
      "high": ["<well-supported aspect>"],
      "moderate": ["<partly supported aspect>"],
      "low": ["<speculative aspect>"]
    }
  },
  "changes_from_previous": {
    "additions": [], "modifications": [], "rejections": [],
    "strengthened": [], "weakened": []
  },
  "synthesis": "<two or three sentence summary of the unified theory>",
  "next_research_priorities": ["<open question>"]
}"#;

/// Body of the cumulative theory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoryBody {
    /// Principles the evidence supports
    #[serde(default)]
    pub core_principles: Vec<String>,
    /// Mechanism name to role and evidence summary
    #[serde(default)]
    pub mechanisms: BTreeMap<String, String>,
    /// How the mechanisms fit together
    #[serde(default)]
    pub integration_framework: String,
    /// Testable predictions
    #[serde(default)]
    pub key_predictions: Vec<String>,
    /// Aspects grouped by confidence
    #[serde(default)]
    pub confidence_levels: ConfidenceLevels,
}

/// Theory aspects grouped by how well they are supported
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceLevels {
    /// Well supported
    #[serde(default)]
    pub high: Vec<String>,
    /// Some support
    #[serde(default)]
    pub moderate: Vec<String>,
    /// Speculative
    #[serde(default)]
    pub low: Vec<String>,
}

/// What one update changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoryChanges {
    /// New elements
    #[serde(default)]
    pub additions: Vec<String>,
    /// Revised elements
    #[serde(default)]
    pub modifications: Vec<String>,
    /// Removed or contradicted elements
    #[serde(default)]
    pub rejections: Vec<String>,
    /// Elements with more support
    #[serde(default)]
    pub strengthened: Vec<String>,
    /// Elements with less support
    #[serde(default)]
    pub weakened: Vec<String>,
}

impl TheoryChanges {
    /// Change kinds with their item counts, in display order
    pub fn counts(&self) -> [(&'static str, usize); 5] {
        [
            ("additions", self.additions.len()),
            ("modifications", self.modifications.len()),
            ("rejections", self.rejections.len()),
            ("strengthened", self.strengthened.len()),
            ("weakened", self.weakened.len()),
        ]
    }

    /// True when the update changed nothing
    pub fn is_empty(&self) -> bool {
        self.counts().iter().all(|(_, n)| *n == 0)
    }
}

/// Metadata recorded on every stored theory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoryMetadata {
    /// RFC 3339 time of the update
    pub update_timestamp: String,
    /// Model that produced the update
    pub model_used: ModelVariant,
    /// Analyses summarised in the prompt
    pub papers_incorporated: usize,
    /// Title of the analysis folded in by this update
    pub latest_paper: String,
    /// Provider attempts the update needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

/// The cumulative theory as stored in `current_theory.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeTheory {
    /// Theory body
    pub theory: TheoryBody,
    /// Changes made by the last update
    #[serde(default)]
    pub changes_from_previous: TheoryChanges,
    /// Short summary of the theory
    pub synthesis: String,
    /// Open questions
    #[serde(default)]
    pub next_research_priorities: Vec<String>,
    /// Update metadata; absent on raw model output
    #[serde(rename = "_metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TheoryMetadata>,
    /// Analysis file names folded into the theory, oldest first
    #[serde(default)]
    pub incorporated_analyses: Vec<String>,
}

impl CumulativeTheory {
    /// Whether `file_name` has already been folded in
    pub fn is_incorporated(&self, file_name: &str) -> bool {
        self.incorporated_analyses.iter().any(|f| f == file_name)
    }
}

/// Parse a raw model response into a theory
///
/// Same fence handling as analysis responses. A missing `theory` object, a
/// blank `synthesis` or any type mismatch is a `MalformedResponse`.
pub fn parse_theory_response(response: &str) -> Result<CumulativeTheory, ExtractorError> {
    let json_str = extract_json(response)?;

    let theory: CumulativeTheory = serde_json::from_str(json_str)
        .map_err(|e| ExtractorError::MalformedResponse(format!("JSON parse error: {}", e)))?;

    if theory.synthesis.trim().is_empty() {
        return Err(ExtractorError::MalformedResponse("synthesis is empty".to_string()));
    }
    Ok(theory)
}

/// Compact view of one analysis used in theory prompts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// Paper title
    pub paper: String,
    /// Paper link
    pub link: String,
    /// Synthesis from the analysis
    pub theory_synthesis: TheorySynthesis,
    /// Supported claims
    pub supported_claims: Vec<ClaimNumber>,
    /// Strength per supported claim with evidence
    pub evidence_strength: BTreeMap<ClaimNumber, Strength>,
    /// First few insights, flattened to text
    pub key_insights: Vec<String>,
}

impl From<&AnalysisArtifact> for AnalysisSummary {
    fn from(artifact: &AnalysisArtifact) -> Self {
        Self {
            paper: title_of(artifact),
            link: artifact.paper_metadata.link.clone(),
            theory_synthesis: artifact.theory_synthesis.clone(),
            supported_claims: artifact.supported_claims.clone(),
            evidence_strength: artifact
                .evidence_details
                .iter()
                .map(|(n, e)| (*n, e.strength))
                .collect(),
            key_insights: artifact
                .additional_or_contradictory_insights
                .iter()
                .take(MAX_KEY_INSIGHTS)
                .map(|i| i.text())
                .collect(),
        }
    }
}

fn title_of(artifact: &AnalysisArtifact) -> String {
    let title = artifact.paper_metadata.title.trim();
    if title.is_empty() {
        "Unknown".to_string()
    } else {
        title.to_string()
    }
}

/// Build the user prompt for one theory update
pub fn build_theory_prompt(
    summaries: &[AnalysisSummary],
    current: Option<&CumulativeTheory>,
    new_analysis: &AnalysisArtifact,
) -> Result<String, ExtractorError> {
    let current_theory = match current {
        Some(theory) => serde_json::to_string_pretty(&theory.theory)?,
        None => "None yet. This is the first analysis.".to_string(),
    };

    Ok(format!(
        "ANALYSES SO FAR:\n{}\n\nCURRENT CUMULATIVE THEORY:\n{}\n\nNEW ANALYSIS:\n{}\n\nNEW EVIDENCE DETAILS:\n{}\n\n{}",
        serde_json::to_string_pretty(summaries)?,
        current_theory,
        serde_json::to_string_pretty(&AnalysisSummary::from(new_analysis))?,
        serde_json::to_string_pretty(&new_analysis.evidence_details)?,
        THEORY_TASK
    ))
}

/// Pick the analysis the next update should fold in
///
/// A `requested` file name must exist among `records`. Otherwise the newest
/// record (file-name timestamp, then load order) not yet incorporated is
/// chosen; `None` means everything is incorporated.
pub fn select_analysis<'a>(
    records: &'a [PaperRecord],
    current: Option<&CumulativeTheory>,
    requested: Option<&str>,
) -> Result<Option<&'a PaperRecord>, ExtractorError> {
    if let Some(name) = requested {
        return records
            .iter()
            .find(|r| r.file_name == name)
            .map(Some)
            .ok_or_else(|| ExtractorError::Configuration(format!("analysis file {} not found", name)));
    }

    Ok(records
        .iter()
        .filter(|r| !current.is_some_and(|t| t.is_incorporated(&r.file_name)))
        .max_by_key(|r| (r.created_at, r.load_index)))
}

/// Paths written by one saved update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTheory {
    /// `current_theory.json`
    pub current: PathBuf,
    /// Timestamped backup
    pub backup: PathBuf,
}

/// Reads and writes the theory directory
#[derive(Debug, Clone)]
pub struct TheoryStore {
    dir: PathBuf,
}

impl TheoryStore {
    /// Store rooted at `dir`; created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Theory directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `current_theory.json`
    pub fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_THEORY_FILE)
    }

    /// Load the current theory; `None` if none has been saved yet
    pub fn load(&self) -> Result<Option<CumulativeTheory>, ExtractorError> {
        let path = self.current_path();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ExtractorError::InvalidTheory(format!("{}: {}", path.display(), e)))
    }

    /// Replace the current theory and write a backup stamped with `at`
    pub fn save(&self, theory: &CumulativeTheory, at: NaiveDateTime) -> Result<SavedTheory, ExtractorError> {
        let current = self.current_path();
        replace_json(&current, theory)?;

        let stem = format!("{}{}", BACKUP_PREFIX, at.format(TIMESTAMP_FORMAT));
        let backup = write_json_noclobber(&self.dir, &stem, theory)?;

        Ok(SavedTheory { current, backup })
    }
}

/// A completed theory update
#[derive(Debug, Clone)]
pub struct TheoryUpdate {
    /// The theory as saved
    pub theory: CumulativeTheory,
    /// Analysis file folded in
    pub analysis: String,
    /// Where it was saved
    pub saved: SavedTheory,
    /// Provider attempts needed
    pub attempts: u32,
}

/// Result of [`TheoryUpdater::update`]
#[derive(Debug, Clone)]
pub enum TheoryOutcome {
    /// Every analysis was already incorporated; nothing was called or written
    UpToDate(Option<CumulativeTheory>),
    /// One analysis was folded in
    Updated(Box<TheoryUpdate>),
}

/// Folds analyses from the extractor's output directory into the theory
pub struct TheoryUpdater<L>
where
    L: LlmProvider,
{
    extractor: Extractor<L>,
    store: TheoryStore,
}

impl<L> TheoryUpdater<L>
where
    L: LlmProvider + Send + Sync + 'static,
{
    /// Create an updater reading analyses from `config.output_dir`
    pub fn new(
        llm_provider: L,
        config: ExtractorConfig,
        theory_dir: impl Into<PathBuf>,
    ) -> Result<Self, ExtractorError> {
        Ok(Self {
            extractor: Extractor::new(llm_provider, config)?,
            store: TheoryStore::new(theory_dir),
        })
    }

    /// Theory storage
    pub fn store(&self) -> &TheoryStore {
        &self.store
    }

    /// Fold one analysis into the theory
    ///
    /// With `requested`, that analysis file is used even if already
    /// incorporated. Otherwise the newest unincorporated analysis is used, and
    /// when there is none no provider call is made.
    ///
    /// # Errors
    ///
    /// - `Configuration`: no analyses, or `requested` does not exist
    /// - `InvalidTheory`: the stored theory cannot be read back
    /// - `RunFailed` / `Provider` / `MalformedResponse`: as for analysis runs;
    ///   nothing is written
    pub async fn update(
        &self,
        model: ModelVariant,
        requested: Option<&str>,
    ) -> Result<TheoryOutcome, ExtractorError> {
        let analysis_dir = &self.extractor.config().output_dir;
        let analyses: Vec<PaperRecord> = load_corpus(analysis_dir)?
            .records
            .into_iter()
            .filter(|r| r.file_name.starts_with(FILE_PREFIX))
            .collect();
        if analyses.is_empty() {
            return Err(ExtractorError::Configuration(format!(
                "no analyses found in {}",
                analysis_dir.display()
            )));
        }

        let current = self.store.load()?;
        let Some(next) = select_analysis(&analyses, current.as_ref(), requested)? else {
            info!(analyses = analyses.len(), "All analyses already incorporated");
            return Ok(TheoryOutcome::UpToDate(current));
        };

        info!(
            analysis = %next.file_name,
            model = %model,
            analyses = analyses.len(),
            first_update = current.is_none(),
            "Updating theory"
        );

        let summaries: Vec<AnalysisSummary> =
            analyses.iter().map(|r| AnalysisSummary::from(&r.artifact)).collect();
        let prompt = build_theory_prompt(&summaries, current.as_ref(), &next.artifact)?;

        let (raw, attempts) = self
            .extractor
            .complete_with_retry(CompletionRequest {
                model,
                system: THEORY_SYSTEM_PROMPT.to_string(),
                prompt,
                json_response: true,
            })
            .await?;

        let mut theory = match parse_theory_response(&raw) {
            Ok(theory) => theory,
            Err(e) => {
                error!(
                    model = %model,
                    attempts,
                    error = %e,
                    preview = %preview(&raw, 500),
                    "Theory response failed validation"
                );
                debug!(response = %raw, "Full rejected response");
                return Err(e);
            }
        };

        let mut incorporated = current.map(|t| t.incorporated_analyses).unwrap_or_default();
        if !incorporated.contains(&next.file_name) {
            incorporated.push(next.file_name.clone());
        }
        theory.incorporated_analyses = incorporated;

        let now = Local::now();
        theory.metadata = Some(TheoryMetadata {
            update_timestamp: now.to_rfc3339(),
            model_used: model,
            papers_incorporated: analyses.len(),
            latest_paper: title_of(&next.artifact),
            attempts: Some(attempts),
        });

        let saved = self.store.save(&theory, now.naive_local())?;
        info!(
            current = %saved.current.display(),
            backup = %saved.backup.display(),
            additions = theory.changes_from_previous.additions.len(),
            modifications = theory.changes_from_previous.modifications.len(),
            "Theory updated"
        );

        Ok(TheoryOutcome::Updated(Box::new(TheoryUpdate {
            theory,
            analysis: next.file_name.clone(),
            saved,
            attempts,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RetryPolicy;
    use claimscope_llm::{LlmError, MockProvider};
    use tempfile::TempDir;

    const THEORY_RESPONSE: &str = r#"{
        "theory": {
            "core_principles": ["Recurrence sustains reportable content"],
            "mechanisms": {"recurrence": "Feedback loops stabilise representations"},
            "integration_framework": "Local loops feed a global workspace",
            "key_predictions": ["Blocking feedback abolishes report"],
            "confidence_levels": {"high": ["recurrence"], "moderate": [], "low": ["field effects"]}
        },
        "changes_from_previous": {"additions": ["recurrence"], "modifications": []},
        "synthesis": "Consciousness arises from recurrent loops broadcast globally.",
        "next_research_priorities": ["Dissociate report from access"]
    }"#;

    fn analysis(title: &str) -> String {
        serde_json::json!({
            "paper_metadata": {"title": title, "link": format!("https://example.org/{}", title)},
            "theory_synthesis": {"description": format!("{} synthesis", title), "type": "hybrid"},
            "supported_claims": [10],
            "evidence_details": {
                "10": {
                    "claim_text": "claim ten",
                    "direct_quotes": [],
                    "interpretation": "supports",
                    "strength": "strong",
                    "limitations": ""
                }
            },
            "additional_or_contradictory_insights": ["one", "two", "three", "four"]
        })
        .to_string()
    }

    /// Three analyses, oldest `alpha`, newest `gamma`
    fn workspace() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let analyses = tmp.path().join("analysis_results");
        let theory = tmp.path().join("cumulative_theory");
        std::fs::create_dir_all(&analyses).unwrap();
        for (name, title) in [
            ("analysis_20250101_090000_alpha.json", "alpha"),
            ("analysis_20250201_090000_beta.json", "beta"),
            ("analysis_20250301_090000_gamma.json", "gamma"),
        ] {
            std::fs::write(analyses.join(name), analysis(title)).unwrap();
        }
        std::fs::write(analyses.join("processed_papers.json"), "[]").unwrap();
        (tmp, analyses, theory)
    }

    fn updater(llm: &MockProvider, analyses: &Path, theory: &Path) -> TheoryUpdater<MockProvider> {
        let config = ExtractorConfig {
            request_timeout_secs: 10,
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay_ms: 10,
                max_delay_ms: 100,
            },
            output_dir: analyses.to_path_buf(),
            ..ExtractorConfig::default()
        };
        TheoryUpdater::new(llm.clone(), config, theory).unwrap()
    }

    fn seed_theory(dir: &Path, incorporated: &[&str]) {
        let mut theory = parse_theory_response(THEORY_RESPONSE).unwrap();
        theory.incorporated_analyses = incorporated.iter().map(|s| s.to_string()).collect();
        TheoryStore::new(dir)
            .save(&theory, Local::now().naive_local())
            .unwrap();
    }

    fn backups(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with(BACKUP_PREFIX))
            .collect();
        names.sort();
        names
    }

    fn updated(outcome: TheoryOutcome) -> TheoryUpdate {
        match outcome {
            TheoryOutcome::Updated(update) => *update,
            TheoryOutcome::UpToDate(_) => panic!("Expected an update"),
        }
    }

    #[tokio::test]
    async fn test_first_update_uses_newest_analysis() {
        let (_tmp, analyses, theory_dir) = workspace();
        let llm = MockProvider::new(THEORY_RESPONSE);

        let update = updated(
            updater(&llm, &analyses, &theory_dir)
                .update(ModelVariant::Mini, None)
                .await
                .unwrap(),
        );

        assert_eq!(update.analysis, "analysis_20250301_090000_gamma.json");
        assert_eq!(update.theory.incorporated_analyses, vec!["analysis_20250301_090000_gamma.json"]);
        let metadata = update.theory.metadata.as_ref().unwrap();
        assert_eq!(metadata.model_used, ModelVariant::Mini);
        assert_eq!(metadata.papers_incorporated, 3);
        assert_eq!(metadata.latest_paper, "gamma");

        let sent = llm.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].system, THEORY_SYSTEM_PROMPT);
        assert!(sent[0].json_response);
        assert!(sent[0].prompt.contains("None yet. This is the first analysis."));
        assert!(sent[0].prompt.contains("alpha synthesis"));
        // Only the first three insights reach the prompt
        assert!(!sent[0].prompt.contains("\"four\""));
    }

    #[tokio::test]
    async fn test_picks_latest_unincorporated_analysis() {
        let (_tmp, analyses, theory_dir) = workspace();
        seed_theory(&theory_dir, &["analysis_20250301_090000_gamma.json"]);
        let llm = MockProvider::new(THEORY_RESPONSE);

        let update = updated(
            updater(&llm, &analyses, &theory_dir)
                .update(ModelVariant::Standard, None)
                .await
                .unwrap(),
        );

        assert_eq!(update.analysis, "analysis_20250201_090000_beta.json");
        assert_eq!(
            update.theory.incorporated_analyses,
            vec![
                "analysis_20250301_090000_gamma.json",
                "analysis_20250201_090000_beta.json"
            ]
        );
        assert!(llm.requests()[0].prompt.contains("Recurrence sustains reportable content"));
    }

    #[tokio::test]
    async fn test_all_incorporated_makes_no_call() {
        let (_tmp, analyses, theory_dir) = workspace();
        seed_theory(
            &theory_dir,
            &[
                "analysis_20250101_090000_alpha.json",
                "analysis_20250201_090000_beta.json",
                "analysis_20250301_090000_gamma.json",
            ],
        );
        let before = backups(&theory_dir);
        let llm = MockProvider::new(THEORY_RESPONSE);

        let outcome = updater(&llm, &analyses, &theory_dir)
            .update(ModelVariant::Standard, None)
            .await
            .unwrap();

        match outcome {
            TheoryOutcome::UpToDate(Some(theory)) => assert_eq!(theory.incorporated_analyses.len(), 3),
            other => panic!("Expected UpToDate, got {:?}", other),
        }
        assert_eq!(llm.call_count(), 0);
        assert_eq!(backups(&theory_dir), before);
    }

    #[tokio::test]
    async fn test_update_writes_current_and_backup() {
        let (_tmp, analyses, theory_dir) = workspace();
        let llm = MockProvider::new(THEORY_RESPONSE);
        let updater = updater(&llm, &analyses, &theory_dir);

        let update = updated(updater.update(ModelVariant::Standard, None).await.unwrap());

        assert_eq!(update.saved.current, theory_dir.join(CURRENT_THEORY_FILE));
        let backup_name = update.saved.backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(backup_name.starts_with(BACKUP_PREFIX));
        assert_eq!(backups(&theory_dir), vec![backup_name]);

        let current = updater.store().load().unwrap().unwrap();
        let backup: CumulativeTheory =
            serde_json::from_str(&std::fs::read_to_string(&update.saved.backup).unwrap()).unwrap();
        assert_eq!(current, update.theory);
        assert_eq!(backup, update.theory);

        // A second run moves on to the next newest and keeps both backups
        let second = updated(updater.update(ModelVariant::Standard, None).await.unwrap());
        assert_eq!(second.analysis, "analysis_20250201_090000_beta.json");
        assert_eq!(backups(&theory_dir).len(), 2);
    }

    #[tokio::test]
    async fn test_requested_analysis() {
        let (_tmp, analyses, theory_dir) = workspace();
        seed_theory(&theory_dir, &["analysis_20250101_090000_alpha.json"]);
        let llm = MockProvider::new(THEORY_RESPONSE);
        let updater = updater(&llm, &analyses, &theory_dir);

        let update = updated(
            updater
                .update(ModelVariant::Standard, Some("analysis_20250101_090000_alpha.json"))
                .await
                .unwrap(),
        );
        assert_eq!(update.theory.incorporated_analyses, vec!["analysis_20250101_090000_alpha.json"]);

        let result = updater
            .update(ModelVariant::Standard, Some("analysis_20990101_000000_none.json"))
            .await;
        assert!(matches!(result, Err(ExtractorError::Configuration(_))));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_theory_writes_nothing() {
        let (_tmp, analyses, theory_dir) = workspace();
        let llm = MockProvider::new(r#"{"theory": {}, "synthesis": "  "}"#);

        let result = updater(&llm, &analyses, &theory_dir)
            .update(ModelVariant::Standard, None)
            .await;

        assert!(matches!(result, Err(ExtractorError::MalformedResponse(_))));
        assert_eq!(llm.call_count(), 1);
        assert!(!theory_dir.exists());
    }

    #[tokio::test]
    async fn test_transient_failures_retried() {
        let (_tmp, analyses, theory_dir) = workspace();
        let llm = MockProvider::new(THEORY_RESPONSE);
        llm.push_error(LlmError::RateLimitExceeded);

        let update = updated(
            updater(&llm, &analyses, &theory_dir)
                .update(ModelVariant::Standard, None)
                .await
                .unwrap(),
        );

        assert_eq!(update.attempts, 2);
        assert_eq!(update.theory.metadata.unwrap().attempts, Some(2));
    }

    #[tokio::test]
    async fn test_no_analyses() {
        let tmp = TempDir::new().unwrap();
        let llm = MockProvider::new(THEORY_RESPONSE);

        let result = updater(&llm, tmp.path(), &tmp.path().join("theory"))
            .update(ModelVariant::Standard, None)
            .await;

        assert!(matches!(result, Err(ExtractorError::Configuration(_))));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_theory_file() {
        let (_tmp, analyses, theory_dir) = workspace();
        std::fs::create_dir_all(&theory_dir).unwrap();
        std::fs::write(theory_dir.join(CURRENT_THEORY_FILE), "{\"theory\":").unwrap();
        let llm = MockProvider::new(THEORY_RESPONSE);

        let result = updater(&llm, &analyses, &theory_dir)
            .update(ModelVariant::Standard, None)
            .await;

        assert!(matches!(result, Err(ExtractorError::InvalidTheory(_))));
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_parse_theory_response() {
        let fenced = format!("```json\n{}\n```", THEORY_RESPONSE);
        let theory = parse_theory_response(&fenced).unwrap();
        assert_eq!(theory.theory.core_principles.len(), 1);
        assert_eq!(theory.changes_from_previous.additions, vec!["recurrence"]);
        assert!(theory.changes_from_previous.weakened.is_empty());
        assert!(theory.metadata.is_none());

        assert!(matches!(
            parse_theory_response(r#"{"synthesis": "no body"}"#),
            Err(ExtractorError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_theory_response(r#"{"theory": {"core_principles": "one"}, "synthesis": "x"}"#),
            Err(ExtractorError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_changes_counts() {
        let changes = TheoryChanges {
            additions: vec!["a".into(), "b".into()],
            weakened: vec!["c".into()],
            ..TheoryChanges::default()
        };
        assert!(!changes.is_empty());
        assert_eq!(changes.counts()[0], ("additions", 2));
        assert_eq!(changes.counts()[4], ("weakened", 1));
        assert!(TheoryChanges::default().is_empty());
    }
}
