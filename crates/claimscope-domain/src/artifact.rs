//! Analysis artifact - the persisted result of one extraction run
//!
//! Artifacts are immutable once written. The extractor validates them strictly
//! before writing ([`AnalysisArtifact::validate`]); the viewer normalizes what
//! it loads instead of failing ([`AnalysisArtifact::normalize`]).

use crate::claim::ClaimNumber;
use crate::model::ModelVariant;
use crate::strength::Strength;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Structural violations found by [`AnalysisArtifact::validate`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    /// A claim number appears more than once in `supported_claims`
    #[error("claim {0} listed more than once in supported_claims")]
    DuplicateClaim(ClaimNumber),

    /// Evidence given for a claim that is not in `supported_claims`
    #[error("evidence_details has claim {0} which is not in supported_claims")]
    EvidenceWithoutSupport(ClaimNumber),
}

/// Source paper identification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperMetadata {
    /// Paper title
    #[serde(default)]
    pub title: String,
    /// Link to the paper; may be empty
    #[serde(default)]
    pub link: String,
}

/// Free-text synthesis derived from the supported claims
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheorySynthesis {
    /// Synthesis text
    pub description: String,
    /// Kind of theory the synthesis describes
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A verbatim quote backing an evidence entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectQuote {
    /// Quoted text
    pub quote: String,
    /// Where in the paper the quote was found
    #[serde(default)]
    pub page_or_section: String,
}

/// Evidence recorded for one supported claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    /// Claim wording at analysis time (a copy; may drift from the table)
    pub claim_text: String,
    /// Supporting quotes in paper order
    #[serde(default)]
    pub direct_quotes: Vec<DirectQuote>,
    /// How the quotes bear on the claim
    pub interpretation: String,
    /// Strength rating
    pub strength: Strength,
    /// Caveats; may be empty
    #[serde(default)]
    pub limitations: String,
}

/// An additional or contradictory insight
///
/// Models return either a bare string or a small record; both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insight {
    /// Plain text insight
    Text(String),
    /// Structured insight record
    Record(serde_json::Map<String, serde_json::Value>),
}

impl Insight {
    /// Flattened text of the insight, for display and search
    pub fn text(&self) -> String {
        match self {
            Insight::Text(text) => text.clone(),
            Insight::Record(fields) => fields
                .values()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Run metadata the extractor appends to every artifact it writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// RFC 3339 time the analysis finished
    #[serde(default)]
    pub analysis_timestamp: String,
    /// Model that produced the artifact
    pub model_used: ModelVariant,
    /// Link passed to the extractor
    #[serde(default)]
    pub paper_link: String,
    /// Whitespace-delimited word count of the full prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_estimate: Option<usize>,
    /// Provider attempts the run needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

/// The output of one extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisArtifact {
    /// Source paper
    pub paper_metadata: PaperMetadata,
    /// Synthesis across supported claims
    pub theory_synthesis: TheorySynthesis,
    /// Claims the model judged supported
    pub supported_claims: Vec<ClaimNumber>,
    /// Evidence keyed by claim number
    #[serde(default)]
    pub evidence_details: BTreeMap<ClaimNumber, EvidenceEntry>,
    /// Insights beyond the claim table, in model order
    #[serde(default)]
    pub additional_or_contradictory_insights: Vec<Insight>,
    /// Run metadata; absent on hand-made artifacts
    #[serde(rename = "_metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RunMetadata>,
}

impl AnalysisArtifact {
    /// Strict structural check used before an artifact is written
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let mut seen = BTreeSet::new();
        for &n in &self.supported_claims {
            if !seen.insert(n) {
                return Err(ArtifactError::DuplicateClaim(n));
            }
        }
        if let Some(&stray) = self.evidence_details.keys().find(|k| !seen.contains(k)) {
            return Err(ArtifactError::EvidenceWithoutSupport(stray));
        }
        Ok(())
    }

    /// Lenient repair used when loading artifacts from disk
    ///
    /// Collapses duplicate supported claims (first occurrence wins) and drops
    /// evidence for claims not in `supported_claims`. Returns the dropped
    /// evidence keys so the caller can log them.
    pub fn normalize(&mut self) -> Vec<ClaimNumber> {
        let mut seen = BTreeSet::new();
        self.supported_claims.retain(|n| seen.insert(*n));

        let stray: Vec<ClaimNumber> = self
            .evidence_details
            .keys()
            .filter(|k| !seen.contains(k))
            .copied()
            .collect();
        for key in &stray {
            self.evidence_details.remove(key);
        }
        stray
    }

    /// Whether the artifact lists `claim` as supported
    pub fn supports(&self, claim: ClaimNumber) -> bool {
        self.supported_claims.contains(&claim)
    }

    /// Number of distinct supported claims
    pub fn claim_count(&self) -> usize {
        self.supported_claims.iter().collect::<BTreeSet<_>>().len()
    }

    /// Number of additional insights
    pub fn insight_count(&self) -> usize {
        self.additional_or_contradictory_insights.len()
    }

    /// Model that produced the artifact, if recorded
    pub fn model(&self) -> Option<ModelVariant> {
        self.metadata.as_ref().map(|m| m.model_used)
    }

    /// Evidence entry for a claim, honouring the supported-claims invariant
    pub fn evidence_for(&self, claim: ClaimNumber) -> Option<&EvidenceEntry> {
        if self.supports(claim) {
            self.evidence_details.get(&claim)
        } else {
            None
        }
    }

    /// Every searchable text field: title, synthesis, quotes, interpretations, limitations
    pub fn searchable_text(&self) -> impl Iterator<Item = &str> {
        let header = [
            self.paper_metadata.title.as_str(),
            self.theory_synthesis.description.as_str(),
        ];
        let evidence = self.evidence_details.values().flat_map(|e| {
            e.direct_quotes
                .iter()
                .map(|q| q.quote.as_str())
                .chain([e.interpretation.as_str(), e.limitations.as_str()])
        });
        header.into_iter().chain(evidence)
    }
}
