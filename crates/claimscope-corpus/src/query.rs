//! Filters, search and sort over loaded records
//!
//! Every function here is pure: it borrows the records and returns a new
//! vector. Filters compose conjunctively and the sort is applied last.

use crate::loader::PaperRecord;
use crate::CorpusError;
use claimscope_domain::{ClaimNumber, ModelVariant, Strength};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How a strength filter applies to an artifact's evidence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthMode {
    /// Keep a paper if any of its evidence entries has an allowed strength
    #[default]
    Paper,
    /// Keep only evidence entries with an allowed strength; drop papers left empty
    Evidence,
}

/// Sort key for paper listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// File-name timestamp
    Date,
    /// Number of distinct supported claims
    ClaimCount,
    /// Number of additional insights
    InsightCount,
    /// Paper title, case-insensitive
    Title,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    #[default]
    Descending,
}

impl FromStr for StrengthMode {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paper" => Ok(StrengthMode::Paper),
            "evidence" => Ok(StrengthMode::Evidence),
            other => Err(CorpusError::InvalidQuery(format!(
                "unknown strength mode '{}' (expected paper or evidence)",
                other
            ))),
        }
    }
}

impl FromStr for SortKey {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "claim_count" | "claims" => Ok(SortKey::ClaimCount),
            "insight_count" | "insights" => Ok(SortKey::InsightCount),
            "title" => Ok(SortKey::Title),
            other => Err(CorpusError::InvalidQuery(format!(
                "unknown sort key '{}' (expected date, claim_count, insight_count or title)",
                other
            ))),
        }
    }
}

impl FromStr for SortDirection {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(CorpusError::InvalidQuery(format!(
                "unknown sort direction '{}' (expected asc or desc)",
                other
            ))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Date => "date",
            SortKey::ClaimCount => "claim_count",
            SortKey::InsightCount => "insight_count",
            SortKey::Title => "title",
        })
    }
}

/// A composed paper query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperQuery {
    /// Allowed strengths; empty means no strength filter
    pub strengths: BTreeSet<Strength>,
    /// Granularity of the strength filter
    pub strength_mode: StrengthMode,
    /// Inclusive lower bound on distinct supported claims
    pub min_claims: Option<usize>,
    /// Inclusive upper bound on distinct supported claims
    pub max_claims: Option<usize>,
    /// Exact model match
    pub model: Option<ModelVariant>,
    /// Require at least one insight
    pub has_insights: bool,
    /// Free-text or claim-number search
    pub search: Option<String>,
    /// Sort key; `None` keeps load order
    pub sort: Option<SortKey>,
    /// Sort direction
    pub direction: SortDirection,
}

impl PaperQuery {
    /// Reject contradictory bounds
    pub fn validate(&self) -> Result<(), CorpusError> {
        if let (Some(min), Some(max)) = (self.min_claims, self.max_claims) {
            if min > max {
                return Err(CorpusError::InvalidQuery(format!(
                    "min_claims ({}) is greater than max_claims ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// Run the query over `records`
    pub fn run(&self, records: &[PaperRecord]) -> Vec<PaperRecord> {
        run_query(records, self)
    }
}

/// Apply every filter in `query`, then its sort
pub fn run_query(records: &[PaperRecord], query: &PaperQuery) -> Vec<PaperRecord> {
    let search = SearchTerm::new(query.search.as_deref().unwrap_or_default());

    let mut selected: Vec<PaperRecord> = records
        .iter()
        .filter(|r| within_claim_count(r, query.min_claims, query.max_claims))
        .filter(|r| query.model.is_none_or(|m| r.artifact.model() == Some(m)))
        .filter(|r| !query.has_insights || r.artifact.insight_count() > 0)
        .filter(|r| search.matches(r))
        .filter_map(|r| apply_strength(r, &query.strengths, query.strength_mode))
        .collect();

    if let Some(key) = query.sort {
        sort_records(&mut selected, key, query.direction);
    }
    selected
}

/// Keep artifacts by evidence strength
///
/// An empty `allowed` set returns every record unchanged.
pub fn filter_by_strength(
    records: &[PaperRecord],
    allowed: &BTreeSet<Strength>,
    mode: StrengthMode,
) -> Vec<PaperRecord> {
    records
        .iter()
        .filter_map(|r| apply_strength(r, allowed, mode))
        .collect()
}

/// Keep artifacts whose distinct supported-claim count is within `[min, max]`
pub fn filter_by_claim_count(
    records: &[PaperRecord],
    min: Option<usize>,
    max: Option<usize>,
) -> Vec<PaperRecord> {
    records
        .iter()
        .filter(|r| within_claim_count(r, min, max))
        .cloned()
        .collect()
}

/// Keep artifacts produced by `model`
///
/// Artifacts without run metadata never match.
pub fn filter_by_model(records: &[PaperRecord], model: ModelVariant) -> Vec<PaperRecord> {
    records
        .iter()
        .filter(|r| r.artifact.model() == Some(model))
        .cloned()
        .collect()
}

/// Keep artifacts with at least one insight when `required`
pub fn filter_has_insights(records: &[PaperRecord], required: bool) -> Vec<PaperRecord> {
    records
        .iter()
        .filter(|r| !required || r.artifact.insight_count() > 0)
        .cloned()
        .collect()
}

/// Case-insensitive text search, OR'd with a claim-number match
///
/// A blank query matches everything.
pub fn search_text(records: &[PaperRecord], query: &str) -> Vec<PaperRecord> {
    let search = SearchTerm::new(query);
    records.iter().filter(|r| search.matches(r)).cloned().collect()
}

/// Stable sort by `key`; ties keep load order in both directions
pub fn sort_by(records: &[PaperRecord], key: SortKey, direction: SortDirection) -> Vec<PaperRecord> {
    let mut sorted = records.to_vec();
    sort_records(&mut sorted, key, direction);
    sorted
}

fn sort_records(records: &mut [PaperRecord], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        let ordering = match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        ordering.then(a.load_index.cmp(&b.load_index))
    });
}

fn compare(a: &PaperRecord, b: &PaperRecord, key: SortKey) -> Ordering {
    match key {
        // None orders before Some, so undated records lead when ascending
        SortKey::Date => a.created_at.cmp(&b.created_at),
        SortKey::ClaimCount => a.artifact.claim_count().cmp(&b.artifact.claim_count()),
        SortKey::InsightCount => a.artifact.insight_count().cmp(&b.artifact.insight_count()),
        SortKey::Title => a
            .artifact
            .paper_metadata
            .title
            .to_lowercase()
            .cmp(&b.artifact.paper_metadata.title.to_lowercase()),
    }
}

fn within_claim_count(record: &PaperRecord, min: Option<usize>, max: Option<usize>) -> bool {
    let count = record.artifact.claim_count();
    min.is_none_or(|m| count >= m) && max.is_none_or(|m| count <= m)
}

fn apply_strength(
    record: &PaperRecord,
    allowed: &BTreeSet<Strength>,
    mode: StrengthMode,
) -> Option<PaperRecord> {
    if allowed.is_empty() {
        return Some(record.clone());
    }

    let evidence = &record.artifact.evidence_details;
    match mode {
        StrengthMode::Paper => evidence
            .values()
            .any(|e| allowed.contains(&e.strength))
            .then(|| record.clone()),
        StrengthMode::Evidence => {
            let mut pruned = record.clone();
            pruned
                .artifact
                .evidence_details
                .retain(|_, e| allowed.contains(&e.strength));
            (!pruned.artifact.evidence_details.is_empty()).then_some(pruned)
        }
    }
}

/// Pre-processed search query
struct SearchTerm {
    needle: String,
    claim: Option<ClaimNumber>,
}

impl SearchTerm {
    fn new(query: &str) -> Self {
        let trimmed = query.trim();
        Self {
            needle: trimmed.to_lowercase(),
            claim: ClaimNumber::parse(trimmed),
        }
    }

    fn matches(&self, record: &PaperRecord) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        if self.claim.is_some_and(|n| record.artifact.supports(n)) {
            return true;
        }
        record
            .artifact
            .searchable_text()
            .any(|text| text.to_lowercase().contains(&self.needle))
    }
}
