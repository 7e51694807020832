//! Aggregate statistics over a corpus

use crate::loader::PaperRecord;
use claimscope_domain::{Category, ClaimNumber, Strength};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label used for artifacts without run metadata
pub const UNKNOWN_MODEL: &str = "unknown";

/// Corpus-wide counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusStatistics {
    /// Number of loaded papers
    pub total_papers: usize,
    /// Papers supporting each claim; every claim present, zeros included
    pub claim_counts: BTreeMap<ClaimNumber, usize>,
    /// Evidence entries per strength; every strength present
    pub strength_counts: BTreeMap<Strength, usize>,
    /// Papers per model id, `unknown` for artifacts without metadata
    pub model_counts: BTreeMap<String, usize>,
    /// Evidence entries across all papers
    pub total_evidence: usize,
    /// Papers with at least one additional insight
    pub papers_with_insights: usize,
}

/// Support count for one reference claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimSupport {
    /// Claim number
    pub number: u8,
    /// Claim category
    pub category: Category,
    /// Human-readable category name
    pub category_name: &'static str,
    /// Canonical claim wording
    pub text: &'static str,
    /// Papers supporting the claim
    pub count: usize,
}

/// Compute statistics from scratch over `records`
pub fn compute_statistics(records: &[PaperRecord]) -> CorpusStatistics {
    let mut claim_counts: BTreeMap<ClaimNumber, usize> =
        ClaimNumber::all().map(|n| (n, 0)).collect();
    let mut strength_counts: BTreeMap<Strength, usize> =
        Strength::ALL.iter().map(|s| (*s, 0)).collect();
    let mut model_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_evidence = 0;
    let mut papers_with_insights = 0;

    for record in records {
        let artifact = &record.artifact;

        // Records are normalized on load, so supported claims are distinct
        for claim in &artifact.supported_claims {
            *claim_counts.entry(*claim).or_default() += 1;
        }

        for entry in artifact.evidence_details.values() {
            *strength_counts.entry(entry.strength).or_default() += 1;
            total_evidence += 1;
        }

        let model = artifact
            .model()
            .map(|m| m.model_id().to_string())
            .unwrap_or_else(|| UNKNOWN_MODEL.to_string());
        *model_counts.entry(model).or_default() += 1;

        if artifact.insight_count() > 0 {
            papers_with_insights += 1;
        }
    }

    CorpusStatistics {
        total_papers: records.len(),
        claim_counts,
        strength_counts,
        model_counts,
        total_evidence,
        papers_with_insights,
    }
}

/// Per-claim support counts in claim order
pub fn claim_distribution(records: &[PaperRecord]) -> Vec<ClaimSupport> {
    let stats = compute_statistics(records);
    ClaimNumber::all()
        .map(|n| {
            let claim = n.claim();
            ClaimSupport {
                number: claim.number,
                category: claim.category,
                category_name: claim.category.display_name(),
                text: claim.text,
                count: stats.claim_counts.get(&n).copied().unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_corpus_has_all_keys() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats.total_papers, 0);
        assert_eq!(stats.claim_counts.len(), 50);
        assert!(stats.claim_counts.values().all(|c| *c == 0));
        assert_eq!(stats.strength_counts.len(), 3);
        assert!(stats.model_counts.is_empty());

        let distribution = claim_distribution(&[]);
        assert_eq!(distribution.len(), 50);
        assert_eq!(distribution[11].number, 12);
        assert_eq!(distribution[11].category, Category::RecurrentDynamics);
    }

    #[test]
    fn test_statistics_serialize_with_string_keys() {
        let json = serde_json::to_value(compute_statistics(&[])).unwrap();
        assert_eq!(json["claim_counts"]["12"], 0);
        assert_eq!(json["strength_counts"]["strong"], 0);
    }
}
