//! Integration tests for claimscope-corpus
//!
//! Load real files from a temp directory, then run the query layer over them.

use claimscope_corpus::{
    claim_distribution, compute_statistics, filter_by_claim_count, filter_by_model,
    filter_by_strength, filter_has_insights, load_corpus, search_text, sort_by, PaperQuery,
    PaperRecord, SortDirection, SortKey, StrengthMode,
};
use claimscope_domain::{
    AnalysisArtifact, ClaimNumber, DirectQuote, EvidenceEntry, Insight, ModelVariant,
    PaperMetadata, RunMetadata, Strength, TheorySynthesis,
};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

fn claim(n: u8) -> ClaimNumber {
    ClaimNumber::new(n).unwrap()
}

fn entry(strength: Strength, quote: &str) -> EvidenceEntry {
    EvidenceEntry {
        claim_text: "reference wording".to_string(),
        direct_quotes: vec![DirectQuote {
            quote: quote.to_string(),
            page_or_section: "p. 1".to_string(),
        }],
        interpretation: "interpretation".to_string(),
        strength,
        limitations: String::new(),
    }
}

fn artifact(
    title: &str,
    evidence: &[(u8, Strength)],
    insights: usize,
    model: Option<ModelVariant>,
) -> AnalysisArtifact {
    AnalysisArtifact {
        paper_metadata: PaperMetadata {
            title: title.to_string(),
            link: format!("https://example.org/{}", title.to_lowercase().replace(' ', "-")),
        },
        theory_synthesis: TheorySynthesis {
            description: format!("Synthesis of {}", title),
            kind: "hybrid".to_string(),
        },
        supported_claims: evidence.iter().map(|(n, _)| claim(*n)).collect(),
        evidence_details: evidence
            .iter()
            .map(|(n, s)| (claim(*n), entry(*s, &format!("quote for claim {}", n))))
            .collect(),
        additional_or_contradictory_insights: (0..insights)
            .map(|i| Insight::Text(format!("insight {}", i)))
            .collect(),
        metadata: model.map(|m| RunMetadata {
            analysis_timestamp: "2025-01-01T00:00:00+00:00".to_string(),
            model_used: m,
            paper_link: String::new(),
            prompt_tokens_estimate: None,
            attempts: Some(1),
        }),
    }
}

fn write(dir: &Path, name: &str, artifact: &AnalysisArtifact) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(artifact).unwrap()).unwrap();
}

fn records(artifacts: Vec<AnalysisArtifact>) -> Vec<PaperRecord> {
    artifacts
        .into_iter()
        .enumerate()
        .map(|(i, artifact)| PaperRecord {
            file_name: format!("analysis_2025010{}_000000_x.json", i + 1),
            created_at: None,
            load_index: i,
            artifact,
        })
        .collect()
}

fn sample_records() -> Vec<PaperRecord> {
    records(vec![
        artifact("Alpha Loops", &[(10, Strength::Strong), (12, Strength::Weak)], 1, Some(ModelVariant::Standard)),
        artifact("beta workspace", &[(1, Strength::Moderate)], 0, Some(ModelVariant::Mini)),
        artifact("Gamma Thalamus", &[(3, Strength::Weak), (4, Strength::Weak), (5, Strength::Strong)], 2, None),
        artifact("Delta", &[], 0, Some(ModelVariant::Nano)),
    ])
}

fn titles(records: &[PaperRecord]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r.artifact.paper_metadata.title.as_str())
        .collect()
}

#[test]
fn test_three_valid_one_invalid() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "analysis_20250102_000000_b.json", &artifact("B", &[(2, Strength::Strong)], 0, None));
    write(tmp.path(), "analysis_20250101_000000_a.json", &artifact("A", &[(1, Strength::Weak)], 0, None));
    write(tmp.path(), "analysis_20250103_000000_c.json", &artifact("C", &[], 1, None));
    std::fs::write(tmp.path().join("analysis_20250104_000000_d.json"), "{ not json").unwrap();

    let corpus = load_corpus(tmp.path()).unwrap();

    assert_eq!(corpus.records.len(), 3);
    assert_eq!(corpus.errors.len(), 1);
    assert!(corpus.errors[0].path.ends_with("analysis_20250104_000000_d.json"));
    assert_eq!(titles(&corpus.records), vec!["A", "B", "C"]);
    assert_eq!(
        corpus.records.iter().map(|r| r.load_index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(corpus.records[0].created_at.is_some());
}

#[test]
fn test_load_round_trips_claims_and_evidence() {
    let tmp = TempDir::new().unwrap();
    let original = artifact("Round", &[(7, Strength::Moderate), (12, Strength::Strong)], 1, Some(ModelVariant::Mini));
    write(tmp.path(), "analysis_20250101_000000_round.json", &original);

    let corpus = load_corpus(tmp.path()).unwrap();
    let loaded = &corpus.records[0].artifact;
    assert_eq!(loaded.supported_claims, original.supported_claims);
    assert_eq!(loaded.evidence_details, original.evidence_details);
    assert_eq!(loaded.model(), Some(ModelVariant::Mini));
}

#[test]
fn test_stray_evidence_dropped_on_load() {
    let tmp = TempDir::new().unwrap();
    let json = r#"{
        "paper_metadata": {"title": "Stray", "link": ""},
        "theory_synthesis": {"description": "", "type": ""},
        "supported_claims": [12, 12, 3],
        "evidence_details": {
            "3": {"claim_text": "c", "direct_quotes": [], "interpretation": "i", "strength": "weak"},
            "30": {"claim_text": "c", "direct_quotes": [], "interpretation": "i", "strength": "strong"}
        },
        "additional_or_contradictory_insights": []
    }"#;
    std::fs::write(tmp.path().join("stray.json"), json).unwrap();

    let corpus = load_corpus(tmp.path()).unwrap();
    assert!(corpus.errors.is_empty());
    let loaded = &corpus.records[0].artifact;
    assert_eq!(loaded.supported_claims, vec![claim(12), claim(3)]);
    assert_eq!(loaded.evidence_details.keys().copied().collect::<Vec<_>>(), vec![claim(3)]);
    assert!(!loaded.supports(claim(30)));
}

#[test]
fn test_invalid_strength_file_is_load_error() {
    let tmp = TempDir::new().unwrap();
    let good = artifact("Good", &[(1, Strength::Strong)], 0, None);
    let bad = serde_json::to_string(&good).unwrap().replace("\"strong\"", "\"extreme\"");
    write(tmp.path(), "a.json", &good);
    std::fs::write(tmp.path().join("b.json"), bad).unwrap();

    let corpus = load_corpus(tmp.path()).unwrap();
    assert_eq!(corpus.records.len(), 1);
    assert_eq!(corpus.errors.len(), 1);
    assert!(corpus.errors[0].reason.contains("invalid artifact"));
}

#[test]
fn test_strength_filter_paper_mode() {
    let records = sample_records();
    let allowed = BTreeSet::from([Strength::Strong]);

    let kept = filter_by_strength(&records, &allowed, StrengthMode::Paper);
    assert_eq!(titles(&kept), vec!["Alpha Loops", "Gamma Thalamus"]);
    // Paper mode keeps every entry of a matching paper
    assert_eq!(kept[1].artifact.evidence_details.len(), 3);
}

#[test]
fn test_strength_filter_evidence_mode() {
    let records = sample_records();
    let allowed = BTreeSet::from([Strength::Weak]);

    let kept = filter_by_strength(&records, &allowed, StrengthMode::Evidence);
    assert_eq!(titles(&kept), vec!["Alpha Loops", "Gamma Thalamus"]);
    assert_eq!(kept[0].artifact.evidence_details.len(), 1);
    assert_eq!(kept[1].artifact.evidence_details.len(), 2);
    assert!(kept
        .iter()
        .flat_map(|r| r.artifact.evidence_details.values())
        .all(|e| e.strength == Strength::Weak));
    // Input untouched
    assert_eq!(records[0].artifact.evidence_details.len(), 2);
}

#[test]
fn test_empty_strength_set_is_no_filter() {
    let records = sample_records();
    let kept = filter_by_strength(&records, &BTreeSet::new(), StrengthMode::Evidence);
    assert_eq!(kept, records);
}

#[test]
fn test_claim_count_model_and_insight_filters() {
    let records = sample_records();

    assert_eq!(titles(&filter_by_claim_count(&records, Some(2), None)), vec!["Alpha Loops", "Gamma Thalamus"]);
    assert_eq!(titles(&filter_by_claim_count(&records, Some(1), Some(2))), vec!["Alpha Loops", "beta workspace"]);
    assert_eq!(titles(&filter_by_claim_count(&records, None, Some(0))), vec!["Delta"]);

    assert_eq!(titles(&filter_by_model(&records, ModelVariant::Mini)), vec!["beta workspace"]);
    assert!(filter_by_model(&records, ModelVariant::Standard)
        .iter()
        .all(|r| r.artifact.metadata.is_some()));

    assert_eq!(titles(&filter_has_insights(&records, true)), vec!["Alpha Loops", "Gamma Thalamus"]);
    assert_eq!(filter_has_insights(&records, false).len(), 4);
}

#[test]
fn test_search_text_case_insensitive() {
    let records = sample_records();
    assert_eq!(titles(&search_text(&records, "THALAMUS")), vec!["Gamma Thalamus"]);
    assert_eq!(titles(&search_text(&records, "synthesis of beta")), vec!["beta workspace"]);
    assert_eq!(search_text(&records, "   ").len(), 4);
    assert!(search_text(&records, "no such phrase").is_empty());
}

#[test]
fn test_search_claim_number_is_union() {
    let mut records = sample_records();
    // Mentions "12" in text without supporting claim 12
    records[3].artifact.theory_synthesis.description = "Cites study 12 in passing".to_string();

    let result = search_text(&records, "12");

    let by_text: BTreeSet<usize> = records
        .iter()
        .filter(|r| r.artifact.searchable_text().any(|t| t.to_lowercase().contains("12")))
        .map(|r| r.load_index)
        .collect();
    let by_claim: BTreeSet<usize> = records
        .iter()
        .filter(|r| r.artifact.supports(claim(12)))
        .map(|r| r.load_index)
        .collect();
    let expected: BTreeSet<usize> = by_text.union(&by_claim).copied().collect();

    let got: BTreeSet<usize> = result.iter().map(|r| r.load_index).collect();
    assert_eq!(got, expected);
    assert_eq!(titles(&result), vec!["Alpha Loops", "Delta"]);
}

#[test]
fn test_sort_claim_count_descending_stable() {
    let records = records(vec![
        artifact("one-a", &[(1, Strength::Weak)], 0, None),
        artifact("three", &[(1, Strength::Weak), (2, Strength::Weak), (3, Strength::Weak)], 0, None),
        artifact("one-b", &[(4, Strength::Weak)], 0, None),
        artifact("zero", &[], 0, None),
        artifact("one-c", &[(5, Strength::Weak)], 0, None),
    ]);

    let desc = sort_by(&records, SortKey::ClaimCount, SortDirection::Descending);
    assert_eq!(titles(&desc), vec!["three", "one-a", "one-b", "one-c", "zero"]);

    let asc = sort_by(&records, SortKey::ClaimCount, SortDirection::Ascending);
    assert_eq!(titles(&asc), vec!["zero", "one-a", "one-b", "one-c", "three"]);
}

#[test]
fn test_sort_by_title_and_date() {
    let mut records = sample_records();
    let by_title = sort_by(&records, SortKey::Title, SortDirection::Ascending);
    assert_eq!(titles(&by_title), vec!["Alpha Loops", "beta workspace", "Delta", "Gamma Thalamus"]);

    records[0].created_at = claimscope_domain::naming::parse_artifact_timestamp("analysis_20250301_000000_a.json");
    records[2].created_at = claimscope_domain::naming::parse_artifact_timestamp("analysis_20250201_000000_c.json");

    let asc = sort_by(&records, SortKey::Date, SortDirection::Ascending);
    assert_eq!(titles(&asc), vec!["beta workspace", "Delta", "Gamma Thalamus", "Alpha Loops"]);

    let desc = sort_by(&records, SortKey::Date, SortDirection::Descending);
    assert_eq!(titles(&desc), vec!["Alpha Loops", "Gamma Thalamus", "beta workspace", "Delta"]);
}

#[test]
fn test_composed_query() {
    let records = sample_records();
    let query = PaperQuery {
        strengths: BTreeSet::from([Strength::Weak]),
        strength_mode: StrengthMode::Evidence,
        min_claims: Some(2),
        has_insights: true,
        sort: Some(SortKey::InsightCount),
        direction: SortDirection::Descending,
        ..PaperQuery::default()
    };

    let result = query.run(&records);
    assert_eq!(titles(&result), vec!["Gamma Thalamus", "Alpha Loops"]);
    assert_eq!(result[1].artifact.evidence_details.len(), 1);

    let none = PaperQuery {
        model: Some(ModelVariant::Nano),
        search: Some("loops".to_string()),
        ..PaperQuery::default()
    };
    assert!(none.run(&records).is_empty());
}

#[test]
fn test_statistics() {
    let records = sample_records();
    let stats = compute_statistics(&records);

    assert_eq!(stats.total_papers, 4);
    assert_eq!(stats.claim_counts[&claim(12)], 1);
    assert_eq!(stats.claim_counts[&claim(50)], 0);
    assert_eq!(stats.strength_counts[&Strength::Weak], 3);
    assert_eq!(stats.strength_counts[&Strength::Strong], 2);
    assert_eq!(stats.strength_counts[&Strength::Moderate], 1);
    assert_eq!(stats.model_counts["gpt-5"], 1);
    assert_eq!(stats.model_counts["gpt-5-mini"], 1);
    assert_eq!(stats.model_counts["gpt-5-nano"], 1);
    assert_eq!(stats.model_counts["unknown"], 1);
    assert_eq!(stats.total_evidence, 6);
    assert_eq!(stats.papers_with_insights, 2);

    let distribution = claim_distribution(&records);
    assert_eq!(distribution.len(), 50);
    assert_eq!(distribution[9].count, 1);
    assert_eq!(distribution.iter().map(|c| c.count).sum::<usize>(), 6);
}

fn arb_strength() -> impl Strategy<Value = Strength> {
    prop_oneof![Just(Strength::Strong), Just(Strength::Moderate), Just(Strength::Weak)]
}

fn arb_records() -> impl Strategy<Value = Vec<PaperRecord>> {
    prop::collection::vec(
        (prop::collection::btree_map(1u8..=50, arb_strength(), 0..6), 0usize..3),
        0..12,
    )
    .prop_map(|papers| {
        let artifacts = papers
            .into_iter()
            .enumerate()
            .map(|(i, (evidence, insights))| {
                let evidence: Vec<(u8, Strength)> = evidence.into_iter().collect();
                artifact(&format!("paper {}", i), &evidence, insights, None)
            })
            .collect();
        records(artifacts)
    })
}

proptest! {
    #[test]
    fn prop_strong_filter_never_returns_zero_strong(records in arb_records()) {
        let allowed = BTreeSet::from([Strength::Strong]);
        for mode in [StrengthMode::Paper, StrengthMode::Evidence] {
            for record in filter_by_strength(&records, &allowed, mode) {
                let strong = record
                    .artifact
                    .evidence_details
                    .values()
                    .filter(|e| e.strength == Strength::Strong)
                    .count();
                prop_assert!(strong > 0);
            }
        }
    }

    #[test]
    fn prop_claim_count_sort_non_increasing_and_stable(records in arb_records()) {
        let sorted = sort_by(&records, SortKey::ClaimCount, SortDirection::Descending);
        prop_assert_eq!(sorted.len(), records.len());
        for pair in sorted.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.artifact.claim_count() >= b.artifact.claim_count());
            if a.artifact.claim_count() == b.artifact.claim_count() {
                prop_assert!(a.load_index < b.load_index);
            }
        }
    }

    #[test]
    fn prop_statistics_match_corpus(records in arb_records()) {
        let stats = compute_statistics(&records);
        let evidence: usize = records.iter().map(|r| r.artifact.evidence_details.len()).sum();
        prop_assert_eq!(stats.total_evidence, evidence);
        prop_assert_eq!(stats.strength_counts.values().sum::<usize>(), evidence);
        prop_assert_eq!(stats.claim_counts.len(), 50);
    }
}
