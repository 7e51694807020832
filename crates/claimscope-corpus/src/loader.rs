//! Loading artifact files from a results directory

use crate::{CorpusError, CorpusLoadError};
use chrono::NaiveDateTime;
use claimscope_domain::naming::parse_artifact_timestamp;
use claimscope_domain::AnalysisArtifact;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Bookkeeping files that live next to artifacts and are skipped silently
pub const DEFAULT_IGNORED_FILES: [&str; 2] = ["processed_papers.json", "summaries.json"];

/// One loaded artifact plus where it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperRecord {
    /// File name within the results directory
    pub file_name: String,

    /// Timestamp embedded in the file name, if any
    pub created_at: Option<NaiveDateTime>,

    /// Position in load (file-name) order; ties in sorting fall back to it
    pub load_index: usize,

    /// The normalized artifact
    pub artifact: AnalysisArtifact,
}

/// Every artifact loaded from one directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct Corpus {
    /// Loaded records in file-name order
    pub records: Vec<PaperRecord>,

    /// Files that could not be loaded
    pub errors: Vec<CorpusLoadError>,
}

impl Corpus {
    /// Corpus with no records and no errors
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of loaded records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records loaded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load every artifact in `dir`, skipping [`DEFAULT_IGNORED_FILES`]
pub fn load_corpus(dir: impl AsRef<Path>) -> Result<Corpus, CorpusError> {
    let ignored: Vec<String> = DEFAULT_IGNORED_FILES.iter().map(|s| s.to_string()).collect();
    load_corpus_with(dir, &ignored)
}

/// Load every artifact in `dir`, skipping files named in `ignored`
///
/// Only a directory that cannot be listed is an error. Files that fail to
/// read or parse become [`CorpusLoadError`]s and are logged once at `warn`.
pub fn load_corpus_with(dir: impl AsRef<Path>, ignored: &[String]) -> Result<Corpus, CorpusError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|source| CorpusError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut corpus = Corpus::empty();
    let mut paths: Vec<PathBuf> = Vec::new();

    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if is_candidate(&path, ignored) {
                    paths.push(path);
                }
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                corpus.errors.push(CorpusLoadError {
                    path: dir.to_path_buf(),
                    reason: format!("directory entry unreadable: {}", e),
                });
            }
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    for path in paths {
        match load_artifact(&path) {
            Ok(artifact) => {
                let file_name = file_name_of(&path);
                corpus.records.push(PaperRecord {
                    created_at: parse_artifact_timestamp(&file_name),
                    file_name,
                    load_index: corpus.records.len(),
                    artifact,
                });
            }
            Err(reason) => {
                warn!(path = %path.display(), reason = %reason, "Skipping unreadable artifact");
                corpus.errors.push(CorpusLoadError { path, reason });
            }
        }
    }

    info!(
        dir = %dir.display(),
        papers = corpus.records.len(),
        errors = corpus.errors.len(),
        "Corpus loaded"
    );

    Ok(corpus)
}

fn is_candidate(path: &Path, ignored: &[String]) -> bool {
    if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
        return false;
    }
    let name = file_name_of(path);
    if ignored.iter().any(|i| *i == name) {
        debug!(file = %name, "Ignoring bookkeeping file");
        return false;
    }
    true
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read, parse and normalize one artifact file
fn load_artifact(path: &Path) -> Result<AnalysisArtifact, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("read failed: {}", e))?;
    let mut artifact: AnalysisArtifact =
        serde_json::from_str(&text).map_err(|e| format!("invalid artifact: {}", e))?;

    let duplicates = artifact.supported_claims.len() - artifact.claim_count();
    let dropped = artifact.normalize();
    if duplicates > 0 {
        warn!(path = %path.display(), duplicates, "Collapsed duplicate supported claims");
    }
    if !dropped.is_empty() {
        let keys: Vec<String> = dropped.iter().map(|n| n.to_string()).collect();
        warn!(
            path = %path.display(),
            claims = %keys.join(","),
            "Dropped evidence for claims not listed as supported"
        );
    }

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"{
        "paper_metadata": {"title": "T"},
        "theory_synthesis": {"description": "D"},
        "supported_claims": []
    }"#;

    #[test]
    fn test_missing_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_corpus(tmp.path().join("absent"));
        assert!(matches!(result, Err(CorpusError::Directory { .. })));
    }

    #[test]
    fn test_ignores_bookkeeping_and_non_json() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("processed_papers.json"), "[1, 2]").unwrap();
        std::fs::write(tmp.path().join("summaries.json"), "{}").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "not json").unwrap();
        std::fs::create_dir(tmp.path().join("nested.json")).unwrap();
        std::fs::write(tmp.path().join("analysis_20250101_000000_a.json"), MINIMAL).unwrap();

        let corpus = load_corpus(tmp.path()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert!(corpus.errors.is_empty());
    }

    #[test]
    fn test_custom_ignore_list() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("keep.json"), MINIMAL).unwrap();
        std::fs::write(tmp.path().join("skip.json"), MINIMAL).unwrap();

        let corpus = load_corpus_with(tmp.path(), &["skip.json".to_string()]).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.records[0].file_name, "keep.json");
        assert_eq!(corpus.records[0].created_at, None);
    }
}
