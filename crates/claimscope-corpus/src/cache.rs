//! Snapshot cache for a results directory

use crate::loader::{load_corpus_with, Corpus};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::error;

struct Snapshot {
    corpus: Arc<Corpus>,
    loaded_at: Instant,
}

/// Holds the last loaded corpus and reloads it once it is older than the interval
///
/// Readers get an `Arc<Corpus>`; a reload swaps the `Arc`, so nobody sees a
/// partially loaded corpus. An interval of zero reloads on every request.
pub struct CorpusCache {
    dir: PathBuf,
    ignored: Vec<String>,
    reload_interval: Duration,
    current: RwLock<Option<Snapshot>>,
}

impl CorpusCache {
    /// Create a cache; nothing is loaded until the first snapshot
    pub fn new(dir: impl Into<PathBuf>, ignored: Vec<String>, reload_interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            ignored,
            reload_interval,
            current: RwLock::new(None),
        }
    }

    /// Results directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Current corpus, reloading first if the cached one is stale
    pub fn snapshot(&self) -> Arc<Corpus> {
        {
            let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(snapshot) = current.as_ref() {
                if !self.reload_interval.is_zero()
                    && snapshot.loaded_at.elapsed() < self.reload_interval
                {
                    return Arc::clone(&snapshot.corpus);
                }
            }
        }
        self.reload()
    }

    /// Load the directory now and replace the cached corpus
    ///
    /// An unreadable directory is logged and yields an empty corpus.
    pub fn reload(&self) -> Arc<Corpus> {
        let corpus = match load_corpus_with(&self.dir, &self.ignored) {
            Ok(corpus) => corpus,
            Err(e) => {
                error!(error = %e, "Serving empty corpus");
                Corpus::empty()
            }
        };

        let corpus = Arc::new(corpus);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(Snapshot {
            corpus: Arc::clone(&corpus),
            loaded_at: Instant::now(),
        });
        corpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"{
        "paper_metadata": {"title": "T"},
        "theory_synthesis": {"description": "D"},
        "supported_claims": [4]
    }"#;

    #[test]
    fn test_zero_interval_reloads_every_time() {
        let tmp = TempDir::new().unwrap();
        let cache = CorpusCache::new(tmp.path(), Vec::new(), Duration::ZERO);
        assert_eq!(cache.snapshot().len(), 0);

        std::fs::write(tmp.path().join("a.json"), MINIMAL).unwrap();
        assert_eq!(cache.snapshot().len(), 1);
    }

    #[test]
    fn test_long_interval_serves_cached() {
        let tmp = TempDir::new().unwrap();
        let cache = CorpusCache::new(tmp.path(), Vec::new(), Duration::from_secs(3600));
        let first = cache.snapshot();

        std::fs::write(tmp.path().join("a.json"), MINIMAL).unwrap();
        let second = cache.snapshot();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 0);

        assert_eq!(cache.reload().len(), 1);
        assert_eq!(cache.snapshot().len(), 1);
    }

    #[test]
    fn test_missing_directory_serves_empty() {
        let tmp = TempDir::new().unwrap();
        let cache = CorpusCache::new(tmp.path().join("gone"), Vec::new(), Duration::ZERO);
        let corpus = cache.snapshot();
        assert!(corpus.is_empty());
        assert!(corpus.errors.is_empty());
    }
}
