//! Artifact persistence
//!
//! JSON files are serialized into a temp file inside the target directory and
//! then moved into place, so a final name never refers to a partial file.
//! Artifacts and theory backups use `persist_noclobber` and are never
//! overwritten; only the current theory file is replaced.

use crate::error::ExtractorError;
use chrono::NaiveDateTime;
use claimscope_domain::naming::artifact_file_stem;
use claimscope_domain::AnalysisArtifact;
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Upper bound on `-N` suffixes tried for one second's worth of names
const MAX_NAME_SUFFIX: u32 = 1_000;

/// Writes analysis artifacts into one directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer for `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `artifact` under a name derived from `link` and `at`
    ///
    /// Returns the final path. If the name is taken, `-2`, `-3`, ... is
    /// appended before `.json`.
    pub fn write(
        &self,
        artifact: &AnalysisArtifact,
        link: &str,
        at: NaiveDateTime,
    ) -> Result<PathBuf, ExtractorError> {
        write_json_noclobber(&self.dir, &artifact_file_stem(link, at), artifact)
    }
}

/// Write `value` as `<dir>/<stem>.json`, adding `-N` before `.json` if taken
pub(crate) fn write_json_noclobber<T: Serialize>(
    dir: &Path,
    stem: &str,
    value: &T,
) -> Result<PathBuf, ExtractorError> {
    let mut staged = stage_json(dir, value)?;

    let mut suffix = 1;
    loop {
        let path = candidate_path(dir, stem, suffix);
        match staged.persist_noclobber(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists && suffix < MAX_NAME_SUFFIX => {
                debug!(path = %path.display(), "name taken, trying next suffix");
                staged = e.file;
                suffix += 1;
            }
            Err(e) => return Err(ExtractorError::Io(e.error)),
        }
    }
}

/// Atomically replace `path` with `value`
pub(crate) fn replace_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExtractorError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = stage_json(dir, value)?;
    staged.persist(path).map_err(|e| ExtractorError::Io(e.error))?;
    Ok(())
}

fn stage_json<T: Serialize>(dir: &Path, value: &T) -> Result<NamedTempFile, ExtractorError> {
    std::fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut staged, value)?;
    staged.write_all(b"\n")?;
    staged.as_file().sync_all()?;
    Ok(staged)
}

fn candidate_path(dir: &Path, stem: &str, suffix: u32) -> PathBuf {
    if suffix == 1 {
        dir.join(format!("{}.json", stem))
    } else {
        dir.join(format!("{}-{}.json", stem, suffix))
    }
}
