//! Artifact file naming
//!
//! `analysis_<YYYYMMDD>_<HHMMSS>_<paper-id>.json`. The timestamp gives
//! chronological order and uniqueness; the paper id is only a readable hint.

use chrono::NaiveDateTime;

/// Prefix shared by all artifact files
pub const FILE_PREFIX: &str = "analysis_";

/// Timestamp layout embedded in file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const TIMESTAMP_LEN: usize = 15;
const PAPER_ID_MAX_CHARS: usize = 30;

/// Derive a file-safe paper identifier from a link
///
/// Takes the last path segment, keeps its first 30 characters, then drops
/// anything that is not ASCII alphanumeric, `-` or `_`.
///
/// # Examples
///
/// ```
/// use claimscope_domain::naming::paper_id;
///
/// assert_eq!(paper_id("https://arxiv.org/abs/2401.01234"), "240101234");
/// assert_eq!(paper_id(""), "unknown");
/// ```
pub fn paper_id(link: &str) -> String {
    let segment = link.trim().rsplit('/').next().unwrap_or_default();
    let id: String = segment
        .chars()
        .take(PAPER_ID_MAX_CHARS)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if id.is_empty() {
        "unknown".to_string()
    } else {
        id
    }
}

/// File stem (no extension) for an artifact created at `at`
pub fn artifact_file_stem(link: &str, at: NaiveDateTime) -> String {
    format!("{}{}_{}", FILE_PREFIX, at.format(TIMESTAMP_FORMAT), paper_id(link))
}

/// Recover the creation timestamp embedded in an artifact file name
///
/// Returns `None` for names that do not follow the artifact scheme.
pub fn parse_artifact_timestamp(file_name: &str) -> Option<NaiveDateTime> {
    let rest = file_name.strip_prefix(FILE_PREFIX)?;
    let stamp = rest.get(..TIMESTAMP_LEN)?;
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}
