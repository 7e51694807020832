//! Parse and validate model output into an analysis artifact

use crate::error::ExtractorError;
use claimscope_domain::AnalysisArtifact;

/// Parse a raw model response into a validated artifact
///
/// Accepts bare JSON or JSON wrapped in a markdown code fence. Any schema or
/// invariant violation is a [`ExtractorError::MalformedResponse`]; nothing is
/// coerced.
pub fn parse_analysis_response(response: &str) -> Result<AnalysisArtifact, ExtractorError> {
    let json_str = extract_json(response)?;

    let artifact: AnalysisArtifact = serde_json::from_str(json_str)
        .map_err(|e| ExtractorError::MalformedResponse(format!("JSON parse error: {}", e)))?;

    artifact
        .validate()
        .map_err(|e| ExtractorError::MalformedResponse(e.to_string()))?;

    Ok(artifact)
}

/// Extract JSON from response, handling markdown code blocks
pub(crate) fn extract_json(response: &str) -> Result<&str, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.is_empty() {
        return Err(ExtractorError::MalformedResponse("Empty response".to_string()));
    }

    let Some(fenced) = trimmed.strip_prefix("```") else {
        return Ok(trimmed);
    };

    // Skip the opening line (``` or ```json) and the closing fence
    let body = match fenced.split_once('\n') {
        Some((_, rest)) => rest,
        None => return Err(ExtractorError::MalformedResponse("Empty code block".to_string())),
    };
    let body = body.trim_end();
    Ok(body.strip_suffix("```").unwrap_or(body).trim())
}

/// First `max_chars` characters of a response, for log previews
pub(crate) fn preview(response: &str, max_chars: usize) -> String {
    let mut chars = response.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
