//! Evidence strength ratings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How well a paper's evidence supports a claim
///
/// Exactly three values are valid. Deserializing anything else fails, which is
/// what lets the extractor reject responses like `"strength": "extreme"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    /// Direct, unambiguous support
    Strong,
    /// Support with caveats or indirect evidence
    Moderate,
    /// Suggestive only
    Weak,
}

impl Strength {
    /// All strengths, strongest first
    pub const ALL: [Strength; 3] = [Strength::Strong, Strength::Moderate, Strength::Weak];

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Strong => "strong",
            Strength::Moderate => "moderate",
            Strength::Weak => "weak",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong" => Ok(Strength::Strong),
            "moderate" => Ok(Strength::Moderate),
            "weak" => Ok(Strength::Weak),
            other => Err(format!("unknown strength '{}'", other)),
        }
    }
}
