//! Generation model variants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which generation model an analysis runs on
///
/// Serialized with the provider's model identifier, which is also what the
/// artifact `_metadata.model_used` field records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelVariant {
    /// Full-size model
    #[default]
    #[serde(rename = "gpt-5")]
    Standard,
    /// Smaller, cheaper model
    #[serde(rename = "gpt-5-mini")]
    Mini,
    /// Smallest model
    #[serde(rename = "gpt-5-nano")]
    Nano,
}

impl ModelVariant {
    /// All variants
    pub const ALL: [ModelVariant; 3] = [ModelVariant::Standard, ModelVariant::Mini, ModelVariant::Nano];

    /// Provider model identifier
    pub fn model_id(&self) -> &'static str {
        match self {
            ModelVariant::Standard => "gpt-5",
            ModelVariant::Mini => "gpt-5-mini",
            ModelVariant::Nano => "gpt-5-nano",
        }
    }

    /// Short selector name used on the command line
    pub fn selector(&self) -> &'static str {
        match self {
            ModelVariant::Standard => "standard",
            ModelVariant::Mini => "mini",
            ModelVariant::Nano => "nano",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_id())
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    /// Accepts either the selector (`mini`) or the model id (`gpt-5-mini`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ModelVariant::ALL
            .into_iter()
            .find(|m| m.selector() == s || m.model_id() == s)
            .ok_or_else(|| format!("unknown model '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_standard() {
        assert_eq!(ModelVariant::default(), ModelVariant::Standard);
    }

    #[test]
    fn test_parse_selector_and_id() {
        assert_eq!("nano".parse::<ModelVariant>().unwrap(), ModelVariant::Nano);
        assert_eq!("gpt-5-mini".parse::<ModelVariant>().unwrap(), ModelVariant::Mini);
        assert!("gpt-4".parse::<ModelVariant>().is_err());
    }

    #[test]
    fn test_serde_uses_model_id() {
        assert_eq!(serde_json::to_string(&ModelVariant::Mini).unwrap(), "\"gpt-5-mini\"");
        assert_eq!(
            serde_json::from_str::<ModelVariant>("\"gpt-5\"").unwrap(),
            ModelVariant::Standard
        );
    }
}
