//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Backoff schedule for transient provider failures
///
/// The delay after failed attempt `n` (1-based) is
/// `min(base_delay · 2^(n-1), max_delay)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,

    /// Delay after the first failure (milliseconds)
    pub base_delay_ms: u64,

    /// Upper bound on any single delay (milliseconds)
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Delay to wait after failed attempt `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63);
        let delay = self
            .base_delay_ms
            .checked_mul(1u64 << exponent)
            .unwrap_or(u64::MAX);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    /// Sum of all delays a fully exhausted run waits
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts).map(|n| self.delay_for(n)).sum()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum article length (characters)
    pub max_text_length: usize,

    /// Timeout for one provider attempt (seconds)
    pub request_timeout_secs: u64,

    /// Retry schedule
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Directory artifacts are written to
    pub output_dir: PathBuf,
}

impl ExtractorConfig {
    /// Get the per-attempt timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be at least 1".to_string());
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err("retry.base_delay_ms cannot exceed retry.max_delay_ms".to_string());
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err("output_dir must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_text_length: 400_000,
            request_timeout_secs: 300,
            retry: RetryPolicy::default(),
            output_dir: PathBuf::from("output/analysis_results"),
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: fail fast, fewer retries, shorter articles
    pub fn aggressive() -> Self {
        Self {
            max_text_length: 150_000,
            request_timeout_secs: 120,
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay_ms: 1_000,
                max_delay_ms: 10_000,
            },
            ..Self::default()
        }
    }

    /// Lenient preset: long articles, patient retries
    pub fn lenient() -> Self {
        Self {
            max_text_length: 1_000_000,
            request_timeout_secs: 600,
            retry: RetryPolicy {
                max_attempts: 8,
                base_delay_ms: 2_000,
                max_delay_ms: 120_000,
            },
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
        assert!(ExtractorConfig::aggressive().validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_backoff_doubles_from_base() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 100,
            base_delay_ms: 1_000,
            max_delay_ms: 5_000,
        };
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(5));
        assert_eq!(policy.delay_for(80), Duration::from_secs(5));
    }

    #[test]
    fn test_total_backoff() {
        // 5 attempts wait after failures 1..=4: 1 + 2 + 4 + 8
        assert_eq!(RetryPolicy::default().total_backoff(), Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_settings() {
        let mut config = ExtractorConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.retry.base_delay_ms = config.retry.max_delay_ms + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(parsed.max_text_length, config.max_text_length);
        assert_eq!(parsed.retry, config.retry);
        assert_eq!(parsed.output_dir, config.output_dir);
    }

    #[test]
    fn test_retry_section_optional() {
        let parsed = ExtractorConfig::from_toml(
            r#"
            max_text_length = 1000
            request_timeout_secs = 30
            output_dir = "out"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.retry, RetryPolicy::default());
    }
}
