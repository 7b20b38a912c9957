//! Runtime configuration.
//!
//! Built-in defaults are overlaid with an optional TOML file. Every key is
//! optional in the file; missing keys keep their default. The merged value
//! is validated before use.
//!
//! ```toml
//! [reveal]
//! summary_base_ms = 600
//! explanation_rate = 30.0
//!
//! [analysis]
//! delay_ms = 3000
//!
//! [thresholds.shield]
//! high_up_to = 3.0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::history::DEFAULT_CAPACITY;
use crate::risk::{RiskThresholds, ShieldThresholds};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value for {field}: {message}")]
    Validation { field: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoclensConfig {
    pub reveal: RevealConfig,
    pub analysis: AnalysisConfig,
    pub upload: UploadConfig,
    pub history: HistoryConfig,
    pub thresholds: ThresholdsConfig,
}

/// Timing policy of the staggered report reveal. Offsets are in milliseconds,
/// rates in characters per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub summary_base_ms: u64,
    pub summary_stride_ms: u64,
    pub summary_rate: f64,
    pub risk_base_ms: u64,
    pub risk_stride_ms: u64,
    pub explanation_lead_ms: u64,
    pub explanation_rate: f64,
    pub suggestion_lead_ms: u64,
    pub breakdown_base_ms: u64,
    pub breakdown_stride_ms: u64,
    pub score_fill_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            summary_base_ms: 600,
            summary_stride_ms: 100,
            summary_rate: 25.0,
            risk_base_ms: 800,
            risk_stride_ms: 200,
            explanation_lead_ms: 400,
            explanation_rate: 30.0,
            suggestion_lead_ms: 700,
            breakdown_base_ms: 500,
            breakdown_stride_ms: 200,
            score_fill_ms: 2000,
        }
    }
}

impl RevealConfig {
    pub fn summary_base(&self) -> Duration {
        Duration::from_millis(self.summary_base_ms)
    }

    pub fn summary_stride(&self) -> Duration {
        Duration::from_millis(self.summary_stride_ms)
    }

    pub fn risk_base(&self) -> Duration {
        Duration::from_millis(self.risk_base_ms)
    }

    pub fn risk_stride(&self) -> Duration {
        Duration::from_millis(self.risk_stride_ms)
    }

    pub fn explanation_lead(&self) -> Duration {
        Duration::from_millis(self.explanation_lead_ms)
    }

    pub fn suggestion_lead(&self) -> Duration {
        Duration::from_millis(self.suggestion_lead_ms)
    }

    pub fn breakdown_base(&self) -> Duration {
        Duration::from_millis(self.breakdown_base_ms)
    }

    pub fn breakdown_stride(&self) -> Duration {
        Duration::from_millis(self.breakdown_stride_ms)
    }

    pub fn score_fill(&self) -> Duration {
        Duration::from_millis(self.score_fill_ms)
    }
}

/// Simulated backend timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub delay_ms: u64,
    pub timeout_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delay_ms: 3000,
            timeout_ms: 10_000,
        }
    }
}

impl AnalysisConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Which files the upload step accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub accepted_extensions: Vec<String>,
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: ["pdf", "txt", "doc", "docx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub risk: RiskThresholds,
    pub shield: ShieldThresholds,
}

impl DoclensConfig {
    /// Defaults overlaid with `path`, if given, then validated.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let config = Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!(path = %path.display(), "loaded config file");
                config
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML overlay on top of the defaults. Does not validate.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let r = &self.reveal;
        check_rate("reveal.summary_rate", r.summary_rate)?;
        check_rate("reveal.explanation_rate", r.explanation_rate)?;

        if self.analysis.timeout_ms == 0 {
            return Err(invalid("analysis.timeout_ms", "must be greater than zero"));
        }

        if self.upload.accepted_extensions.is_empty() {
            return Err(invalid(
                "upload.accepted_extensions",
                "at least one extension is required",
            ));
        }
        if self
            .upload
            .accepted_extensions
            .iter()
            .any(|e| e.trim().is_empty() || e.starts_with('.'))
        {
            return Err(invalid(
                "upload.accepted_extensions",
                "extensions are given without a leading dot, e.g. \"pdf\"",
            ));
        }
        if self.upload.max_bytes == 0 {
            return Err(invalid("upload.max_bytes", "must be greater than zero"));
        }

        if self.history.capacity == 0 {
            return Err(invalid("history.capacity", "must be at least 1"));
        }

        let risk = &self.thresholds.risk;
        check_finite("thresholds.risk.medium_from", risk.medium_from)?;
        check_finite("thresholds.risk.high_from", risk.high_from)?;
        if risk.medium_from > risk.high_from {
            return Err(invalid(
                "thresholds.risk",
                format!(
                    "medium_from ({}) must not exceed high_from ({})",
                    risk.medium_from, risk.high_from
                ),
            ));
        }

        let shield = &self.thresholds.shield;
        check_finite("thresholds.shield.high_up_to", shield.high_up_to)?;
        check_finite("thresholds.shield.medium_up_to", shield.medium_up_to)?;
        if shield.high_up_to > shield.medium_up_to {
            return Err(invalid(
                "thresholds.shield",
                format!(
                    "high_up_to ({}) must not exceed medium_up_to ({})",
                    shield.high_up_to, shield.medium_up_to
                ),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.into(),
    }
}

fn check_rate(field: &str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, format!("{value} is not a positive rate")));
    }
    Ok(())
}

fn check_finite(field: &str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() {
        return Err(invalid(field, "must be a finite number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DoclensConfig::default();
        config.validate().unwrap();
        assert_eq!(config.reveal.summary_base(), Duration::from_millis(600));
        assert_eq!(config.analysis.delay(), Duration::from_secs(3));
        assert_eq!(config.history.capacity, 5);
        assert_eq!(config.upload.max_bytes, 10_485_760);
    }

    #[test]
    fn partial_overlay_keeps_other_defaults() {
        let config = DoclensConfig::from_toml_str(
            r#"
            [reveal]
            risk_stride_ms = 250

            [thresholds.shield]
            high_up_to = 2.5
            "#,
        )
        .unwrap();
        assert_eq!(config.reveal.risk_stride_ms, 250);
        assert_eq!(config.reveal.risk_base_ms, 800);
        assert_eq!(config.thresholds.shield.high_up_to, 2.5);
        assert_eq!(config.thresholds.shield.medium_up_to, 6.0);
        assert_eq!(config.thresholds.risk, RiskThresholds::default());
    }

    #[test]
    fn load_without_path_uses_defaults() {
        let config = DoclensConfig::load(None).unwrap();
        assert_eq!(config, DoclensConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\ndelay_ms = 10").unwrap();
        let config = DoclensConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.analysis.delay_ms, 10);
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reveal\nsummary_rate = ").unwrap();
        let err = DoclensConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DoclensConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn rejects_non_positive_rate() {
        let config = DoclensConfig::from_toml_str("[reveal]\nexplanation_rate = 0.0").unwrap();
        match config.validate().unwrap_err() {
            ConfigError::Validation { field, .. } => assert_eq!(field, "reveal.explanation_rate"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_inverted_risk_thresholds() {
        let config =
            DoclensConfig::from_toml_str("[thresholds.risk]\nmedium_from = 8.0\nhigh_from = 7.0")
                .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_dotted_extension() {
        let config =
            DoclensConfig::from_toml_str("[upload]\naccepted_extensions = [\".pdf\"]").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_history_capacity() {
        let config = DoclensConfig::from_toml_str("[history]\ncapacity = 0").unwrap();
        assert!(config.validate().is_err());
    }
}
