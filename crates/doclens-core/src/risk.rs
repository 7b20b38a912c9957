//! Score-to-level mappings.
//!
//! Two threshold sets exist and are kept apart on purpose:
//!
//! - [`RiskThresholds`] labels the aggregate score (`>= 4` Medium, `>= 7` High).
//! - [`ShieldThresholds`] picks the shield's protection level (`<= 3` High,
//!   `<= 6` Medium, otherwise Low).
//!
//! They disagree for scores in `(3, 4)` and `(6, 7)`.

use serde::{Deserialize, Serialize};

use crate::document::RiskLevel;

/// Lower bounds (inclusive) of the Medium and High score bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub medium_from: f64,
    pub high_from: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium_from: 4.0,
            high_from: 7.0,
        }
    }
}

impl RiskThresholds {
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score >= self.high_from {
            RiskLevel::High
        } else if score >= self.medium_from {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// How well the contract protects the reader. Inverse of the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldLevel {
    High,
    Medium,
    Low,
}

impl ShieldLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Upper bounds (inclusive) of the High and Medium protection bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldThresholds {
    pub high_up_to: f64,
    pub medium_up_to: f64,
}

impl Default for ShieldThresholds {
    fn default() -> Self {
        Self {
            high_up_to: 3.0,
            medium_up_to: 6.0,
        }
    }
}

impl ShieldThresholds {
    pub fn level(&self, score: f64) -> ShieldLevel {
        if score <= self.high_up_to {
            ShieldLevel::High
        } else if score <= self.medium_up_to {
            ShieldLevel::Medium
        } else {
            ShieldLevel::Low
        }
    }
}

/// Classify an aggregate score with the default risk thresholds.
pub fn classify(score: f64) -> RiskLevel {
    RiskThresholds::default().classify(score)
}

/// Shield protection level for a score with the default shield thresholds.
pub fn shield_level(score: f64) -> ShieldLevel {
    ShieldThresholds::default().level(score)
}

/// Number of guard glyphs drawn around the shield: safer contracts get more.
pub fn guard_count(score: f64) -> usize {
    let raw = ((10.0 - score) * 0.8).floor();
    if raw.is_finite() && raw > 3.0 {
        raw as usize
    } else {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundaries_are_exact() {
        assert_eq!(classify(3.9), RiskLevel::Low);
        assert_eq!(classify(4.0), RiskLevel::Medium);
        assert_eq!(classify(6.9), RiskLevel::Medium);
        assert_eq!(classify(7.0), RiskLevel::High);
    }

    #[test]
    fn classify_extremes() {
        assert_eq!(classify(0.0), RiskLevel::Low);
        assert_eq!(classify(10.0), RiskLevel::High);
        assert_eq!(classify(-1.0), RiskLevel::Low);
    }

    #[test]
    fn shield_boundaries_are_inclusive() {
        assert_eq!(shield_level(3.0), ShieldLevel::High);
        assert_eq!(shield_level(3.01), ShieldLevel::Medium);
        assert_eq!(shield_level(6.0), ShieldLevel::Medium);
        assert_eq!(shield_level(6.01), ShieldLevel::Low);
    }

    #[test]
    fn threshold_sets_disagree_between_bands() {
        // 3.5 is Low risk yet only Medium protection.
        assert_eq!(classify(3.5), RiskLevel::Low);
        assert_eq!(shield_level(3.5), ShieldLevel::Medium);
        // 6.5 is Medium risk yet Low protection.
        assert_eq!(classify(6.5), RiskLevel::Medium);
        assert_eq!(shield_level(6.5), ShieldLevel::Low);
    }

    #[test]
    fn custom_thresholds_are_independent() {
        let risk = RiskThresholds {
            medium_from: 2.0,
            high_from: 5.0,
        };
        assert_eq!(risk.classify(5.0), RiskLevel::High);
        // Shield defaults are unaffected.
        assert_eq!(shield_level(5.0), ShieldLevel::Medium);
    }

    #[test]
    fn guard_count_has_a_floor_of_three() {
        assert_eq!(guard_count(2.1), 6);
        assert_eq!(guard_count(0.0), 8);
        assert_eq!(guard_count(8.2), 3);
        assert_eq!(guard_count(10.0), 3);
        assert_eq!(guard_count(f64::NAN), 3);
    }
}
