//! Report payload types shared by the analyzer, the sequencer and the CLI.

use serde::{Deserialize, Serialize};

/// Severity assigned to a single flagged clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Display order used by breakdown bars: most severe first.
    pub const DESCENDING: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flagged clause with its explanation and a suggested rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEntry {
    pub clause: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_text: Option<String>,
    pub risk_level: RiskLevel,
    pub explanation: String,
    pub suggestion: String,
}

/// A complete analysis result as shown in the report.
///
/// Produced once by an analyzer or taken from the sample catalog and never
/// mutated afterwards; callers share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    pub summary: Vec<String>,
    pub risks: Vec<RiskEntry>,
    /// Aggregate score, conventionally 0.0 to 10.0.
    pub risk_score: f64,
    pub document_name: String,
}

impl ResultPayload {
    /// Count of risk entries per level.
    pub fn breakdown(&self) -> RiskBreakdown {
        let mut breakdown = RiskBreakdown::default();
        for risk in &self.risks {
            match risk.risk_level {
                RiskLevel::High => breakdown.high += 1,
                RiskLevel::Medium => breakdown.medium += 1,
                RiskLevel::Low => breakdown.low += 1,
            }
        }
        breakdown
    }

    pub fn high_risk_count(&self) -> usize {
        self.breakdown().high
    }
}

/// Per-level risk counts for one payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RiskBreakdown {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }

    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
        }
    }

    /// Fraction of all risks at `level`, in `0.0..=1.0`. Zero when there are no risks.
    pub fn share(&self, level: RiskLevel) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(level) as f64 / total as f64
    }
}

/// A user-selected file. Only the name and size are ever looked at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub size_bytes: u64,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    /// Lowercased extension after the last `.`, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Size in mebibytes, as shown next to the file name.
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: RiskLevel) -> RiskEntry {
        RiskEntry {
            clause: "Payment Terms".into(),
            clause_text: None,
            risk_level: level,
            explanation: "Net 15.".into(),
            suggestion: "Keep as is.".into(),
        }
    }

    #[test]
    fn breakdown_counts_each_level() {
        let payload = ResultPayload {
            summary: vec![],
            risks: vec![
                entry(RiskLevel::High),
                entry(RiskLevel::Low),
                entry(RiskLevel::High),
            ],
            risk_score: 7.5,
            document_name: "a.pdf".into(),
        };
        let b = payload.breakdown();
        assert_eq!(b, RiskBreakdown { high: 2, medium: 0, low: 1 });
        assert_eq!(b.total(), 3);
        assert_eq!(payload.high_risk_count(), 2);
        assert!((b.share(RiskLevel::High) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_breakdown_has_zero_share() {
        let b = RiskBreakdown::default();
        assert_eq!(b.share(RiskLevel::Medium), 0.0);
    }

    #[test]
    fn payload_uses_camel_case_json() {
        let json = r#"{
            "summary": ["One point"],
            "risks": [{
                "clause": "Liability",
                "riskLevel": "Medium",
                "explanation": "Capped.",
                "suggestion": "Raise the cap."
            }],
            "riskScore": 4.8,
            "documentName": "License.pdf"
        }"#;
        let parsed: ResultPayload = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.document_name, "License.pdf");
        assert_eq!(parsed.risks[0].risk_level, RiskLevel::Medium);
        assert!(parsed.risks[0].clause_text.is_none());

        let out = serde_json::to_string(&parsed).unwrap();
        assert!(out.contains("\"riskScore\":4.8"));
        assert!(!out.contains("clauseText"));
    }

    #[test]
    fn file_extension_is_lowercased() {
        assert_eq!(FileHandle::new("Deal.PDF", 1).extension().as_deref(), Some("pdf"));
        assert_eq!(FileHandle::new("notes", 1).extension(), None);
        assert_eq!(FileHandle::new(".bashrc", 1).extension(), None);
        assert_eq!(FileHandle::new("archive.tar.docx", 1).extension().as_deref(), Some("docx"));
    }

    #[test]
    fn size_in_mib() {
        let f = FileHandle::new("a.pdf", 3 * 1024 * 1024 / 2);
        assert!((f.size_mib() - 1.5).abs() < 1e-9);
    }
}
