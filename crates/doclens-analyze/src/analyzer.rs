//! Analysis backend seam.
//!
//! There is no real document understanding. [`MockAnalyzer`] waits for a
//! fixed delay and returns a canned report named after the uploaded file.

use std::time::Duration;

use doclens_core::{FileHandle, ResultPayload, RiskEntry, RiskLevel};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis of {name} failed: {reason}")]
    Failed { name: String, reason: String },

    #[error("analysis of {name} timed out after {after:?}")]
    TimedOut { name: String, after: Duration },
}

/// Progress steps shown while an analysis runs.
pub const ANALYSIS_STEPS: [&str; 4] = [
    "Reading document content...",
    "Identifying key contract terms...",
    "Analyzing risk factors...",
    "Generating recommendations...",
];

const PREVIEW_WORDS: usize = 50;

const PLACEHOLDER_CONTENT: &str = "Sample contract preview: This Service Agreement (\"Agreement\") \
is entered into on [Date] by and between [Company Name], a [State] corporation (\"Company\"), \
and [Client Name] (\"Client\"). The Company agrees to provide digital marketing consulting \
services as outlined in Exhibit A. Payment terms require monthly retainer of $5,000 due within \
30 days of invoice. Contract includes automatic renewal clause requiring 90-day notice for \
termination...";

/// Preview of an uploaded document: the first words of its content.
///
/// Uploads are never opened, so every file previews the same placeholder text.
pub fn document_preview() -> String {
    let words: Vec<_> = PLACEHOLDER_CONTENT.split(' ').take(PREVIEW_WORDS).collect();
    format!("{}...", words.join(" "))
}

/// Produces a report for an accepted upload.
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, file: &FileHandle) -> Result<ResultPayload, AnalysisError>;
}

/// Simulated backend: sleeps for `delay`, then returns [`mock_report`].
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    delay: Duration,
}

impl MockAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

#[async_trait::async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, file: &FileHandle) -> Result<ResultPayload, AnalysisError> {
        info!(name = %file.name, delay_ms = self.delay.as_millis() as u64, "analyzing");
        tokio::time::sleep(self.delay).await;
        Ok(mock_report(&file.name))
    }
}

/// Run `analyzer` with an upper bound on how long the result may take.
pub async fn analyze_with_timeout(
    analyzer: &dyn Analyzer,
    file: &FileHandle,
    limit: Duration,
) -> Result<ResultPayload, AnalysisError> {
    match tokio::time::timeout(limit, analyzer.analyze(file)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(name = %file.name, limit_ms = limit.as_millis() as u64, "analysis timed out");
            Err(AnalysisError::TimedOut {
                name: file.name.clone(),
                after: limit,
            })
        }
    }
}

fn risk(
    clause: &str,
    clause_text: &str,
    level: RiskLevel,
    explanation: &str,
    suggestion: &str,
) -> RiskEntry {
    RiskEntry {
        clause: clause.into(),
        clause_text: Some(clause_text.into()),
        risk_level: level,
        explanation: explanation.into(),
        suggestion: suggestion.into(),
    }
}

/// The canned consulting-agreement report every upload receives.
pub fn mock_report(document_name: &str) -> ResultPayload {
    ResultPayload {
        summary: vec![
            "Service agreement for digital marketing consulting".into(),
            "12-month contract term with automatic renewal clause".into(),
            "Payment due within 30 days of invoice".into(),
            "$5,000 monthly retainer with additional project fees".into(),
            "Either party can terminate with 60-day notice".into(),
        ],
        risks: vec![
            risk(
                "Automatic Renewal Clause",
                "This Agreement shall automatically renew for successive one-year periods unless either party provides written notice of termination at least ninety (90) days prior to the end of the current term.",
                RiskLevel::High,
                "Contract automatically renews for another full year unless cancelled 90 days in advance. This could lock you into unwanted commitments.",
                "Consider changing to: 'This Agreement shall renew for successive one-year periods only upon mutual written agreement of both parties, with a 30-day notice period for non-renewal.'",
            ),
            risk(
                "Late Payment Penalty",
                "Client agrees to pay a service charge of three percent (3%) per month on any overdue amounts.",
                RiskLevel::Medium,
                "3% monthly fee on overdue payments compounds quickly. A $5,000 payment could become $5,150 after just one month.",
                "Negotiate for: 'Late payments shall incur a one-time administrative fee of $25 or 1.5% per month, whichever is less, with a 10-day grace period.'",
            ),
            risk(
                "Intellectual Property Rights",
                "All work product, deliverables, and intellectual property created under this Agreement shall become the exclusive property of Client upon full payment.",
                RiskLevel::Low,
                "Clear definition of work product ownership. Client retains rights to all deliverables upon full payment.",
                "This clause is well-balanced. Consider adding: 'Provider retains rights to general methodologies and pre-existing intellectual property.'",
            ),
            risk(
                "Liability Limitation",
                "Provider's total liability under this Agreement shall not exceed the total amount paid by Client under this Agreement.",
                RiskLevel::Medium,
                "Vendor liability is capped at contract value. Consider if this is adequate for your business needs.",
                "Consider: 'Provider's liability is limited to the lesser of $50,000 or the total contract value, excluding cases of gross negligence or willful misconduct.'",
            ),
        ],
        risk_score: 6.5,
        document_name: document_name.into(),
    }
}
