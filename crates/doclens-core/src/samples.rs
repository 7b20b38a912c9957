//! Canned sample contracts for demo mode.
//!
//! Each sample carries a complete, fixed [`ResultPayload`].

use thiserror::Error;

use crate::document::{ResultPayload, RiskEntry, RiskLevel};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown sample '{0}'; run `doclens samples` to list them")]
    UnknownSample(String),
}

/// One entry of the demo catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleContract {
    pub name: &'static str,
    pub description: &'static str,
    pub result: ResultPayload,
}

impl SampleContract {
    /// Lowercase, dash-separated form of the name (`low-risk-consulting-agreement`).
    pub fn slug(&self) -> String {
        slugify(self.name)
    }
}

/// The full demo catalog in display order.
pub fn catalog() -> Vec<SampleContract> {
    vec![high_risk_marketing(), balanced_license(), low_risk_consulting()]
}

/// Find a sample by 1-based index, exact name (case-insensitive) or slug.
pub fn find_sample(query: &str) -> Result<SampleContract, CatalogError> {
    let query = query.trim();
    let samples = catalog();

    if let Ok(index) = query.parse::<usize>()
        && index >= 1
        && let Some(sample) = samples.get(index - 1)
    {
        return Ok(sample.clone());
    }

    let wanted = slugify(query);
    samples
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(query) || s.slug() == wanted)
        .ok_or_else(|| CatalogError::UnknownSample(query.to_string()))
}

fn slugify(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn risk(
    clause: &str,
    clause_text: &str,
    risk_level: RiskLevel,
    explanation: &str,
    suggestion: &str,
) -> RiskEntry {
    RiskEntry {
        clause: clause.to_string(),
        clause_text: Some(clause_text.to_string()),
        risk_level,
        explanation: explanation.to_string(),
        suggestion: suggestion.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn high_risk_marketing() -> SampleContract {
    SampleContract {
        name: "High-Risk Marketing Contract",
        description: "Service agreement with concerning automatic renewal and penalty clauses",
        result: ResultPayload {
            document_name: "Marketing_Service_Agreement_DEMO.pdf".into(),
            summary: strings(&[
                "Digital marketing consulting services for 12-month term",
                "Monthly retainer of $8,000 with additional project fees",
                "Automatic renewal clause with 120-day cancellation notice",
                "5% monthly penalty on late payments",
                "Client liable for all marketing spend regardless of results",
            ]),
            risks: vec![
                risk(
                    "Automatic Renewal with Extended Notice",
                    "This Agreement shall automatically renew for successive one-year periods unless either party provides written notice of termination at least one hundred twenty (120) days prior to the end of the current term.",
                    RiskLevel::High,
                    "Contract automatically renews for another full year unless cancelled 120 days in advance. This is unusually long and could trap you in an unwanted commitment.",
                    "Negotiate for: 'This Agreement may be renewed for successive one-year periods only upon mutual written agreement, with standard 30-day notice for non-renewal.'",
                ),
                risk(
                    "Aggressive Late Payment Penalties",
                    "Client agrees to pay a service charge of five percent (5%) per month on any overdue amounts, compounded monthly.",
                    RiskLevel::High,
                    "5% monthly penalty compounds quickly. An $8,000 payment could become $8,400 after just one month, $8,820 after two months.",
                    "Counter with: 'Late payments incur a one-time administrative fee of $50 or 1.5% per month (whichever is less), with a 15-day grace period before penalties apply.'",
                ),
                risk(
                    "No Performance Guarantees",
                    "Client acknowledges that marketing results cannot be guaranteed and agrees to pay all fees regardless of campaign performance or return on investment.",
                    RiskLevel::Medium,
                    "Client is liable for all marketing spend regardless of campaign results or ROI. This shifts all risk to you.",
                    "Add performance metrics: 'Provider commits to achieving mutually agreed KPIs, with fee adjustments if performance falls below 70% of targets for two consecutive months.'",
                ),
                risk(
                    "Broad Liability Exclusion",
                    "Provider shall not be liable for any indirect, incidental, special, or consequential damages arising from this Agreement.",
                    RiskLevel::Medium,
                    "Vendor excludes liability for indirect damages, which could include lost profits from poor campaign performance.",
                    "Modify to: 'Provider's liability is limited to direct damages only, capped at the total contract value, except in cases of gross negligence or breach of confidentiality.'",
                ),
            ],
            risk_score: 8.2,
        },
    }
}

fn balanced_license() -> SampleContract {
    SampleContract {
        name: "Balanced Software License",
        description: "Software licensing agreement with moderate risk factors",
        result: ResultPayload {
            document_name: "Software_License_Agreement_DEMO.pdf".into(),
            summary: strings(&[
                "Software licensing for business productivity suite",
                "Annual subscription with monthly payment option",
                "Standard 30-day termination notice required",
                "Data export rights included upon termination",
                "Limited liability cap at 12 months of fees paid",
            ]),
            risks: vec![
                risk(
                    "Data Retention Period",
                    "Upon termination, Provider will retain Client data for ninety (90) days to allow for data export, after which all data will be permanently deleted.",
                    RiskLevel::Medium,
                    "Provider retains data for 90 days after termination. Ensure you have adequate time to export all critical data.",
                    "Request: 'Provider will retain data for 180 days and provide multiple export formats. Client will receive 30 and 60-day deletion reminders.'",
                ),
                risk(
                    "Service Level Agreement",
                    "Provider guarantees 99.5% uptime with service credits equal to pro-rated fees for any downtime exceeding this threshold.",
                    RiskLevel::Low,
                    "99.5% uptime guarantee with service credits for outages. This is reasonable for most business applications.",
                    "This SLA is fair and industry-standard. Consider requesting notification procedures for planned maintenance windows.",
                ),
                risk(
                    "Intellectual Property Indemnification",
                    "Provider will defend and indemnify Client against any third-party claims alleging that the licensed software infringes any patent, copyright, or trademark.",
                    RiskLevel::Low,
                    "Vendor provides IP indemnification, protecting you from third-party claims. This is a positive feature.",
                    "This clause protects you well. Ensure it covers both direct and indirect infringement claims for complete protection.",
                ),
            ],
            risk_score: 4.8,
        },
    }
}

fn low_risk_consulting() -> SampleContract {
    SampleContract {
        name: "Low-Risk Consulting Agreement",
        description: "Well-balanced consulting contract with minimal risk factors",
        result: ResultPayload {
            document_name: "Consulting_Agreement_DEMO.pdf".into(),
            summary: strings(&[
                "Management consulting services for operational efficiency",
                "Project-based engagement with defined milestones",
                "Either party may terminate with 14-day written notice",
                "Payment due within 15 days of invoice",
                "All work product owned by client upon payment",
            ]),
            risks: vec![
                risk(
                    "Confidentiality Obligations",
                    "Both parties agree to maintain in confidence all proprietary information disclosed during the term of this Agreement and for three (3) years thereafter.",
                    RiskLevel::Low,
                    "Standard mutual confidentiality terms. Both parties are protected equally, which is appropriate.",
                    "This is well-balanced. Consider adding exceptions for information that becomes publicly available through no fault of the receiving party.",
                ),
                risk(
                    "Limitation of Liability",
                    "Each party's total liability under this Agreement shall not exceed the total fees paid or payable under this Agreement.",
                    RiskLevel::Low,
                    "Liability is capped at the total contract value, which is reasonable for consulting services.",
                    "This is a fair mutual limitation. Ensure it excludes liability for confidentiality breaches and gross negligence.",
                ),
                risk(
                    "Payment Terms",
                    "Client shall pay all invoices within fifteen (15) days of receipt. No interest or penalties apply to late payments under 30 days.",
                    RiskLevel::Low,
                    "15-day payment terms are standard. No excessive penalties for late payment are mentioned.",
                    "These terms are reasonable and client-friendly. The 30-day grace period before any penalties is generous.",
                ),
            ],
            risk_score: 2.1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{ShieldLevel, classify, shield_level};

    #[test]
    fn catalog_has_three_samples_in_order() {
        let names: Vec<&str> = catalog().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "High-Risk Marketing Contract",
                "Balanced Software License",
                "Low-Risk Consulting Agreement",
            ]
        );
    }

    #[test]
    fn low_risk_consulting_scenario() {
        let sample = find_sample("Low-Risk Consulting Agreement").unwrap();
        let result = &sample.result;
        assert_eq!(result.risk_score, 2.1);
        assert_eq!(result.risks.len(), 3);
        assert!(result.risks.iter().all(|r| r.risk_level == RiskLevel::Low));
        assert_eq!(classify(result.risk_score), RiskLevel::Low);
        assert_eq!(shield_level(result.risk_score), ShieldLevel::High);
    }

    #[test]
    fn high_risk_marketing_scenario() {
        let sample = find_sample("High-Risk Marketing Contract").unwrap();
        assert_eq!(sample.result.risk_score, 8.2);
        let b = sample.result.breakdown();
        assert_eq!((b.high, b.medium, b.low), (2, 2, 0));
        assert_eq!(classify(sample.result.risk_score), RiskLevel::High);
    }

    #[test]
    fn balanced_license_is_medium() {
        let sample = find_sample("2").unwrap();
        assert_eq!(sample.name, "Balanced Software License");
        assert_eq!(classify(sample.result.risk_score), RiskLevel::Medium);
        assert_eq!(shield_level(sample.result.risk_score), ShieldLevel::Medium);
    }

    #[test]
    fn lookup_by_slug_and_case() {
        assert_eq!(
            find_sample("low-risk-consulting-agreement").unwrap().name,
            "Low-Risk Consulting Agreement"
        );
        assert_eq!(
            find_sample("high-risk marketing CONTRACT").unwrap().name,
            "High-Risk Marketing Contract"
        );
    }

    #[test]
    fn lookup_rejects_unknown_and_out_of_range() {
        assert_eq!(
            find_sample("0"),
            Err(CatalogError::UnknownSample("0".into()))
        );
        assert!(find_sample("4").is_err());
        assert!(find_sample("lease").is_err());
    }

    #[test]
    fn every_sample_has_five_summary_points() {
        for sample in catalog() {
            assert_eq!(sample.result.summary.len(), 5, "{}", sample.name);
            assert!(sample.result.risks.iter().all(|r| r.clause_text.is_some()));
        }
    }
}
