//! Report rendering for the terminal.
//!
//! [`render_report`] turns a payload, its reveal schedule and the time since
//! presentation into the lines of one frame. Live playback redraws it on a
//! timer; static output renders it once.

use std::time::Duration;

use chrono::{DateTime, Utc};
use doclens_core::config::ThresholdsConfig;
use doclens_core::{HistoryLog, ResultPayload, RiskLevel, SampleContract, guard_count};
use doclens_reveal::{ElementId, RevealSchedule, RevealSet, TextCue};

use crate::theme::Theme;

const SCORE_BAR_WIDTH: usize = 20;
const BREAKDOWN_BAR_WIDTH: usize = 24;

/// Where element text comes from.
pub(crate) enum Texts<'a> {
    /// Every element at full length.
    Full,
    /// Whatever the running typewriters show right now.
    Live(&'a RevealSet),
}

impl Texts<'_> {
    fn visible<'s>(&'s self, id: ElementId, full: &'s str) -> &'s str {
        match self {
            Texts::Full => full,
            Texts::Live(set) => set.get(id).map(|h| h.visible()).unwrap_or(full),
        }
    }
}

// ── Report ──

/// Lines of the report as it looks `elapsed` after presentation.
pub(crate) fn render_report(
    payload: &ResultPayload,
    schedule: &RevealSchedule,
    elapsed: Duration,
    texts: &Texts<'_>,
    thresholds: &ThresholdsConfig,
) -> Vec<String> {
    let mut lines = Vec::new();
    let level = thresholds.risk.classify(payload.risk_score);

    lines.push(Theme::header(&format!("=== {} ===", payload.document_name)));
    lines.push(String::new());

    // Score ring and shield. The ring takes the shield colour, the label the
    // risk classification.
    let percent = schedule.score.percent_at(elapsed);
    let shield = thresholds.shield.level(payload.risk_score);
    lines.push(format!(
        "  {:<12} {:.1} / 10  {} {:>3.0}%  {}",
        "Risk score",
        payload.risk_score,
        Theme::shield(shield, &bar(percent / 100.0, SCORE_BAR_WIDTH)),
        percent,
        Theme::risk_level(level),
    ));
    let guards = "◆".repeat(guard_count(payload.risk_score));
    lines.push(format!(
        "  {:<12} {} {}",
        "Protection",
        Theme::shield(shield, &format!("⛨ {}", shield.as_str())),
        Theme::dimmed(&guards),
    ));
    lines.push(String::new());

    // Breakdown bars.
    let breakdown = payload.breakdown();
    if RiskLevel::DESCENDING
        .iter()
        .any(|l| elapsed >= schedule.breakdown_at(*l))
    {
        lines.push(Theme::section("Risk Breakdown"));
        for level in RiskLevel::DESCENDING {
            if elapsed < schedule.breakdown_at(level) {
                continue;
            }
            lines.push(format!(
                "  {:<8} {} {}",
                level.as_str(),
                Theme::by_risk(level, &bar(breakdown.share(level), BREAKDOWN_BAR_WIDTH)),
                breakdown.count(level),
            ));
        }
        lines.push(String::new());
    }

    // Summary.
    let shown_summary: Vec<_> = schedule
        .summary
        .iter()
        .zip(&payload.summary)
        .enumerate()
        .filter(|(_, (cue, _))| elapsed >= cue.appear_at)
        .collect();
    if !shown_summary.is_empty() {
        lines.push(Theme::section("Key Points"));
        for (i, (_, text)) in shown_summary {
            lines.push(format!("  • {}", texts.visible(ElementId::Summary(i), text)));
        }
        lines.push(String::new());
    }

    // Risks.
    let shown_risks: Vec<_> = schedule
        .risks
        .iter()
        .zip(&payload.risks)
        .enumerate()
        .filter(|(_, (cue, _))| elapsed >= cue.appear_at)
        .collect();
    if !shown_risks.is_empty() {
        lines.push(Theme::section(&format!(
            "Flagged Clauses ({})",
            payload.risks.len()
        )));
        for (i, (cue, risk)) in shown_risks {
            lines.push(format!(
                "  [{}] {}",
                Theme::risk_level(risk.risk_level),
                risk.clause
            ));
            if let Some(clause_text) = &risk.clause_text {
                lines.push(format!("      {}", Theme::dimmed(&format!("\"{clause_text}\""))));
            }
            let explanation = texts.visible(ElementId::Explanation(i), &risk.explanation);
            if !explanation.is_empty() {
                lines.push(format!("      {explanation}"));
            }
            if elapsed >= cue.suggestion_at {
                lines.push(format!("      → {}", Theme::dimmed(&risk.suggestion)));
            }
        }
        lines.push(String::new());
    }

    lines
}

fn bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

// ── Catalog ──

pub(crate) fn print_samples(samples: &[SampleContract], thresholds: &ThresholdsConfig) {
    println!("{}", Theme::header("Sample contracts"));
    println!();
    for (i, sample) in samples.iter().enumerate() {
        let result = &sample.result;
        let level = thresholds.risk.classify(result.risk_score);
        let b = result.breakdown();
        println!(
            "  {}. {:<32} {:>4.1}  {}",
            i + 1,
            sample.name,
            result.risk_score,
            Theme::risk_level(level)
        );
        println!(
            "     {}",
            Theme::dimmed(&format!(
                "{}  ({} high, {} medium, {} low)",
                sample.description, b.high, b.medium, b.low
            ))
        );
    }
}

pub(crate) fn samples_json(samples: &[SampleContract]) -> serde_json::Value {
    serde_json::Value::Array(
        samples
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.name,
                    "slug": s.slug(),
                    "description": s.description,
                    "result": s.result,
                })
            })
            .collect(),
    )
}

// ── History ──

pub(crate) fn history_lines(log: &HistoryLog, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![Theme::header("Recent activity")];
    if log.is_empty() {
        lines.push(Theme::dimmed("  No scans yet. Upload a contract and run `scan`."));
        return lines;
    }
    for entry in log.entries() {
        let high = if entry.high_risk_count == 0 {
            Theme::dimmed("no high risks")
        } else {
            Theme::by_risk(
                RiskLevel::High,
                &format!("{} high risk", entry.high_risk_count),
            )
        };
        lines.push(format!(
            "  {}  {:<36} {:>4.1}  {}",
            Theme::timestamp(&entry.scanned_at),
            entry.document_name,
            entry.risk_score,
            high
        ));
    }
    lines.push(Theme::separator());
    lines.push(format!(
        "  Average score {:.1}   High-risk findings {}   Scans this week {}",
        log.average_score().unwrap_or(0.0),
        log.total_high_risk(),
        log.scanned_this_week(now)
    ));
    lines
}

// ── Timeline ──

fn ms(d: Duration) -> String {
    format!("{}ms", d.as_millis())
}

fn cue_span(cue: &TextCue, text: &str) -> String {
    match cue {
        TextCue::Instant => "instant".into(),
        TextCue::Typed { rate, .. } => {
            let reveal = cue.reveal(text);
            format!(
                "types {}..{} at {rate} chars/s",
                ms(reveal.start()),
                ms(reveal.ends_at())
            )
        }
    }
}

/// The computed reveal timeline, one line per element.
pub(crate) fn timeline_lines(payload: &ResultPayload, schedule: &RevealSchedule) -> Vec<String> {
    let mut lines = vec![Theme::header(&format!(
        "Reveal timeline: {} ({})",
        payload.document_name,
        if schedule.animate { "animated" } else { "static" }
    ))];

    lines.push(Theme::section("Breakdown bars"));
    for level in RiskLevel::DESCENDING {
        lines.push(format!(
            "  {:<8} {:>7}",
            level.as_str(),
            ms(schedule.breakdown_at(level))
        ));
    }
    lines.push(format!(
        "  {:<8} fills to {:.0}% over {}",
        "Score",
        schedule.score.target_percent,
        ms(schedule.score.duration)
    ));

    lines.push(Theme::section("Key points"));
    for (i, (cue, text)) in schedule.summary.iter().zip(&payload.summary).enumerate() {
        lines.push(format!(
            "  [{i}] {:>7}  {}",
            ms(cue.appear_at),
            cue_span(&cue.text, text)
        ));
    }

    lines.push(Theme::section("Flagged clauses"));
    for (i, (cue, risk)) in schedule.risks.iter().zip(&payload.risks).enumerate() {
        lines.push(format!(
            "  [{i}] {:>7}  {}  explanation {}  suggestion {}",
            ms(cue.appear_at),
            risk.clause,
            cue_span(&cue.explanation, &risk.explanation),
            ms(cue.suggestion_at)
        ));
    }

    lines.push(format!("Settles at {}", ms(schedule.settles_at(payload))));
    lines
}
