//! Staggered reveal schedule for one displayed result.
//!
//! Summary points and risk entries appear in order with a fixed stride on
//! top of a per-category base delay. Each risk's explanation starts typing a
//! little after its entry appears. With animation off, every offset is zero
//! and all text is shown at once.

use std::time::Duration;

use doclens_core::{ResultPayload, RevealConfig, RiskLevel};
use tracing::warn;

use crate::text::TextReveal;

/// Start offsets `base + i * stride` for `i` in `0..count`.
pub fn schedule_offsets(count: usize, base: Duration, stride: Duration) -> Vec<Duration> {
    let mut offsets = Vec::with_capacity(count);
    let mut next = base;
    for _ in 0..count {
        offsets.push(next);
        next = next.saturating_add(stride);
    }
    offsets
}

/// How a text element is revealed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextCue {
    /// Fully visible from the start.
    Instant,
    /// Typed out from `start` at `rate` characters per second.
    Typed { start: Duration, rate: f64 },
}

impl TextCue {
    /// The reveal timeline for `text`. An invalid rate degrades to an instant reveal.
    pub fn reveal(&self, text: &str) -> TextReveal {
        match *self {
            Self::Instant => TextReveal::instant(text),
            Self::Typed { start, rate } => TextReveal::new(text, start, rate).unwrap_or_else(|e| {
                warn!(error = %e, "falling back to instant reveal");
                TextReveal::instant(text)
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCue {
    pub appear_at: Duration,
    pub text: TextCue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskCue {
    pub appear_at: Duration,
    pub explanation: TextCue,
    /// When the "see suggestion" affordance shows up.
    pub suggestion_at: Duration,
}

/// Fill animation of the score ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFill {
    /// Final fill, `risk_score * 10` clamped to `0..=100`.
    pub target_percent: f64,
    pub duration: Duration,
}

impl ScoreFill {
    /// Fill percentage at `elapsed`, linear over `duration`.
    pub fn percent_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.target_percent;
        }
        self.target_percent * elapsed.as_secs_f64() / self.duration.as_secs_f64()
    }
}

/// Per-element timing for one presented [`ResultPayload`].
#[derive(Debug, Clone, PartialEq)]
pub struct RevealSchedule {
    pub animate: bool,
    pub summary: Vec<SummaryCue>,
    pub risks: Vec<RiskCue>,
    /// Breakdown bar offsets in [`RiskLevel::DESCENDING`] order.
    pub breakdown: [Duration; 3],
    pub score: ScoreFill,
}

impl RevealSchedule {
    pub fn build(payload: &ResultPayload, animate: bool, config: &RevealConfig) -> Self {
        let target_percent = (payload.risk_score * 10.0).clamp(0.0, 100.0);

        if !animate {
            return Self {
                animate,
                summary: vec![
                    SummaryCue {
                        appear_at: Duration::ZERO,
                        text: TextCue::Instant,
                    };
                    payload.summary.len()
                ],
                risks: vec![
                    RiskCue {
                        appear_at: Duration::ZERO,
                        explanation: TextCue::Instant,
                        suggestion_at: Duration::ZERO,
                    };
                    payload.risks.len()
                ],
                breakdown: [Duration::ZERO; 3],
                score: ScoreFill {
                    target_percent,
                    duration: Duration::ZERO,
                },
            };
        }

        let summary = schedule_offsets(
            payload.summary.len(),
            config.summary_base(),
            config.summary_stride(),
        )
        .into_iter()
        .map(|at| SummaryCue {
            appear_at: at,
            text: TextCue::Typed {
                start: at,
                rate: config.summary_rate,
            },
        })
        .collect();

        let risks = schedule_offsets(payload.risks.len(), config.risk_base(), config.risk_stride())
            .into_iter()
            .map(|at| RiskCue {
                appear_at: at,
                explanation: TextCue::Typed {
                    start: at.saturating_add(config.explanation_lead()),
                    rate: config.explanation_rate,
                },
                suggestion_at: at.saturating_add(config.suggestion_lead()),
            })
            .collect();

        let bars = schedule_offsets(3, config.breakdown_base(), config.breakdown_stride());

        Self {
            animate,
            summary,
            risks,
            breakdown: [bars[0], bars[1], bars[2]],
            score: ScoreFill {
                target_percent,
                duration: config.score_fill(),
            },
        }
    }

    /// Offset of the breakdown bar for `level`.
    pub fn breakdown_at(&self, level: RiskLevel) -> Duration {
        let idx = RiskLevel::DESCENDING
            .iter()
            .position(|l| *l == level)
            .unwrap_or(0);
        self.breakdown[idx]
    }

    /// The moment the last element finishes, given the texts it reveals.
    pub fn settles_at(&self, payload: &ResultPayload) -> Duration {
        let summary = self
            .summary
            .iter()
            .zip(&payload.summary)
            .map(|(cue, text)| cue.appear_at.max(cue.text.reveal(text).ends_at()));
        let risks = self
            .risks
            .iter()
            .zip(&payload.risks)
            .map(|(cue, risk)| {
                cue.suggestion_at
                    .max(cue.explanation.reveal(&risk.explanation).ends_at())
            });
        summary
            .chain(risks)
            .chain(self.breakdown)
            .chain(std::iter::once(self.score.duration))
            .max()
            .unwrap_or(Duration::ZERO)
    }
}
