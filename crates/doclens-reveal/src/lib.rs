//! Report reveal sequencing: pure schedules plus the timer-driven typewriter.

pub mod schedule;
pub mod text;
pub mod typewriter;

pub use schedule::{RevealSchedule, RiskCue, ScoreFill, SummaryCue, TextCue, schedule_offsets};
pub use text::{RevealError, RevealFrame, RevealFrames, RevealProgress, TextReveal};
pub use typewriter::{ElementId, RevealHandle, RevealSet, Typewriter};
