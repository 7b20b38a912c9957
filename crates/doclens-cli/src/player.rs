//! Presents a result in the terminal, animated or all at once.

use std::io::{IsTerminal, Write};
use std::time::Duration;

use crossterm::{cursor, queue, terminal};
use doclens_core::ResultPayload;
use doclens_core::config::ThresholdsConfig;
use doclens_reveal::{RevealSchedule, RevealSet};
use tracing::debug;

use crate::display::{Texts, render_report};
use crate::theme::{Theme, rows_for};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// How a playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Playback {
    Finished,
    /// Ctrl-C stopped the reveal; the partial frame stays on screen.
    Interrupted,
}

/// Show `payload` according to `schedule`.
///
/// Animated schedules are redrawn in place while the typewriters run, clipped
/// to the terminal height. Once the reveal ends the live frame is replaced by
/// the whole report. When stdout is not a terminal the settled report is
/// printed once instead.
pub(crate) async fn present(
    payload: &ResultPayload,
    schedule: &RevealSchedule,
    thresholds: &ThresholdsConfig,
) -> anyhow::Result<Playback> {
    let mut stdout = std::io::stdout();
    if !schedule.animate || !stdout.is_terminal() {
        let settled = schedule.settles_at(payload);
        for line in render_report(payload, schedule, settled, &Texts::Full, thresholds) {
            writeln!(stdout, "{line}")?;
        }
        stdout.flush()?;
        return Ok(Playback::Finished);
    }

    let mut set = RevealSet::start(payload, schedule);
    let settles_at = schedule.settles_at(payload);
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut drawn = 0u16;
    let outcome = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let elapsed = set.origin().elapsed();
                let lines = render_report(payload, schedule, elapsed, &Texts::Live(&set), thresholds);
                drawn = redraw(&mut stdout, &lines, drawn, terminal_size())?;
                if elapsed >= settles_at && set.is_complete() {
                    break Playback::Finished;
                }
            }
            _ = &mut ctrl_c => {
                set.cancel_all();
                break Playback::Interrupted;
            }
        }
    };

    // The final frame is printed in full and scrolls normally.
    let elapsed = set.origin().elapsed();
    let texts = match outcome {
        Playback::Finished => Texts::Full,
        Playback::Interrupted => Texts::Live(&set),
    };
    let lines = render_report(payload, schedule, elapsed, &texts, thresholds);
    rewind(&mut stdout, drawn)?;
    for line in &lines {
        write!(stdout, "{line}\r\n")?;
    }

    debug!(?outcome, "playback ended");
    if outcome == Playback::Interrupted {
        writeln!(stdout, "{}", Theme::warning("reveal interrupted"))?;
    }
    stdout.flush()?;
    Ok(outcome)
}

fn terminal_size() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}

/// Move back over `rows` previously drawn rows and clear them.
fn rewind(out: &mut impl Write, rows: u16) -> std::io::Result<()> {
    if rows > 0 {
        queue!(out, cursor::MoveToPreviousLine(rows))?;
    }
    queue!(out, terminal::Clear(terminal::ClearType::FromCursorDown))
}

/// Replace the previous frame of `previous_rows` rows with `lines`, drawing at
/// most `height - 1` rows so the cursor can always get back to the top of the
/// frame. Returns the rows the new frame occupies.
fn redraw(
    out: &mut impl Write,
    lines: &[String],
    previous_rows: u16,
    (width, height): (u16, u16),
) -> std::io::Result<u16> {
    let budget = height.saturating_sub(1).max(1);
    rewind(out, previous_rows)?;
    let mut rows = 0u16;
    for line in lines {
        let needed = rows_for(line, width);
        if rows.saturating_add(needed) > budget {
            break;
        }
        write!(out, "{line}\r\n")?;
        rows += needed;
    }
    out.flush()?;
    Ok(rows)
}
