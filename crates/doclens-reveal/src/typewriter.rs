//! Timer-driven playback of [`TextReveal`] timelines.
//!
//! Each [`Typewriter`] task owns its timers and publishes progress through a
//! `watch` channel. Tasks stop as soon as their cancellation token fires;
//! after that no further progress is published. [`RevealSet`] groups the
//! typewriters of one displayed result so they can be torn down together.

use std::sync::Arc;

use doclens_core::ResultPayload;
use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

use crate::schedule::RevealSchedule;
use crate::text::{RevealProgress, TextReveal};

pub struct Typewriter;

impl Typewriter {
    /// Start playing `reveal` with its timeline anchored at `origin`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(reveal: TextReveal, origin: Instant, cancel: CancellationToken) -> RevealHandle {
        let reveal = Arc::new(reveal);
        let initial = reveal.progress_at(Instant::now().saturating_duration_since(origin));
        let (tx, rx) = watch::channel(initial);
        let task = tokio::spawn(run(Arc::clone(&reveal), origin, tx, cancel.clone()));
        RevealHandle {
            reveal,
            rx,
            cancel,
            task,
        }
    }
}

async fn run(
    reveal: Arc<TextReveal>,
    origin: Instant,
    tx: watch::Sender<RevealProgress>,
    cancel: CancellationToken,
) {
    let len = reveal.len();
    if len == 0 {
        return;
    }

    // The start offset flips `started` before the first character shows.
    let mut checkpoints = vec![(reveal.start(), 0usize)];
    checkpoints.extend(
        reveal
            .frames()
            .enumerate()
            .map(|(i, frame)| (frame.elapsed, if reveal.is_instant() { len } else { i + 1 })),
    );

    for (elapsed, shown) in checkpoints {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(shown = tx.borrow().shown, len, "reveal cancelled");
                return;
            }
            _ = sleep_until(origin + elapsed) => {}
        }
        if cancel.is_cancelled() {
            return;
        }
        let next = RevealProgress {
            shown,
            started: true,
            complete: shown == len,
        };
        let published = tx.send_if_modified(|current| {
            // Never move backwards, even if a checkpoint was already passed at spawn time.
            if next.shown > current.shown || (next.started && !current.started) {
                *current = next;
                true
            } else {
                false
            }
        });
        if published {
            debug!(shown, len, at_ms = elapsed.as_millis() as u64, "reveal tick");
        }
    }
    debug!(len, "reveal complete");
}

/// Owner of one running typewriter. Dropping it cancels the task.
pub struct RevealHandle {
    reveal: Arc<TextReveal>,
    rx: watch::Receiver<RevealProgress>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RevealHandle {
    pub fn progress(&self) -> RevealProgress {
        *self.rx.borrow()
    }

    /// The currently visible prefix.
    pub fn visible(&self) -> &str {
        self.reveal.prefix(self.progress().shown)
    }

    pub fn text(&self) -> &str {
        self.reveal.text()
    }

    /// A receiver for progress updates, e.g. to await changes.
    pub fn subscribe(&self) -> watch::Receiver<RevealProgress> {
        self.rx.clone()
    }

    /// Stop revealing. The visible prefix stays where it is.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the text is complete or the task has stopped.
    pub async fn settled(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|p| p.complete).await;
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Identifies a text element of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Summary(usize),
    Explanation(usize),
}

/// All typewriters of one presented result.
///
/// Every element runs under a child of one parent token: cancelling an
/// element leaves its siblings running, while [`reset`](Self::reset) or
/// dropping the set cancels everything still pending.
pub struct RevealSet {
    origin: Instant,
    elements: Vec<(ElementId, RevealHandle)>,
    parent: CancellationToken,
    _guard: DropGuard,
}

impl RevealSet {
    /// Spawn typewriters for every text element of `payload` per `schedule`.
    pub fn start(payload: &ResultPayload, schedule: &RevealSchedule) -> Self {
        let parent = CancellationToken::new();
        let mut set = Self {
            origin: Instant::now(),
            elements: Vec::with_capacity(payload.summary.len() + payload.risks.len()),
            _guard: parent.clone().drop_guard(),
            parent,
        };
        set.spawn_all(payload, schedule);
        set
    }

    fn spawn_all(&mut self, payload: &ResultPayload, schedule: &RevealSchedule) {
        for (i, (cue, text)) in schedule.summary.iter().zip(&payload.summary).enumerate() {
            let handle = Typewriter::spawn(
                cue.text.reveal(text),
                self.origin,
                self.parent.child_token(),
            );
            self.elements.push((ElementId::Summary(i), handle));
        }
        for (i, (cue, risk)) in schedule.risks.iter().zip(&payload.risks).enumerate() {
            let handle = Typewriter::spawn(
                cue.explanation.reveal(&risk.explanation),
                self.origin,
                self.parent.child_token(),
            );
            self.elements.push((ElementId::Explanation(i), handle));
        }
        debug!(
            elements = self.elements.len(),
            animate = schedule.animate,
            "reveal set started"
        );
    }

    /// When the set started; schedule offsets are relative to this.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    pub fn get(&self, id: ElementId) -> Option<&RevealHandle> {
        self.elements
            .iter()
            .find(|(element, _)| *element == id)
            .map(|(_, handle)| handle)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// `true` once every element shows its full text.
    pub fn is_complete(&self) -> bool {
        self.elements.iter().all(|(_, h)| h.progress().complete)
    }

    /// Resolves once every element is complete or stopped.
    pub async fn settled(&self) {
        join_all(self.elements.iter().map(|(_, h)| h.settled())).await;
    }

    /// Cancel everything pending and start over for a new result.
    pub fn reset(&mut self, payload: &ResultPayload, schedule: &RevealSchedule) {
        self.cancel_all();
        let parent = CancellationToken::new();
        self._guard = parent.clone().drop_guard();
        self.parent = parent;
        self.origin = Instant::now();
        self.spawn_all(payload, schedule);
    }

    /// Cancel and drop every element.
    pub fn cancel_all(&mut self) {
        self.parent.cancel();
        self.elements.clear();
    }
}
