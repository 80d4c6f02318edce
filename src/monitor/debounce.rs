//! Quiet-window debouncer for the pump sense line.
//!
//! A new level is accepted only after it has held, uninterrupted, for the
//! configured window.  Contact bounce shorter than the window never reaches
//! the run tracker.
//!
//! | Input                          | Effect                                 |
//! |--------------------------------|----------------------------------------|
//! | level == stable, no candidate  | ignored                                |
//! | level != stable, no candidate  | candidate starts at `raw.at_ms`        |
//! | level == candidate             | ignored (interval stays contiguous)    |
//! | level == stable, candidate set | candidate cancelled (bounced back)     |
//!
//! The window is checked by comparing timestamps in [`Debouncer::poll`];
//! nothing here blocks.

use super::{DebouncedLevel, Millis, RawLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    level: bool,
    since_ms: Millis,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: Millis,
    /// Last level emitted (or the initial level).
    stable: bool,
    /// Level waiting out the window.  Always differs from `stable`.
    candidate: Option<Candidate>,
}

impl Debouncer {
    /// `initial` is the level assumed before any edge is seen.
    pub fn new(window_ms: Millis, initial: bool) -> Self {
        Self {
            window_ms,
            stable: initial,
            candidate: None,
        }
    }

    pub fn window_ms(&self) -> Millis {
        self.window_ms
    }

    /// Last accepted level.
    pub fn stable(&self) -> bool {
        self.stable
    }

    /// A changed level is waiting out the window.
    pub fn is_settling(&self) -> bool {
        self.candidate.is_some()
    }

    /// When the pending candidate will be accepted if nothing else arrives.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.candidate
            .map(|c| c.since_ms.saturating_add(self.window_ms))
    }

    /// Feed one raw edge.
    ///
    /// If the pending candidate had already satisfied the window before this
    /// edge arrived, it is accepted first and returned; the new edge is then
    /// applied on top.
    pub fn observe(&mut self, raw: RawLevel) -> Option<DebouncedLevel> {
        let matured = self.poll(raw.at_ms);

        match self.candidate {
            Some(c) if c.level == raw.active => {}
            Some(_) => {
                // Only two levels exist, so the opposite of the candidate is
                // the stable level: the line bounced back.
                self.candidate = None;
            }
            None if raw.active != self.stable => {
                self.candidate = Some(Candidate {
                    level: raw.active,
                    since_ms: raw.at_ms,
                });
            }
            None => {}
        }

        matured
    }

    /// Accept the candidate if it has held for the full window by `now_ms`.
    pub fn poll(&mut self, now_ms: Millis) -> Option<DebouncedLevel> {
        let c = self.candidate?;
        if now_ms.saturating_sub(c.since_ms) < self.window_ms {
            return None;
        }
        self.candidate = None;
        self.stable = c.level;
        Some(DebouncedLevel::new(
            c.level,
            c.since_ms.saturating_add(self.window_ms),
        ))
    }
}
