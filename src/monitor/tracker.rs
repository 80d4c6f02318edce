//! Run-state tracker: debounced levels in, pump runs out.
//!
//! ```text
//!            DebouncedLevel(true)
//!   ┌──────┐ ──────────────────▶ ┌─────────┐
//!   │ Idle │                     │ Running │
//!   └──────┘ ◀────────────────── └─────────┘
//!            DebouncedLevel(false)
//! ```
//!
//! Entering `Running` bumps the run count and records the start time.
//! Leaving it computes the run duration, but only if a start was actually
//! recorded for this run.  Levels that repeat the current state are no-ops.

use super::{DebouncedLevel, Millis};

/// Pump run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Idle,
    Running,
}

/// Everything the tracker knows about the pump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunState {
    pub state: PumpState,
    /// Completed + in-progress runs since boot.
    pub run_count: u32,
    /// Start of the current run; `None` while idle.
    pub run_start_ms: Option<Millis>,
    /// Duration of the most recently finished run (seconds).
    pub last_run_duration_secs: f32,
}

impl RunState {
    /// Boot state: idle, nothing counted yet.
    pub const fn new() -> Self {
        Self {
            state: PumpState::Idle,
            run_count: 0,
            run_start_ms: None,
            last_run_duration_secs: 0.0,
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a handled level did to the run state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunTransition {
    /// Idle → Running.
    Started { run_count: u32, at_ms: Millis },
    /// Running → Idle with a recorded start.
    Stopped { duration_secs: f32, at_ms: Millis },
    /// Running → Idle with no recorded start; duration left untouched.
    StoppedUnmatched { at_ms: Millis },
}

#[derive(Debug, Clone, Default)]
pub struct RunStateTracker {
    state: RunState,
}

impl RunStateTracker {
    pub fn new() -> Self {
        Self {
            state: RunState::new(),
        }
    }

    /// Resume from an explicit state.
    pub fn from_state(state: RunState) -> Self {
        Self { state }
    }

    /// Apply one debounced level.  Returns `None` when the level repeats
    /// the current state.
    pub fn handle(&mut self, level: DebouncedLevel) -> Option<RunTransition> {
        match (self.state.state, level.active) {
            (PumpState::Idle, true) => {
                self.state.state = PumpState::Running;
                self.state.run_count = self.state.run_count.saturating_add(1);
                self.state.run_start_ms = Some(level.at_ms);
                Some(RunTransition::Started {
                    run_count: self.state.run_count,
                    at_ms: level.at_ms,
                })
            }
            (PumpState::Running, false) => {
                self.state.state = PumpState::Idle;
                match self.state.run_start_ms.take() {
                    Some(start) => {
                        let elapsed_ms = level.at_ms.saturating_sub(start);
                        let duration_secs = (elapsed_ms as f64 / 1000.0) as f32;
                        self.state.last_run_duration_secs = duration_secs;
                        Some(RunTransition::Stopped {
                            duration_secs,
                            at_ms: level.at_ms,
                        })
                    }
                    None => Some(RunTransition::StoppedUnmatched { at_ms: level.at_ms }),
                }
            }
            // Already there.  The start timer is deliberately not re-armed.
            (PumpState::Running, true) | (PumpState::Idle, false) => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.state == PumpState::Running
    }

    pub fn run_count(&self) -> u32 {
        self.state.run_count
    }

    pub fn last_run_duration_secs(&self) -> f32 {
        self.state.last_run_duration_secs
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }
}
