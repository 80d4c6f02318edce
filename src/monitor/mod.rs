//! Event-to-state pipeline: debounce and run tracking.
//!
//! ```text
//!  RawLevel ──▶ Debouncer ──▶ DebouncedLevel ──▶ RunStateTracker
//! ```
//!
//! Both stages are pure: they take timestamps as arguments and never read
//! a clock, sleep, or touch hardware.

pub mod debounce;
pub mod tracker;

pub use debounce::Debouncer;
pub use tracker::{PumpState, RunState, RunStateTracker, RunTransition};

/// Milliseconds on the monotonic clock since boot.
pub type Millis = u64;

/// Logical sense-line level captured at an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLevel {
    /// `true` = pump energised.
    pub active: bool,
    pub at_ms: Millis,
}

impl RawLevel {
    pub const fn new(active: bool, at_ms: Millis) -> Self {
        Self { active, at_ms }
    }
}

/// A level that held for the full debounce window.
///
/// `at_ms` is the instant the window was satisfied, not the instant the
/// debouncer happened to be polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncedLevel {
    pub active: bool,
    pub at_ms: Millis,
}

impl DebouncedLevel {
    pub const fn new(active: bool, at_ms: Millis) -> Self {
        Self { active, at_ms }
    }
}
