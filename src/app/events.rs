//! Outbound application events.
//!
//! [`BilgeMonitor`](super::service::BilgeMonitor) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  They are observability
//! only; nothing downstream feeds back into the run state.

use crate::monitor::Millis;
use crate::telemetry::PublishedSnapshot;

/// Structured events emitted by the monitor core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The monitor has started (carries debounce window and publish period).
    Started { debounce_ms: Millis, publish_interval_ms: Millis },

    /// Idle → Running.
    PumpStarted { run_count: u32, at_ms: Millis },

    /// Running → Idle with a measured duration.
    PumpStopped { duration_secs: f32, at_ms: Millis },

    /// Running → Idle without a recorded start; duration not updated.
    StopWithoutStart { at_ms: Millis },

    /// A snapshot went out on a publish tick.
    SnapshotPublished { snapshot: PublishedSnapshot, rejected: u8 },
}
