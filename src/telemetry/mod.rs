//! Published telemetry values.
//!
//! Three independent channels leave the device on every publish tick:
//!
//! | Channel             | Value              | Units   |
//! |---------------------|--------------------|---------|
//! | pump state          | `bool`             | —       |
//! | run count           | `u32`              | count   |
//! | last run duration   | `f32`              | seconds |

pub mod publisher;

pub use publisher::SnapshotPublisher;

use serde::Serialize;

use crate::monitor::RunStateTracker;

/// Which of the three output channels a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelId {
    PumpState,
    RunCount,
    LastRunDuration,
}

impl ChannelId {
    pub const ALL: [Self; 3] = [Self::PumpState, Self::RunCount, Self::LastRunDuration];
}

/// A single typed value handed to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Bool(bool),
    Count(u32),
    Seconds(f32),
}

impl core::fmt::Display for TelemetryValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Count(v) => write!(f, "{}", v),
            Self::Seconds(v) => write!(f, "{:.2}", v),
        }
    }
}

/// Full current state as sent on one publish tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PublishedSnapshot {
    pub running: bool,
    pub run_count: u32,
    pub last_run_duration_secs: f32,
}

impl PublishedSnapshot {
    /// Read the three values from the tracker.
    pub fn capture(tracker: &RunStateTracker) -> Self {
        Self {
            running: tracker.is_running(),
            run_count: tracker.run_count(),
            last_run_duration_secs: tracker.last_run_duration_secs(),
        }
    }

    /// The value destined for `channel`.
    pub fn value(&self, channel: ChannelId) -> TelemetryValue {
        match channel {
            ChannelId::PumpState => TelemetryValue::Bool(self.running),
            ChannelId::RunCount => TelemetryValue::Count(self.run_count),
            ChannelId::LastRunDuration => TelemetryValue::Seconds(self.last_run_duration_secs),
        }
    }
}
