//! Mock sink adapters for integration tests.
//!
//! Records every telemetry write and domain event so tests can assert on
//! the full history without a network or a logger.

use bilgemon::app::events::AppEvent;
use bilgemon::app::ports::{EventSink, TelemetryError, TelemetrySink};
use bilgemon::config::ChannelConfig;
use bilgemon::telemetry::TelemetryValue;

// ── Telemetry write record ────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Write {
    pub path: String,
    pub value: TelemetryValue,
}

// ── MockTelemetry ─────────────────────────────────────────────

pub struct MockTelemetry {
    pub writes: Vec<Write>,
    /// While set, every write is refused.
    pub offline: bool,
}

#[allow(dead_code)]
impl MockTelemetry {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            offline: false,
        }
    }

    /// Values written to `path`, oldest first.
    pub fn values_for(&self, path: &str) -> Vec<TelemetryValue> {
        self.writes
            .iter()
            .filter(|w| w.path == path)
            .map(|w| w.value)
            .collect()
    }

    pub fn last_for(&self, path: &str) -> Option<TelemetryValue> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.path == path)
            .map(|w| w.value)
    }
}

impl Default for MockTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySink for MockTelemetry {
    fn publish(&mut self, channel: &ChannelConfig, value: TelemetryValue) -> Result<(), TelemetryError> {
        if self.offline {
            return Err(TelemetryError::NotConnected);
        }
        self.writes.push(Write {
            path: channel.path.clone(),
            value,
        });
        Ok(())
    }
}

// ── RecordingEvents ───────────────────────────────────────────

pub struct RecordingEvents {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingEvents {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn starts(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::PumpStarted { .. }))
            .count()
    }

    pub fn stops(&self) -> Vec<f32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PumpStopped { duration_secs, .. } => Some(*duration_secs),
                _ => None,
            })
            .collect()
    }

    pub fn publishes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::SnapshotPublished { .. }))
            .count()
    }
}

impl Default for RecordingEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingEvents {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
