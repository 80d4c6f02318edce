//! Port traits — the hexagonal boundary between the monitor core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BilgeMonitor (domain)
//! ```
//!
//! Driven adapters (telemetry sinks, event sinks, config storage) implement
//! these traits.  [`BilgeMonitor`](super::service::BilgeMonitor) consumes
//! them via generics, so the core never touches hardware or the network.

use crate::config::{ChannelConfig, MonitorConfig};
use crate::monitor::Millis;
use crate::telemetry::TelemetryValue;

// ───────────────────────────────────────────────────────────────
// Telemetry sink port (driven adapter: domain → upstream server)
// ───────────────────────────────────────────────────────────────

/// Receives one value per channel on every publish tick.
///
/// Writes are fire-and-forget from the caller's side: an error is counted
/// and dropped, never retried or queued.  Whatever buffering or reconnect
/// logic the transport needs belongs to the implementation.
pub trait TelemetrySink {
    fn publish(&mut self, channel: &ChannelConfig, value: TelemetryValue)
        -> Result<(), TelemetryError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the monitor configuration.
///
/// Implementations MUST validate before persisting; out-of-range values
/// are rejected with [`ConfigError::ValidationFailed`], not clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`MonitorConfig::default()`] if nothing
    /// is stored yet.
    fn load(&self) -> Result<MonitorConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from what a tick does)
// ───────────────────────────────────────────────────────────────

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes when a
/// repeating task comes due.
pub trait SchedulerDelegate {
    /// * `label`: the label the task was registered with.
    /// * `due_ms`: the instant the task was due (not the poll instant).
    fn on_schedule_fired(&mut self, label: &str, due_ms: Millis);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations and config parsing.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored or supplied config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors a [`TelemetrySink`] may report for a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryError {
    /// Upstream connection not established yet.
    NotConnected,
    /// The sink refused the value.
    Rejected(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "sink not connected"),
            Self::Rejected(why) => write!(f, "rejected: {}", why),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for TelemetryError {}
