//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing monitor events to the logger (UART
//! in production).  Transitions log at info; the once-a-second snapshot
//! logs at debug so it does not drown the console.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { debounce_ms, publish_interval_ms } => {
                info!(
                    "START | debounce={}ms publish={}ms",
                    debounce_ms, publish_interval_ms
                );
            }
            AppEvent::PumpStarted { run_count, at_ms } => {
                info!("Bilge pump started. (run #{} at {}ms)", run_count, at_ms);
            }
            AppEvent::PumpStopped { duration_secs, at_ms } => {
                info!("Bilge pump stopped. (at {}ms)", at_ms);
                info!("Last run duration (s): {:.2}", duration_secs);
            }
            AppEvent::StopWithoutStart { at_ms } => {
                warn!("Bilge pump stop at {}ms with no recorded start; duration unchanged", at_ms);
            }
            AppEvent::SnapshotPublished { snapshot, rejected } => {
                debug!(
                    "TELEM | running={} count={} last={:.2}s | rejected={}",
                    snapshot.running,
                    snapshot.run_count,
                    snapshot.last_run_duration_secs,
                    rejected,
                );
            }
        }
    }
}
