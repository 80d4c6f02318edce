//! Log-backed telemetry sink.
//!
//! Stands in for the upstream telemetry server: each value is written to
//! the log with its path and units.  While marked disconnected it refuses
//! writes with [`TelemetryError::NotConnected`], which is what a network
//! sink does before its first connection.

use log::info;

use crate::app::ports::{TelemetryError, TelemetrySink};
use crate::config::ChannelConfig;
use crate::telemetry::TelemetryValue;

pub struct LogTelemetrySink {
    connected: bool,
    written: u64,
}

impl Default for LogTelemetrySink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogTelemetrySink {
    /// A connected sink.
    pub fn new() -> Self {
        Self {
            connected: true,
            written: 0,
        }
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Values accepted since boot.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl TelemetrySink for LogTelemetrySink {
    fn publish(&mut self, channel: &ChannelConfig, value: TelemetryValue) -> Result<(), TelemetryError> {
        if !self.connected {
            return Err(TelemetryError::NotConnected);
        }
        if channel.units.is_empty() {
            info!("SK | {} = {}", channel.path, value);
        } else {
            info!("SK | {} = {} {}", channel.path, value, channel.units);
        }
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelSet;

    #[test]
    fn refuses_while_disconnected() {
        let ch = ChannelSet::default();
        let mut sink = LogTelemetrySink::new();
        sink.set_connected(false);
        assert_eq!(
            sink.publish(&ch.run_count, TelemetryValue::Count(1)),
            Err(TelemetryError::NotConnected)
        );
        assert_eq!(sink.written(), 0);

        sink.set_connected(true);
        assert!(sink.publish(&ch.run_count, TelemetryValue::Count(1)).is_ok());
        assert_eq!(sink.written(), 1);
    }
}
