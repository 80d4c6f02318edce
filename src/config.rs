//! Monitor configuration.
//!
//! Every tunable of the bilge monitor lives in [`MonitorConfig`].  Values
//! are supplied at startup (NVS blob or operator JSON) and are immutable
//! for the lifetime of the process.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins;

/// Which electrical level on the sense input means "pump running".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveLevel {
    /// Pin HIGH = running (optical isolator output, the default wiring).
    High,
    /// Pin LOW = running (dry contact closing the line to ground against the pull-up).
    Low,
}

impl ActiveLevel {
    /// Map an electrical pin level to the logical running level.
    pub const fn is_active(self, pin_high: bool) -> bool {
        match self {
            Self::High => pin_high,
            Self::Low => !pin_high,
        }
    }
}

/// Identity and metadata for one published telemetry value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Stable identifier the sink publishes under.
    pub path: String,
    /// Path under which the sink exposes this channel's own settings.
    pub config_path: String,
    /// Unit string; empty for dimensionless values.
    pub units: String,
    /// Human-readable description.
    pub description: String,
}

impl ChannelConfig {
    pub fn new(path: &str, config_path: &str, units: &str, description: &str) -> Self {
        Self {
            path: path.into(),
            config_path: config_path.into(),
            units: units.into(),
            description: description.into(),
        }
    }
}

/// The three output channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSet {
    pub pump_state: ChannelConfig,
    pub run_count: ChannelConfig,
    pub last_run_duration: ChannelConfig,
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self {
            pump_state: ChannelConfig::new(
                "environment.bilge.main.state",
                "/Environment/Bilge/Main/State",
                "",
                "Bilge pump run state",
            ),
            run_count: ChannelConfig::new(
                "environment.bilge.main.runCount",
                "/Environment/Bilge/Main/RunCount",
                "count",
                "Bilge pump run count",
            ),
            last_run_duration: ChannelConfig::new(
                "environment.bilge.main.lastRunDuration",
                "/Environment/Bilge/Main/LastRunDuration",
                "s",
                "Last bilge pump run duration",
            ),
        }
    }
}

impl ChannelSet {
    fn iter(&self) -> impl Iterator<Item = &ChannelConfig> {
        [&self.pump_state, &self.run_count, &self.last_run_duration].into_iter()
    }
}

/// Core monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    // --- Identity ---
    /// Network hostname of the device.
    pub hostname: String,

    // --- Input ---
    /// GPIO of the pump sense line.
    pub input_gpio: i32,
    /// Electrical level that means "running".
    pub active_level: ActiveLevel,

    // --- Timing ---
    /// Quiet window a new level must hold before it counts (milliseconds).
    pub debounce_ms: u32,
    /// Snapshot publish period (milliseconds).
    pub publish_interval_ms: u32,
    /// Longest the event loop sleeps between passes (milliseconds).
    pub loop_interval_ms: u32,
    /// Task watchdog timeout (milliseconds).
    pub watchdog_timeout_ms: u32,

    // --- Outputs ---
    pub channels: ChannelSet,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            hostname: "nootka_bilgetank_mon".into(),

            input_gpio: pins::BILGE_INPUT_GPIO,
            active_level: ActiveLevel::High,

            debounce_ms: 250,
            publish_interval_ms: 1000, // 1 Hz
            loop_interval_ms: 10,
            watchdog_timeout_ms: 10_000,

            channels: ChannelSet::default(),
        }
    }
}

impl MonitorConfig {
    /// Parse an operator-supplied JSON document and validate it.
    ///
    /// Missing fields are an error; the document must be complete.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| {
            log::warn!("config: JSON rejected ({})", e);
            ConfigError::Corrupted
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hostname.is_empty() || self.hostname.len() > 32 {
            return Err(ConfigError::ValidationFailed("hostname must be 1–32 bytes"));
        }
        if !(0..=pins::MAX_GPIO).contains(&self.input_gpio) {
            return Err(ConfigError::ValidationFailed("input_gpio must be 0–48"));
        }
        if self.debounce_ms > 10_000 {
            return Err(ConfigError::ValidationFailed("debounce_ms must be 0–10000"));
        }
        if !(100..=60_000).contains(&self.publish_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "publish_interval_ms must be 100–60000",
            ));
        }
        if !(1..=1000).contains(&self.loop_interval_ms) {
            return Err(ConfigError::ValidationFailed("loop_interval_ms must be 1–1000"));
        }
        if self.watchdog_timeout_ms <= self.loop_interval_ms
            || self.watchdog_timeout_ms <= self.publish_interval_ms
        {
            return Err(ConfigError::ValidationFailed(
                "watchdog_timeout_ms must exceed loop and publish intervals",
            ));
        }

        for ch in self.channels.iter() {
            if ch.path.is_empty() || ch.config_path.is_empty() {
                return Err(ConfigError::ValidationFailed("channel paths must not be empty"));
            }
        }
        let c = &self.channels;
        if c.pump_state.path == c.run_count.path
            || c.pump_state.path == c.last_run_duration.path
            || c.run_count.path == c.last_run_duration.path
        {
            return Err(ConfigError::ValidationFailed("channel paths must be distinct"));
        }
        Ok(())
    }
}
