//! Integration tests: config load paths → BilgeMonitor.

use bilgemon::adapters::nvs::NvsConfigAdapter;
use bilgemon::app::ports::{ConfigError, ConfigPort};
use bilgemon::app::service::BilgeMonitor;
use bilgemon::config::{ActiveLevel, ChannelConfig, MonitorConfig};
use bilgemon::monitor::RawLevel;
use bilgemon::telemetry::TelemetryValue;

use crate::mock_sinks::{MockTelemetry, RecordingEvents};

#[test]
fn json_document_round_trips_through_from_json() {
    let mut cfg = MonitorConfig::default();
    cfg.hostname = "aft_bilge".into();
    cfg.active_level = ActiveLevel::Low;
    cfg.debounce_ms = 100;

    let json = serde_json::to_string(&cfg).unwrap();
    let parsed = MonitorConfig::from_json(&json).unwrap();
    assert_eq!(parsed, cfg);
}

#[test]
fn malformed_json_is_corrupted() {
    assert!(matches!(
        MonitorConfig::from_json("{\"hostname\": 42"),
        Err(ConfigError::Corrupted)
    ));
}

#[test]
fn incomplete_json_is_corrupted() {
    assert!(matches!(
        MonitorConfig::from_json("{\"hostname\": \"x\"}"),
        Err(ConfigError::Corrupted)
    ));
}

#[test]
fn out_of_range_json_fails_validation() {
    let mut cfg = MonitorConfig::default();
    cfg.debounce_ms = 60_000;
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(matches!(
        MonitorConfig::from_json(&json),
        Err(ConfigError::ValidationFailed(_))
    ));
}

#[test]
fn config_saved_to_nvs_drives_the_monitor() {
    let nvs = NvsConfigAdapter::new().unwrap();
    let mut cfg = MonitorConfig::default();
    cfg.debounce_ms = 50;
    cfg.publish_interval_ms = 500;
    cfg.channels.run_count = ChannelConfig::new(
        "environment.bilge.aft.runCount",
        "/Environment/Bilge/Aft/RunCount",
        "count",
        "Aft bilge pump run count",
    );
    nvs.save(&cfg).unwrap();

    let loaded = nvs.load().unwrap();
    let mut monitor = BilgeMonitor::new(&loaded).unwrap();
    let mut sink = MockTelemetry::new();
    let mut events = RecordingEvents::new();

    monitor.start(0, &mut events);
    monitor.on_edge(RawLevel::new(true, 0), &mut events);
    monitor.poll(500, &mut sink, &mut events);

    // 50 ms window accepted the run well before the first 500 ms tick.
    assert_eq!(
        sink.last_for("environment.bilge.aft.runCount"),
        Some(TelemetryValue::Count(1))
    );
    assert!(sink.values_for("environment.bilge.main.runCount").is_empty());
}

#[test]
fn corrupted_nvs_blob_is_reported_not_defaulted() {
    let nvs = NvsConfigAdapter::new().unwrap();
    nvs.put_raw(&[0xFF, 0x00, 0x13]);
    assert!(matches!(nvs.load(), Err(ConfigError::Corrupted)));
}
