//! Bilge Monitor Firmware — Main Entry Point
//!
//! Single-task cooperative event loop around the hexagonal core.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  GPIO ISR ─▶ EventQueue     LogEventSink    NvsConfigAdapter   │
//! │  BilgeSwitch (edges)        (EventSink)     (ConfigPort)       │
//! │  MonotonicClock             LogTelemetrySink (TelemetrySink)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              BilgeMonitor (pure logic)                 │    │
//! │  │  Debouncer · RunStateTracker · SnapshotPublisher       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{error, info, warn};

use bilgemon::adapters::log_sink::LogEventSink;
use bilgemon::adapters::log_telemetry::LogTelemetrySink;
use bilgemon::adapters::nvs::NvsConfigAdapter;
use bilgemon::adapters::time::MonotonicClock;
use bilgemon::app::ports::ConfigPort;
use bilgemon::app::service::BilgeMonitor;
use bilgemon::config::MonitorConfig;
use bilgemon::drivers::hw_init;
use bilgemon::drivers::watchdog::Watchdog;
use bilgemon::events::EVENT_QUEUE;
use bilgemon::pins;
use bilgemon::sensors::bilge_switch::BilgeSwitch;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Bilge Monitor v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!("Console at {} baud", pins::CONSOLE_BAUD);

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsConfigAdapter::new() {
        Ok(nvs) => nvs.load().unwrap_or_else(|e| {
            warn!("NVS config load failed ({}), using defaults", e);
            MonitorConfig::default()
        }),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            MonitorConfig::default()
        }
    };
    info!("Hostname: {}", config.hostname);

    // ── 3. Peripherals ────────────────────────────────────────
    let isr_ok = match hw_init::init_bilge_hw(config.input_gpio) {
        Ok(isr_ok) => isr_ok,
        Err(e) => {
            // Without the sense input there is nothing to monitor.  The
            // watchdog is not armed yet, so halt and wait for a power cycle.
            error!("Bilge input init failed: {}, halting", e);
            loop {
                FreeRtos::delay_ms(1_000);
            }
        }
    };
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);
    let clock = MonotonicClock::new();

    // ── 4. Core + adapters ────────────────────────────────────
    let mut monitor = BilgeMonitor::new(&config)?;
    let mut switch = BilgeSwitch::new(config.input_gpio, config.active_level);
    let gpio = switch.gpio();
    let mut events = LogEventSink::new();
    let mut telemetry = LogTelemetrySink::new();

    // Seed the debouncer with the level at boot; a pump already running
    // is counted once the window elapses.
    let now = clock.now_ms();
    if let Some(raw) = switch.on_edge(hw_init::gpio_read(gpio), now) {
        monitor.on_edge(raw, &mut events);
    }
    monitor.start(now, &mut events);
    monitor.publish_now(&mut telemetry, &mut events);

    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    let loop_interval_ms = u64::from(config.loop_interval_ms);

    loop {
        // Read before draining: an edge queued after this instant waits
        // for the next pass instead of racing the debounce poll.
        let now = clock.now_ms();

        let lost = switch.drain_queue(
            &EVENT_QUEUE,
            now,
            || hw_init::gpio_read(gpio),
            |raw| {
                monitor.on_edge(raw, &mut events);
            },
        );
        if lost > 0 {
            warn!("Event queue overflow: {} edge(s) dropped, line re-read", lost);
        }

        if !isr_ok {
            if let Some(raw) = switch.on_edge(hw_init::gpio_read(gpio), now) {
                monitor.on_edge(raw, &mut events);
            }
        }

        monitor.poll(now, &mut telemetry, &mut events);

        watchdog.feed();

        // Sleep until the next debounce deadline or publish tick, capped
        // by the loop interval so queued edges are drained promptly.
        let sleep_ms = monitor
            .next_wakeup_ms()
            .map_or(loop_interval_ms, |due| due.saturating_sub(clock.now_ms()))
            .clamp(1, loop_interval_ms);
        FreeRtos::delay_ms(sleep_ms as u32);
    }
}
