//! Integration tests: edge source → BilgeMonitor → sinks.

use bilgemon::app::events::AppEvent;
use bilgemon::app::service::BilgeMonitor;
use bilgemon::config::{ActiveLevel, MonitorConfig};
use bilgemon::events::{Event, EventQueue};
use bilgemon::monitor::Millis;
use bilgemon::sensors::bilge_switch::BilgeSwitch;
use bilgemon::telemetry::TelemetryValue;

use crate::mock_sinks::{MockTelemetry, RecordingEvents};

const STATE: &str = "environment.bilge.main.state";
const COUNT: &str = "environment.bilge.main.runCount";
const DURATION: &str = "environment.bilge.main.lastRunDuration";

struct Rig {
    monitor: BilgeMonitor,
    switch: BilgeSwitch,
    sink: MockTelemetry,
    events: RecordingEvents,
}

impl Rig {
    fn new(config: &MonitorConfig) -> Self {
        let mut rig = Self {
            monitor: BilgeMonitor::new(config).unwrap(),
            switch: BilgeSwitch::new(config.input_gpio, config.active_level),
            sink: MockTelemetry::new(),
            events: RecordingEvents::new(),
        };
        rig.monitor.start(0, &mut rig.events);
        rig
    }

    /// One main-loop pass: queued edges first, then time.
    fn pass(&mut self, edges: &[(bool, Millis)], now_ms: Millis) {
        for &(pin_high, at_ms) in edges {
            if let Some(raw) = self.switch.on_edge(pin_high, at_ms) {
                self.monitor.on_edge(raw, &mut self.events);
            }
        }
        self.monitor.poll(now_ms, &mut self.sink, &mut self.events);
    }

    /// Poll every 10 ms up to and including `until_ms`.
    fn run_until(&mut self, from_ms: Millis, until_ms: Millis) {
        let mut t = from_ms;
        while t <= until_ms {
            self.pass(&[], t);
            t += 10;
        }
    }
}

#[test]
fn one_bouncy_run_is_counted_once_and_timed() {
    let mut rig = Rig::new(&MonitorConfig::default());
    rig.run_until(0, 1_990);

    // Float switch closes with chatter, then opens with chatter.
    rig.pass(&[(true, 2_000), (false, 2_005), (true, 2_020)], 2_020);
    rig.run_until(2_030, 9_000);
    rig.pass(&[(false, 9_000), (true, 9_030), (false, 9_060)], 9_060);
    rig.run_until(9_070, 10_000);

    // Ticks stay on the 1000 ms grid set at start.
    assert_eq!(rig.events.publishes(), 10);
    assert_eq!(rig.events.starts(), 1);
    let stops = rig.events.stops();
    assert_eq!(stops.len(), 1);
    // Accepted at 2270 and 9310: 7.04 s.
    assert!((stops[0] - 7.04).abs() < 1e-3, "got {}", stops[0]);

    assert_eq!(rig.sink.last_for(COUNT), Some(TelemetryValue::Count(1)));
    assert_eq!(rig.sink.last_for(STATE), Some(TelemetryValue::Bool(false)));
}

#[test]
fn publishes_every_interval_with_unchanged_values() {
    let mut rig = Rig::new(&MonitorConfig::default());
    rig.run_until(0, 5_000);

    // Ticks at 1000..=5000, three channels each.
    assert_eq!(rig.events.publishes(), 5);
    assert_eq!(rig.monitor.publish_count(), 5);
    assert_eq!(rig.sink.values_for(STATE), vec![TelemetryValue::Bool(false); 5]);
    assert_eq!(rig.sink.values_for(COUNT), vec![TelemetryValue::Count(0); 5]);
    assert_eq!(rig.sink.values_for(DURATION), vec![TelemetryValue::Seconds(0.0); 5]);
}

#[test]
fn running_flag_is_published_mid_run() {
    let mut rig = Rig::new(&MonitorConfig::default());
    rig.pass(&[(true, 100)], 100);
    rig.run_until(110, 3_000);

    assert_eq!(
        rig.sink.values_for(STATE),
        vec![TelemetryValue::Bool(true); 3]
    );
    assert!(rig.monitor.tracker().is_running());
}

#[test]
fn offline_sink_drops_values_without_stopping_the_tracker() {
    let mut rig = Rig::new(&MonitorConfig::default());
    rig.sink.offline = true;

    rig.pass(&[(true, 100)], 100);
    rig.run_until(110, 2_000);
    rig.pass(&[(false, 2_000)], 2_000);
    rig.run_until(2_010, 3_000);

    assert!(rig.sink.writes.is_empty());
    assert_eq!(rig.monitor.rejected_count(), 9);
    assert_eq!(rig.monitor.tracker().run_count(), 1);

    // Back online: the next tick carries the current values, no backlog.
    rig.sink.offline = false;
    rig.run_until(3_010, 4_000);
    assert_eq!(rig.sink.writes.len(), 3);
    assert_eq!(rig.sink.last_for(COUNT), Some(TelemetryValue::Count(1)));
    assert_eq!(
        rig.sink.last_for(DURATION),
        Some(TelemetryValue::Seconds(1.9))
    );

    let rejected: Vec<u8> = rig
        .events
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::SnapshotPublished { rejected, .. } => Some(*rejected),
            _ => None,
        })
        .collect();
    assert_eq!(rejected, vec![3, 3, 3, 0]);
}

#[test]
fn active_low_wiring_inverts_the_sense_line() {
    let cfg = MonitorConfig {
        active_level: ActiveLevel::Low,
        ..MonitorConfig::default()
    };
    let mut rig = Rig::new(&cfg);

    // Idle line sits high against the pull-up; closing pulls it low.
    rig.pass(&[(true, 0)], 0);
    rig.pass(&[(false, 500)], 500);
    rig.run_until(510, 1_500);
    rig.pass(&[(true, 1_500)], 1_500);
    rig.run_until(1_510, 2_000);

    assert_eq!(rig.events.starts(), 1);
    assert_eq!(rig.events.stops(), vec![1.0]);
}

#[test]
fn queued_isr_edges_drain_in_order() {
    let queue = EventQueue::new();
    for &(pin_high, at_ms) in &[(true, 100), (false, 120), (true, 140)] {
        assert!(queue.push(Event::BilgeEdge { pin_high, at_ms }));
    }

    let mut rig = Rig::new(&MonitorConfig::default());
    let Rig { monitor, switch, events, .. } = &mut rig;
    let lost = switch.drain_queue(&queue, 140, || panic!("no overflow"), |raw| {
        monitor.on_edge(raw, events);
    });
    assert_eq!(lost, 0);
    assert!(queue.is_empty());

    rig.pass(&[], 140);
    assert_eq!(rig.monitor.next_wakeup_ms(), Some(390));
    rig.run_until(150, 400);

    assert_eq!(rig.events.starts(), 1);
    assert!(rig.events.events.contains(&AppEvent::PumpStarted {
        run_count: 1,
        at_ms: 390
    }));
}

#[test]
fn overflow_on_the_final_edge_still_ends_the_run() {
    let mut rig = Rig::new(&MonitorConfig::default());
    rig.pass(&[(true, 500)], 500);
    rig.run_until(510, 5_000);
    assert!(rig.monitor.tracker().is_running());

    // Stop chatter: 32 edges into a 31-slot queue, the final low edge lost.
    let queue = EventQueue::new();
    for i in 0..32u64 {
        let _ = queue.push(Event::BilgeEdge { pin_high: i % 2 == 0, at_ms: 5_000 + 2 * i });
    }
    assert_eq!(queue.dropped_count(), 1);

    // The line now reads low: pump off.
    let Rig { monitor, switch, events, .. } = &mut rig;
    let lost = switch.drain_queue(&queue, 5_070, || false, |raw| {
        monitor.on_edge(raw, events);
    });
    assert_eq!(lost, 1);

    rig.run_until(5_070, 60_000);

    assert!(!rig.monitor.tracker().is_running());
    assert_eq!(rig.sink.last_for(STATE), Some(TelemetryValue::Bool(false)));
    // Accepted at 750 and 5320.
    let stops = rig.events.stops();
    assert_eq!(stops.len(), 1);
    assert!((stops[0] - 4.57).abs() < 1e-3, "got {}", stops[0]);
}
