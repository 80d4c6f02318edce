//! Application service — the hexagonal core.
//!
//! [`BilgeMonitor`] owns the debouncer, the run-state tracker, the snapshot
//! publisher and the scheduler that paces it.  All I/O flows through port
//! traits passed in at call sites.
//!
//! ```text
//!  RawLevel ──▶ ┌──────────────────────────────────┐ ──▶ TelemetrySink
//!               │           BilgeMonitor           │
//!   now_ms  ──▶ │ Debouncer · Tracker · Publisher  │ ──▶ EventSink
//!               └──────────────────────────────────┘
//! ```
//!
//! Within one loop pass the caller feeds queued edges through
//! [`on_edge`](BilgeMonitor::on_edge) first and then calls
//! [`poll`](BilgeMonitor::poll); a snapshot published in that pass already
//! reflects any transition the pass produced.

use log::info;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::monitor::{DebouncedLevel, Debouncer, Millis, RawLevel, RunStateTracker, RunTransition};
use crate::scheduler::Scheduler;
use crate::telemetry::{PublishedSnapshot, SnapshotPublisher};

use super::events::AppEvent;
use super::ports::{EventSink, SchedulerDelegate, TelemetrySink};

/// Scheduler label of the periodic snapshot task.
pub const PUBLISH_TASK: &str = "snapshot";

// ───────────────────────────────────────────────────────────────
// BilgeMonitor
// ───────────────────────────────────────────────────────────────

pub struct BilgeMonitor {
    debouncer: Debouncer,
    tracker: RunStateTracker,
    publisher: SnapshotPublisher,
    scheduler: Scheduler,
    publish_interval_ms: Millis,
    started: bool,
}

impl BilgeMonitor {
    /// Validate `config` and build the pipeline.
    ///
    /// Does **not** schedule publishing; call [`start`](Self::start) next.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            debouncer: Debouncer::new(Millis::from(config.debounce_ms), false),
            tracker: RunStateTracker::new(),
            publisher: SnapshotPublisher::new(config.channels.clone()),
            scheduler: Scheduler::new(),
            publish_interval_ms: Millis::from(config.publish_interval_ms),
            started: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the publish schedule.  The first snapshot goes out one period
    /// after `now_ms`.  Calling twice is a no-op.
    pub fn start(&mut self, now_ms: Millis, events: &mut impl EventSink) {
        if self.started {
            return;
        }
        self.scheduler
            .add_repeating(PUBLISH_TASK, self.publish_interval_ms, now_ms);
        self.started = true;
        events.emit(&AppEvent::Started {
            debounce_ms: self.debouncer.window_ms(),
            publish_interval_ms: self.publish_interval_ms,
        });
        info!(
            "BilgeMonitor started (debounce={}ms, publish every {}ms)",
            self.debouncer.window_ms(),
            self.publish_interval_ms
        );
    }

    // ── Event handling ────────────────────────────────────────

    /// Feed one raw edge from the sense input.
    pub fn on_edge(&mut self, raw: RawLevel, events: &mut impl EventSink) -> Option<RunTransition> {
        let level = self.debouncer.observe(raw)?;
        self.apply(level, events)
    }

    /// Advance time: accept a debounced level whose window has elapsed,
    /// then run any due publish tick.
    pub fn poll(
        &mut self,
        now_ms: Millis,
        telemetry: &mut impl TelemetrySink,
        events: &mut impl EventSink,
    ) -> Option<RunTransition> {
        let transition = self
            .debouncer
            .poll(now_ms)
            .and_then(|level| self.apply(level, events));

        let mut delegate = PublishDelegate {
            tracker: &self.tracker,
            publisher: &mut self.publisher,
            telemetry,
            events,
        };
        self.scheduler.tick(now_ms, &mut delegate);

        transition
    }

    /// Publish a snapshot immediately, outside the schedule.  Used at boot
    /// so the server sees the monitor before the first periodic tick.
    pub fn publish_now(
        &mut self,
        telemetry: &mut impl TelemetrySink,
        events: &mut impl EventSink,
    ) -> PublishedSnapshot {
        let (snapshot, rejected) = self.publisher.publish(&self.tracker, telemetry);
        events.emit(&AppEvent::SnapshotPublished { snapshot, rejected });
        snapshot
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn tracker(&self) -> &RunStateTracker {
        &self.tracker
    }

    /// Earliest instant [`poll`](Self::poll) has work to do.  The event
    /// loop may sleep until then unless an edge arrives first.
    pub fn next_wakeup_ms(&self) -> Option<Millis> {
        match (self.debouncer.next_deadline(), self.scheduler.next_due_ms()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Publish ticks handled since boot.
    pub fn publish_count(&self) -> u64 {
        self.publisher.published_count()
    }

    /// Channel writes the sink refused since boot.
    pub fn rejected_count(&self) -> u64 {
        self.publisher.rejected_count()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply(&mut self, level: DebouncedLevel, events: &mut impl EventSink) -> Option<RunTransition> {
        let transition = self.tracker.handle(level)?;
        let event = match transition {
            RunTransition::Started { run_count, at_ms } => AppEvent::PumpStarted { run_count, at_ms },
            RunTransition::Stopped { duration_secs, at_ms } => {
                AppEvent::PumpStopped { duration_secs, at_ms }
            }
            RunTransition::StoppedUnmatched { at_ms } => AppEvent::StopWithoutStart { at_ms },
        };
        events.emit(&event);
        Some(transition)
    }
}

// ── Scheduler delegate ────────────────────────────────────────
//
// Borrows the tracker and publisher disjointly from the scheduler so the
// publish tick runs inside `Scheduler::tick` without a second owner.

struct PublishDelegate<'a, T, E> {
    tracker: &'a RunStateTracker,
    publisher: &'a mut SnapshotPublisher,
    telemetry: &'a mut T,
    events: &'a mut E,
}

impl<T: TelemetrySink, E: EventSink> SchedulerDelegate for PublishDelegate<'_, T, E> {
    fn on_schedule_fired(&mut self, label: &str, _due_ms: Millis) {
        if label != PUBLISH_TASK {
            return;
        }
        let (snapshot, rejected) = self.publisher.publish(self.tracker, self.telemetry);
        self.events
            .emit(&AppEvent::SnapshotPublished { snapshot, rejected });
    }
}
