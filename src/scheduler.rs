//! Repeating-task scheduler.
//!
//! "Run this every N milliseconds", driven from the cooperative event loop.
//! The scheduler never sleeps and owns no timer: the loop calls
//! [`Scheduler::tick`] with the current monotonic time and the scheduler
//! notifies a [`SchedulerDelegate`] for each task that has come due.
//!
//! ```text
//!  event loop ──tick(now)──▶ Scheduler ──on_schedule_fired──▶ delegate
//! ```
//!
//! A task fires at most once per `tick`.  If the loop stalled past several
//! periods, the missed periods are skipped and the task realigns to
//! `now + interval` instead of firing a burst.

use heapless::Vec;
use log::{debug, info};

use crate::app::ports::SchedulerDelegate;
use crate::monitor::Millis;

/// Maximum number of concurrent tasks (stack-allocated).
const MAX_TASKS: usize = 4;

#[derive(Debug, Clone)]
struct RepeatingTask {
    label: &'static str,
    interval_ms: Millis,
    next_due_ms: Millis,
}

pub struct Scheduler {
    tasks: Vec<RepeatingTask, MAX_TASKS>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Register a task that first fires at `now_ms + interval_ms`.
    ///
    /// Returns `false` if the table is full, the label is taken, or the
    /// interval is zero.
    pub fn add_repeating(&mut self, label: &'static str, interval_ms: Millis, now_ms: Millis) -> bool {
        if interval_ms == 0 || self.tasks.iter().any(|t| t.label == label) {
            return false;
        }
        let task = RepeatingTask {
            label,
            interval_ms,
            next_due_ms: now_ms.saturating_add(interval_ms),
        };
        if self.tasks.push(task).is_err() {
            return false;
        }
        info!("Scheduler: added '{}' every {}ms", label, interval_ms);
        true
    }

    /// Fire every task that is due at `now_ms`.  Returns how many fired.
    pub fn tick(&mut self, now_ms: Millis, delegate: &mut dyn SchedulerDelegate) -> usize {
        let mut fired = 0;
        for task in &mut self.tasks {
            if now_ms < task.next_due_ms {
                continue;
            }

            let due_ms = task.next_due_ms;
            task.next_due_ms = due_ms.saturating_add(task.interval_ms);
            if task.next_due_ms <= now_ms {
                let missed = (now_ms - due_ms) / task.interval_ms;
                debug!("Scheduler: '{}' skipped {} period(s)", task.label, missed);
                task.next_due_ms = now_ms.saturating_add(task.interval_ms);
            }

            delegate.on_schedule_fired(task.label, due_ms);
            fired += 1;
        }
        fired
    }

    /// Earliest instant any task is due.
    pub fn next_due_ms(&self) -> Option<Millis> {
        self.tasks.iter().map(|t| t.next_due_ms).min()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
