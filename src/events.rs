//! Interrupt-driven event queue.
//!
//! The GPIO ISR captures the sense-line level and a timestamp and pushes an
//! [`Event`]; the main loop drains the queue in FIFO order, so edges reach
//! the debouncer in the order the hardware saw them.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ GPIO ISR    │────▶│  Event Queue │────▶│  Main Loop   │
//! │ (producer)  │     │  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};

use crate::monitor::Millis;

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

// Packed layout: [63..56] tag, [55] pin level, [47..0] timestamp (ms).
const TAG_SHIFT: u32 = 56;
const TAG_BILGE_EDGE: u64 = 1;
const LEVEL_BIT: u64 = 1 << 55;
const TIME_MASK: u64 = (1 << 48) - 1;

/// System events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The bilge sense line changed.  `pin_high` is the electrical level
    /// read inside the ISR; `at_ms` wraps after ~8900 years.
    BilgeEdge { pin_high: bool, at_ms: Millis },
}

impl Event {
    fn pack(self) -> u64 {
        match self {
            Self::BilgeEdge { pin_high, at_ms } => {
                let level = if pin_high { LEVEL_BIT } else { 0 };
                (TAG_BILGE_EDGE << TAG_SHIFT) | level | (at_ms & TIME_MASK)
            }
        }
    }

    fn unpack(raw: u64) -> Option<Self> {
        match raw >> TAG_SHIFT {
            TAG_BILGE_EDGE => Some(Self::BilgeEdge {
                pin_high: raw & LEVEL_BIT != 0,
                at_ms: raw & TIME_MASK,
            }),
            _ => None,
        }
    }
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// ISR writes (produces), main loop reads (consumes).  One slot is kept
// free to tell "full" from "empty".

pub struct EventQueue {
    head: AtomicUsize,
    tail: AtomicUsize,
    dropped: AtomicU32,
    slots: [AtomicU64; EVENT_QUEUE_CAP],
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
            slots: [const { AtomicU64::new(0) }; EVENT_QUEUE_CAP],
        }
    }

    /// Push an event.  Safe from ISR context (lock-free).
    /// Returns `false` if the queue is full (event dropped and counted).
    pub fn push(&self, event: Event) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = (head + 1) % EVENT_QUEUE_CAP;

        if next_head == tail {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.slots[head].store(event.pack(), Ordering::Relaxed);
        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Pop the next event.  Single consumer only.
    pub fn pop(&self) -> Option<Event> {
        loop {
            let tail = self.tail.load(Ordering::Relaxed);
            let head = self.head.load(Ordering::Acquire);
            if tail == head {
                return None;
            }

            let raw = self.slots[tail].load(Ordering::Relaxed);
            self.tail.store((tail + 1) % EVENT_QUEUE_CAP, Ordering::Release);

            // An unknown tag cannot be produced by `push`; skip it if seen.
            if let Some(event) = Event::unpack(raw) {
                return Some(event);
            }
        }
    }

    /// Drain all pending events into a callback, FIFO.
    pub fn drain(&self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Relaxed) == self.head.load(Ordering::Acquire)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
    }

    /// Events lost to a full queue since boot.
    pub fn dropped_count(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// The queue shared between the GPIO ISR and the main loop.
/// A `static` because ESP-IDF ISR callbacks cannot capture state.
pub static EVENT_QUEUE: EventQueue = EventQueue::new();

/// Push into [`EVENT_QUEUE`].  ISR-safe.
pub fn push_event(event: Event) -> bool {
    EVENT_QUEUE.push(event)
}
