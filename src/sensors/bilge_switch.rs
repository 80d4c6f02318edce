//! Bilge pump sense input — the digital edge source.
//!
//! The sense line is wired through an optical isolator to a GPIO with an
//! external pull-up.  Which electrical level means "running" is set by
//! [`ActiveLevel`]; everything past this module only sees logical levels.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: the any-edge ISR calls [`bilge_isr_handler`] with the level
//! it read and the uptime, and the main loop feeds the queued edges through
//! [`BilgeSwitch::drain_queue`].
//! On host/test: edges are fed directly, or a pin is sampled through any
//! `embedded_hal::digital::InputPin` with [`BilgeSwitch::sample`].

use embedded_hal::digital::InputPin;

use crate::config::ActiveLevel;
use crate::events::{push_event, Event, EventQueue};
use crate::monitor::{Millis, RawLevel};

pub struct BilgeSwitch {
    gpio: i32,
    active_level: ActiveLevel,
    /// Last electrical level reported; `None` until the first edge.
    last_pin_high: Option<bool>,
    /// Latest edge timestamp seen, repeats included.
    last_at_ms: Millis,
    /// Queue overflow count already reconciled.
    dropped_seen: u32,
}

impl BilgeSwitch {
    pub fn new(gpio: i32, active_level: ActiveLevel) -> Self {
        Self {
            gpio,
            active_level,
            last_pin_high: None,
            last_at_ms: 0,
            dropped_seen: 0,
        }
    }

    /// GPIO pin this input is attached to.
    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Convert an electrical edge into a logical [`RawLevel`].
    ///
    /// Two interrupts can read the same level when the contact bounces
    /// faster than the ISR runs; the repeat is not an edge and yields `None`.
    pub fn on_edge(&mut self, pin_high: bool, at_ms: Millis) -> Option<RawLevel> {
        self.last_at_ms = self.last_at_ms.max(at_ms);
        if self.last_pin_high == Some(pin_high) {
            return None;
        }
        self.last_pin_high = Some(pin_high);
        Some(RawLevel::new(self.active_level.is_active(pin_high), at_ms))
    }

    /// Feed every queued edge to `on_raw`, oldest first.
    ///
    /// If `queue` dropped edges since the last call, the line is re-read
    /// with `read_pin` once the queue is empty: the lost edge may have been
    /// the last one, and no later edge would correct the level.  Returns
    /// the number of newly dropped edges.
    pub fn drain_queue(
        &mut self,
        queue: &EventQueue,
        now_ms: Millis,
        read_pin: impl FnOnce() -> bool,
        mut on_raw: impl FnMut(RawLevel),
    ) -> u32 {
        queue.drain(|event| match event {
            Event::BilgeEdge { pin_high, at_ms } => {
                if let Some(raw) = self.on_edge(pin_high, at_ms) {
                    on_raw(raw);
                }
            }
        });

        let dropped = queue.dropped_count();
        let lost = dropped.wrapping_sub(self.dropped_seen);
        if lost == 0 {
            return 0;
        }
        self.dropped_seen = dropped;

        let at_ms = now_ms.max(self.last_at_ms);
        if let Some(raw) = self.on_edge(read_pin(), at_ms) {
            on_raw(raw);
        }
        lost
    }

    /// Read `pin` and report an edge if its level changed.
    pub fn sample<P: InputPin>(
        &mut self,
        pin: &mut P,
        at_ms: Millis,
    ) -> Result<Option<RawLevel>, P::Error> {
        let high = pin.is_high()?;
        Ok(self.on_edge(high, at_ms))
    }

    /// Logical level of the last edge, if any.
    pub fn is_active(&self) -> Option<bool> {
        self.last_pin_high.map(|h| self.active_level.is_active(h))
    }
}

/// ISR handler. Register on the sense GPIO for any edge.
/// Lock-free; safe to call from interrupt context.
pub fn bilge_isr_handler(pin_high: bool, at_ms: Millis) {
    // A full queue drops the edge and counts it; `drain_queue` re-reads
    // the line after an overflow.
    let _ = push_event(Event::BilgeEdge { pin_high, at_ms });
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct FakePin(bool);

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0)
        }
        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    #[test]
    fn active_high_maps_directly() {
        let mut sw = BilgeSwitch::new(35, ActiveLevel::High);
        assert_eq!(sw.on_edge(true, 5), Some(RawLevel::new(true, 5)));
        assert_eq!(sw.on_edge(false, 9), Some(RawLevel::new(false, 9)));
        assert_eq!(sw.is_active(), Some(false));
    }

    #[test]
    fn active_low_inverts() {
        let mut sw = BilgeSwitch::new(35, ActiveLevel::Low);
        assert_eq!(sw.on_edge(false, 0), Some(RawLevel::new(true, 0)));
        assert_eq!(sw.is_active(), Some(true));
    }

    #[test]
    fn repeated_level_is_not_an_edge() {
        let mut sw = BilgeSwitch::new(35, ActiveLevel::High);
        assert!(sw.on_edge(true, 0).is_some());
        assert_eq!(sw.on_edge(true, 3), None);
    }

    #[test]
    fn drain_without_overflow_leaves_the_pin_alone() {
        let queue = EventQueue::new();
        queue.push(Event::BilgeEdge { pin_high: true, at_ms: 10 });
        queue.push(Event::BilgeEdge { pin_high: false, at_ms: 20 });

        let mut sw = BilgeSwitch::new(35, ActiveLevel::High);
        let mut seen = Vec::new();
        let lost = sw.drain_queue(&queue, 30, || panic!("pin read"), |raw| seen.push(raw));

        assert_eq!(lost, 0);
        assert_eq!(seen, vec![RawLevel::new(true, 10), RawLevel::new(false, 20)]);
    }

    #[test]
    fn overflow_resamples_the_line_after_draining() {
        let queue = EventQueue::new();
        let mut sw = BilgeSwitch::new(35, ActiveLevel::High);
        let mut seen = Vec::new();

        // The last edge (line low) does not fit.
        let mut pushed = 0;
        for i in 0..32u64 {
            if queue.push(Event::BilgeEdge { pin_high: i % 2 == 0, at_ms: 100 + i }) {
                pushed += 1;
            }
        }
        assert_eq!(pushed, 31);

        let lost = sw.drain_queue(&queue, 120, || false, |raw| seen.push(raw));

        assert_eq!(lost, 1);
        assert_eq!(seen.len(), 32);
        // Stamped no earlier than the last drained edge.
        assert_eq!(seen.last(), Some(&RawLevel::new(false, 130)));
        assert_eq!(sw.is_active(), Some(false));

        // Already reconciled: the next drain does not read the pin again.
        assert_eq!(sw.drain_queue(&queue, 200, || panic!("pin read"), |raw| seen.push(raw)), 0);
    }

    #[test]
    fn samples_embedded_hal_pin() {
        let mut sw = BilgeSwitch::new(35, ActiveLevel::High);
        let mut pin = FakePin(false);
        assert_eq!(sw.is_active(), None);
        assert_eq!(sw.sample(&mut pin, 0), Ok(Some(RawLevel::new(false, 0))));
        assert_eq!(sw.sample(&mut pin, 10), Ok(None));
        pin.0 = true;
        assert_eq!(sw.sample(&mut pin, 20), Ok(Some(RawLevel::new(true, 20))));
    }
}
