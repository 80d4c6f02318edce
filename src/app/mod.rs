//! Application core — pure domain logic, zero I/O.
//!
//! Wires the debounce → run tracking → snapshot publication pipeline.
//! All interaction with hardware and the network happens through **port
//! traits** defined in [`ports`], keeping this layer testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;
