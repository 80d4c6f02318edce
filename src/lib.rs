//! Bilge pump run monitor library.
//!
//! Exposes the pure-logic modules for integration testing.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod monitor;
pub mod scheduler;
pub mod telemetry;

pub mod adapters;
pub mod drivers;
pub mod pins;
pub mod sensors;
