//! Sensor subsystem.
//!
//! A single digital input: the bilge pump sense line.

pub mod bilge_switch;
