//! GPIO pin assignments for the bilge monitor board.
//!
//! Single source of truth — drivers and the default configuration reference
//! this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Bilge pump sense input
// ---------------------------------------------------------------------------

/// Optically isolated bilge pump sense line.
///
/// The isolator output drives the line HIGH while the pump motor is
/// energised.  GPIO 34–39 are input-only on the ESP32 and have no internal
/// pull resistors, so the pull-up lives on the board (10 kΩ to 3V3).
pub const BILGE_INPUT_GPIO: i32 = 35;

/// Highest GPIO number that exists on any supported ESP32 variant.
pub const MAX_GPIO: i32 = 48;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

/// Baud rate of the serial console the logger writes to.
pub const CONSOLE_BAUD: u32 = 115_200;
