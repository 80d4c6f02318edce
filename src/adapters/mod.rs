//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements     | Connects to              |
//! |-----------------|----------------|--------------------------|
//! | `log_sink`      | EventSink      | Serial log output        |
//! | `log_telemetry` | TelemetrySink  | Serial log output        |
//! | `nvs`           | ConfigPort     | NVS / in-memory store    |
//! | `time`          | —              | ESP32 system timer       |

pub mod log_sink;
pub mod log_telemetry;
pub mod nvs;
pub mod time;
