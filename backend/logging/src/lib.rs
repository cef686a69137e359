//! Structured logging for the IMEI check bot.
//!
//! Handles log redaction, console and rolling NDJSON output, and relay event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{RelayEvent, RelayEventEntry, RelayEventLogger};
pub use logger::{init_logger, LoggerGuard};
pub use redact::redact_sensitive_data;
