//! Relay Event Logger
//!
//! Structured events for each relay attempt, emitted at target `relay_events`.

use chrono::{DateTime, Utc};
use imeibot_core::{ConversationId, Mode};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    Request { mode: Mode, imei: String },
    Response { mode: Mode, status: u16 },
    Failure { mode: Mode, error_msg: String },
}

#[derive(Debug, Serialize)]
pub struct RelayEventEntry {
    pub conversation: Option<ConversationId>,
    pub timestamp: DateTime<Utc>,
    pub event: RelayEvent,
}

pub struct RelayEventLogger;

impl RelayEventLogger {
    /// Redact and emit one relay event.
    pub fn log_event(conversation: Option<ConversationId>, event: RelayEvent) -> RelayEventEntry {
        let entry = RelayEventEntry {
            conversation,
            timestamp: Utc::now(),
            event: Self::redacted(event),
        };

        let json = serde_json::to_string(&entry).unwrap_or_default();
        match &entry.event {
            RelayEvent::Failure { .. } => warn!(target: "relay_events", event = %json, "Relay event"),
            _ => info!(target: "relay_events", event = %json, "Relay event"),
        }
        entry
    }

    fn redacted(event: RelayEvent) -> RelayEvent {
        match event {
            RelayEvent::Request { mode, imei } => RelayEvent::Request {
                mode,
                imei: redact_sensitive_data(&imei),
            },
            RelayEvent::Failure { mode, error_msg } => RelayEvent::Failure {
                mode,
                error_msg: redact_sensitive_data(&error_msg),
            },
            other => other,
        }
    }
}
