use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Which remote endpoint a conversation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Live,
    Sandbox,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Live, Mode::Sandbox];

    /// Token used in callback data and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Live => "live",
            Mode::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode '{0}', expected 'live' or 'sandbox'")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Mode::Live),
            "sandbox" => Ok(Mode::Sandbox),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Identity a session is partitioned by. On Telegram this is the chat id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Result of a single relay attempt.
///
/// Transport and status failures are values here, not errors: the caller
/// decides how to present them.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    /// HTTP 200 with the decoded JSON body.
    Ok(Value),
    /// Any status other than 200.
    HttpError(u16),
    /// Connection, timeout, or TLS failure before a status was received.
    TransportError(String),
}

impl RelayOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RelayOutcome::Ok(_))
    }

    /// The payload shown to the user: the remote JSON verbatim, or an
    /// `{"error": ...}` record.
    pub fn into_payload(self) -> Value {
        match self {
            RelayOutcome::Ok(body) => body,
            RelayOutcome::HttpError(status) => {
                json!({ "error": format!("Request failed with status {status}") })
            }
            RelayOutcome::TransportError(_) => json!({ "error": "Failed to connect to API" }),
        }
    }

    /// Convert a failed outcome into the matching error, for callers that
    /// treat failures as errors (the one-shot CLI check).
    pub fn into_error(self) -> Option<crate::BotError> {
        match self {
            RelayOutcome::Ok(_) => None,
            RelayOutcome::HttpError(status) => Some(crate::BotError::ApiStatus(status)),
            RelayOutcome::TransportError(cause) => Some(crate::BotError::Connect(cause)),
        }
    }
}
