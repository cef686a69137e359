//! Typed configuration.

use std::path::PathBuf;
use std::time::Duration;

use imeibot_core::Mode;
use serde::Serialize;

use crate::defaults::{LIVE_PATH, SANDBOX_PATH};

/// Remote IMEI API connection settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Sent as the `token` header on every request.
    pub token: String,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    pub fn live_url(&self) -> String {
        format!("{}{LIVE_PATH}", self.base_url())
    }

    pub fn sandbox_url(&self) -> String {
        format!("{}{SANDBOX_PATH}", self.base_url())
    }

    pub fn endpoint(&self, mode: Mode) -> String {
        match mode {
            Mode::Live => self.live_url(),
            Mode::Sandbox => self.sandbox_url(),
        }
    }
}

/// Full bot configuration, built once at startup and passed down explicitly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    pub api: ApiConfig,
    pub bot_token: String,
    /// Relaxes TLS certificate verification for the outbound API.
    pub test_mode: bool,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }
}
