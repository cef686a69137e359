//! HTTP relay to the remote IMEI check API.
//!
//! One POST per check, no retries. Status and transport failures come back
//! as [`RelayOutcome`] values; only an undecodable 200 body is an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

use imeibot_config::ApiConfig;
use imeibot_core::{BotError, ConversationId, ImeiChecker, Mode, RelayOutcome};
use imeibot_logging::{RelayEvent, RelayEventLogger};

/// Relay bound to one API configuration.
///
/// The underlying client and its connection pool are owned here and released
/// when the relay is dropped.
#[derive(Debug, Clone)]
pub struct ImeiRelay {
    client: Client,
    api: ApiConfig,
}

impl ImeiRelay {
    /// Build the HTTP client. `test_mode` turns off certificate verification.
    pub fn new(api: &ApiConfig, test_mode: bool) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(api.timeout)
            .danger_accept_invalid_certs(test_mode)
            .build()
            .map_err(|e| BotError::Config(format!("failed to build HTTP client: {e}")))?;
        if test_mode {
            warn!("TLS certificate verification disabled for the IMEI API");
        }
        Ok(Self {
            client,
            api: api.clone(),
        })
    }

    pub fn endpoint(&self, mode: Mode) -> String {
        self.api.endpoint(mode)
    }

    pub fn timeout(&self) -> Duration {
        self.api.timeout
    }

    /// Same as [`ImeiChecker::check`], tagging relay events with the
    /// conversation that triggered them.
    pub async fn check_for(
        &self,
        conversation: Option<ConversationId>,
        mode: Mode,
        imei: &str,
    ) -> Result<RelayOutcome, BotError> {
        let url = self.endpoint(mode);
        RelayEventLogger::log_event(
            conversation,
            RelayEvent::Request {
                mode,
                imei: imei.to_string(),
            },
        );

        let response = match self
            .client
            .post(&url)
            .header("token", &self.api.token)
            .query(&[("imei", imei)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(transport_failure(conversation, mode, e)),
        };

        let status = response.status();
        RelayEventLogger::log_event(
            conversation,
            RelayEvent::Response {
                mode,
                status: status.as_u16(),
            },
        );

        if status != StatusCode::OK {
            error!(status = status.as_u16(), %mode, "API request failed");
            return Ok(RelayOutcome::HttpError(status.as_u16()));
        }

        // Reading the body can still time out or be cut off mid-stream.
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Ok(transport_failure(conversation, mode, e)),
        };
        let payload: Value = serde_json::from_slice(&body)
            .map_err(|e| BotError::MalformedResponse(e.to_string()))?;
        debug!(%mode, bytes = body.len(), "API request succeeded");

        Ok(RelayOutcome::Ok(payload))
    }
}

#[async_trait]
impl ImeiChecker for ImeiRelay {
    async fn check(&self, mode: Mode, imei: &str) -> Result<RelayOutcome, BotError> {
        self.check_for(None, mode, imei).await
    }
}

/// Log and classify a failure that happened before a full response arrived.
fn transport_failure(
    conversation: Option<ConversationId>,
    mode: Mode,
    err: reqwest::Error,
) -> RelayOutcome {
    let cause = describe_transport_error(err);
    RelayEventLogger::log_event(
        conversation,
        RelayEvent::Failure {
            mode,
            error_msg: cause.clone(),
        },
    );
    RelayOutcome::TransportError(cause)
}

fn describe_transport_error(err: reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else {
        "request"
    };
    // Strip the URL: it carries the IMEI in its query string.
    format!("{kind}: {}", err.without_url())
}
