use async_trait::async_trait;

use crate::error::BotError;
use crate::types::{Mode, RelayOutcome};

/// Anything that can run one IMEI check against the remote API.
///
/// `Err` is reserved for failures that are neither a status nor a transport
/// problem (for example an undecodable 200 body).
#[async_trait]
pub trait ImeiChecker: Send + Sync {
    async fn check(&self, mode: Mode, imei: &str) -> Result<RelayOutcome, BotError>;
}
