//! One-shot IMEI check from the command line.

use anyhow::{bail, Result};

use imeibot_config::BotConfig;
use imeibot_core::Mode;
use imeibot_relay::ImeiRelay;

/// Print the payload the bot would show, failing when the check failed.
pub async fn run(config: &BotConfig, mode: Mode, imei: &str) -> Result<()> {
    let relay = ImeiRelay::new(&config.api, config.test_mode)?;
    let outcome = relay.check_for(None, mode, imei).await?;

    println!("{}", serde_json::to_string_pretty(&outcome.clone().into_payload())?);

    if let Some(err) = outcome.into_error() {
        bail!(err);
    }
    Ok(())
}
