use thiserror::Error;

/// Top-level error type for the bot.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot connect to IMEI API: {0}")]
    Connect(String),

    #[error("IMEI API responded with status {0}")]
    ApiStatus(u16),

    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    #[error("channel error: {0}")]
    Channel(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BotError {
    pub fn channel(err: impl std::fmt::Display) -> Self {
        BotError::Channel(err.to_string())
    }

    /// Message shown to the user when this error reaches the top-level handler.
    pub fn user_message(&self) -> String {
        match self {
            BotError::Connect(_) => {
                "Cannot reach the IMEI API. Please try again later.".to_string()
            }
            BotError::ApiStatus(status) => {
                format!("The IMEI API returned an error (status {status}).")
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}
