//! `imeibot-config` — runtime configuration for the IMEI check bot.
//!
//! Provides:
//! - Typed config schema (remote API, bot token, test mode, logging)
//! - Environment loading with all missing variables reported at once
//! - Config redaction for safe logging/display
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::ConfigError;
pub use redact::redact;
pub use schema::{ApiConfig, BotConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

/// Log the validation report for a loaded config.
///
/// Call this once logging is up. Hard errors come back in
/// [`ConfigError::Rejected`] so they survive even without a subscriber.
pub fn check(config: &BotConfig) -> Result<(), ConfigError> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        return Err(ConfigError::Rejected(
            report
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.path, e.message))
                .collect(),
        ));
    }

    Ok(())
}
