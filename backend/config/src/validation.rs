//! Config validation with field paths and user-friendly messages.

use thiserror::Error;

use crate::schema::BotConfig;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &BotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_api(config, &mut report);
    validate_bot(config, &mut report);
    report
}

fn validate_api(config: &BotConfig, report: &mut ValidationReport) {
    let api = &config.api;
    if api.host.trim().is_empty() {
        report.error("api.host", "API host cannot be empty");
    }
    if api.token.trim().is_empty() {
        report.error("api.token", "API token cannot be empty");
    }
    if api.timeout.is_zero() {
        report.error("api.timeout", "Timeout must be at least one second");
    }
    if !matches!(api.scheme.as_str(), "http" | "https") {
        report.error(
            "api.scheme",
            format!("Unknown scheme '{}'. Use 'http' or 'https'", api.scheme),
        );
    }
    if config.test_mode && api.scheme == "https" {
        report.warn(
            "testMode",
            "Test mode is on: TLS certificates of the IMEI API will not be verified",
        );
    }
}

fn validate_bot(config: &BotConfig, report: &mut ValidationReport) {
    if config.bot_token.trim().is_empty() {
        report.error("botToken", "Telegram bot token is required");
    } else if !config.bot_token.contains(':') {
        report.warn("botToken", "Telegram bot tokens usually look like '<id>:<secret>'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ApiConfig;
    use std::time::Duration;

    fn config() -> BotConfig {
        BotConfig {
            api: ApiConfig {
                scheme: "https".into(),
                host: "imei.example.com".into(),
                port: 443,
                token: "api-secret".into(),
                timeout: Duration::from_secs(5),
            },
            bot_token: "123:abc".into(),
            test_mode: false,
            log_level: "info".into(),
            log_dir: None,
        }
    }

    #[test]
    fn complete_config_is_clean() {
        let report = validate(&config());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_timeout_is_error() {
        let mut cfg = config();
        cfg.api.timeout = Duration::ZERO;
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "api.timeout");
    }

    #[test]
    fn test_mode_over_https_warns() {
        let mut cfg = config();
        cfg.test_mode = true;
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings[0].path, "testMode");
    }

    #[test]
    fn unknown_scheme_is_error() {
        let mut cfg = config();
        cfg.api.scheme = "ftp".into();
        assert!(!validate(&cfg).is_valid());
    }
}
