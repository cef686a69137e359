//! Environment variable loading.
//!
//! Required variables are checked for presence only; every missing one is
//! collected so a single startup failure lists them all.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::defaults::*;
use crate::schema::{ApiConfig, BotConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid value for {var}: {message}")]
    Invalid { var: String, message: String },

    #[error("config rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),
}

impl From<ConfigError> for imeibot_core::BotError {
    fn from(err: ConfigError) -> Self {
        imeibot_core::BotError::Config(err.to_string())
    }
}

impl BotConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&std::env::vars().collect())
    }

    /// Load configuration from a provided map (useful for testing).
    pub fn from_env_with(env: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut required = |name: &str| -> String {
            match env.get(name) {
                Some(v) if !v.trim().is_empty() => v.trim().to_string(),
                _ => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        };

        let host = required(API_HOST);
        let port = required(API_PORT);
        let token = required(API_TOKEN);
        let bot_token = required(BOT_TOKEN);
        let test_mode = required(TEST_MODE);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let port = port.parse::<u16>().map_err(|e| ConfigError::Invalid {
            var: API_PORT.to_string(),
            message: e.to_string(),
        })?;
        let test_mode = parse_bool(&test_mode).ok_or_else(|| ConfigError::Invalid {
            var: TEST_MODE.to_string(),
            message: format!("expected a boolean, got '{test_mode}'"),
        })?;

        let timeout = match optional(env, API_TIMEOUT_SECS) {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                ConfigError::Invalid {
                    var: API_TIMEOUT_SECS.to_string(),
                    message: e.to_string(),
                }
            })?),
            None => DEFAULT_TIMEOUT,
        };

        Ok(BotConfig {
            api: ApiConfig {
                scheme: optional(env, API_SCHEME).unwrap_or_else(|| DEFAULT_SCHEME.to_string()),
                host,
                port,
                token,
                timeout,
            },
            bot_token,
            test_mode,
            log_level: optional(env, LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_dir: optional(env, LOG_DIR).map(PathBuf::from),
        })
    }
}

fn optional(env: &HashMap<String, String>, name: &str) -> Option<String> {
    env.get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn full() -> HashMap<String, String> {
        env(&[
            ("API_HOST", "imei.example.com"),
            ("API_PORT", "8443"),
            ("API_TOKEN", "api-secret"),
            ("BOT_TOKEN", "123456:ABCDEF"),
            ("TEST_MODE", "false"),
        ])
    }

    #[test]
    fn loads_required_with_defaults() {
        let cfg = BotConfig::from_env_with(&full()).unwrap();
        assert_eq!(cfg.api.host, "imei.example.com");
        assert_eq!(cfg.api.port, 8443);
        assert_eq!(cfg.api.scheme, "https");
        assert_eq!(cfg.api.timeout, Duration::from_secs(5));
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.log_dir.is_none());
        assert!(!cfg.test_mode);
    }

    #[test]
    fn reports_every_missing_var() {
        let err = BotConfig::from_env_with(&env(&[("API_HOST", "h")])).unwrap_err();
        match err {
            ConfigError::Missing(vars) => {
                assert_eq!(vars, vec!["API_PORT", "API_TOKEN", "BOT_TOKEN", "TEST_MODE"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_counts_as_missing() {
        let mut vars = full();
        vars.insert("API_TOKEN".into(), "   ".into());
        let err = BotConfig::from_env_with(&vars).unwrap_err();
        assert!(err.to_string().contains("API_TOKEN"));
    }

    #[test]
    fn test_mode_accepts_common_spellings() {
        for (raw, expected) in [("True", true), ("1", true), ("on", true), ("no", false)] {
            let mut vars = full();
            vars.insert("TEST_MODE".into(), raw.into());
            assert_eq!(BotConfig::from_env_with(&vars).unwrap().test_mode, expected);
        }
    }

    #[test]
    fn rejects_bad_port_and_bool() {
        let mut vars = full();
        vars.insert("API_PORT".into(), "http".into());
        assert!(matches!(
            BotConfig::from_env_with(&vars),
            Err(ConfigError::Invalid { ref var, .. }) if var == "API_PORT"
        ));

        let mut vars = full();
        vars.insert("TEST_MODE".into(), "maybe".into());
        assert!(matches!(
            BotConfig::from_env_with(&vars),
            Err(ConfigError::Invalid { ref var, .. }) if var == "TEST_MODE"
        ));
    }

    #[test]
    fn optional_overrides() {
        let mut vars = full();
        vars.insert("API_SCHEME".into(), "http".into());
        vars.insert("API_TIMEOUT_SECS".into(), "12".into());
        vars.insert("LOG_DIR".into(), "/var/log/imei-bot".into());
        let cfg = BotConfig::from_env_with(&vars).unwrap();
        assert_eq!(cfg.api.base_url(), "http://imei.example.com:8443");
        assert_eq!(cfg.api.timeout, Duration::from_secs(12));
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/var/log/imei-bot")));
    }
}
