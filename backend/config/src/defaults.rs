//! Default values and variable names.

use std::time::Duration;

pub const API_HOST: &str = "API_HOST";
pub const API_PORT: &str = "API_PORT";
pub const API_TOKEN: &str = "API_TOKEN";
pub const API_SCHEME: &str = "API_SCHEME";
pub const API_TIMEOUT_SECS: &str = "API_TIMEOUT_SECS";
pub const BOT_TOKEN: &str = "BOT_TOKEN";
pub const TEST_MODE: &str = "TEST_MODE";
pub const LOG_LEVEL: &str = "RUST_LOG";
pub const LOG_DIR: &str = "LOG_DIR";

pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const LIVE_PATH: &str = "/check-imei";
pub const SANDBOX_PATH: &str = "/check-imei-sandbox";
