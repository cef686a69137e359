//! CLI Doctor Command
//!
//! Loads the configuration from the environment and reports what is wrong
//! with it, without starting the bot.

use anyhow::{bail, Result};

use imeibot_config::{validate, BotConfig, ConfigError};

/// Executes the full doctor diagnosis.
pub fn run() -> Result<()> {
    println!("\n🔍 Running IMEI bot doctor...\n");

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(ConfigError::Missing(vars)) => {
            for var in &vars {
                println!("  🔴 {var} is missing (REQUIRED)");
            }
            bail!("{} required variable(s) missing", vars.len());
        }
        Err(e) => {
            println!("  🔴 {e}");
            bail!(e);
        }
    };

    println!("Configuration:");
    println!("{}", serde_json::to_string_pretty(&config.redacted())?);
    println!();

    let report = validate(&config);
    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        println!("  🔴 {}: {}", error.path, error.message);
    }

    println!();
    if report.is_valid() {
        println!("✅ All checks passed!");
        Ok(())
    } else {
        println!("❌ Some checks failed! Please fix the errors above.");
        bail!("{} configuration error(s)", report.errors.len());
    }
}
