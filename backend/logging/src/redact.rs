//! Log Redaction Layer
//!
//! Scrubs Telegram bot tokens and IMEI-like digit runs from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static BOT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{6,12}:[A-Za-z0-9_-]{20,}").unwrap());
static IMEI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{14,17}\b").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BOT_TOKEN_RE.replace_all(input, "[REDACTED_TOKEN]");
    IMEI_RE
        .replace_all(&redacted, |caps: &regex::Captures| mask_digits(&caps[0]))
        .into_owned()
}

/// Keep the 8-digit type allocation code, hide the serial.
fn mask_digits(digits: &str) -> String {
    let keep = digits.len().min(8);
    format!("{}{}", &digits[..keep], "*".repeat(digits.len() - keep))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_bot_token_in_url() {
        let raw = "GET https://api.telegram.org/bot123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw/getMe";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw"));
        assert!(clean.contains("[REDACTED_TOKEN]"));
    }

    #[test]
    fn masks_imei_serial() {
        let clean = redact_sensitive_data("imei=490154203237518 mode=live");
        assert_eq!(clean, "imei=49015420******* mode=live");
    }

    #[test]
    fn leaves_short_numbers() {
        let raw = "status 404 after 5s";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
