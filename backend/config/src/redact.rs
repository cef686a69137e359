//! Config redaction: produce safe-to-share config snapshots by masking sensitive fields.

use serde_json::Value;

use crate::schema::BotConfig;

static SENSITIVE_KEYS: &[&str] = &["token", "botToken", "bot_token", "apiToken", "api_token"];

/// Redact a config JSON value, replacing all sensitive fields with a short
/// hint followed by `***`.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

impl BotConfig {
    /// Snapshot of this config that is safe to log or print.
    pub fn redacted(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(value) => redact(&value),
            Err(_) => Value::Null,
        }
    }
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if !is_sensitive_key(key) || s.is_empty() {
        return Value::String(s.to_string());
    }
    // Secrets shorter than 8 chars get no hint at all.
    let hint = if s.chars().count() >= 8 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    };
    Value::String(hint)
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}
