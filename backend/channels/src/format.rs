//! Rendering relay payloads as Telegram HTML messages.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use teloxide::utils::html;

/// Telegram's limit on message text length.
pub const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

const HEADER: &str = "API response:\n";
const CODE_OPEN: &str = "<code>";
const CODE_CLOSE: &str = "</code>";

/// Pretty-print with four-space indentation, keeping non-ASCII text as is.
pub fn pretty_json(payload: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    if payload.serialize(&mut ser).is_err() {
        return payload.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| payload.to_string())
}

/// Render a payload as one or more HTML messages, each within `limit` chars.
///
/// The whole document goes out as a single message whenever it fits. Larger
/// documents are split on line boundaries; the header only leads the first part.
pub fn render_response(payload: &Value, limit: usize) -> Vec<String> {
    let pretty = pretty_json(payload);
    let budget = limit
        .saturating_sub(HEADER.chars().count() + CODE_OPEN.len() + CODE_CLOSE.len())
        .max(1);

    split_escaped(&pretty, budget)
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let header = if i == 0 { HEADER } else { "" };
            format!("{header}{CODE_OPEN}{}{CODE_CLOSE}", html::escape(&part))
        })
        .collect()
}

/// Length of `c` once HTML-escaped. Over-counts entities Telegram collapses.
fn escaped_char_len(c: char) -> usize {
    match c {
        '<' | '>' => 4,
        '&' => 5,
        '"' => 6,
        _ => 1,
    }
}

fn escaped_len(s: &str) -> usize {
    s.chars().map(escaped_char_len).sum()
}

fn split_escaped(text: &str, budget: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    for line in text.split_inclusive('\n') {
        if escaped_len(line) <= budget {
            pieces.push(line.to_string());
            continue;
        }
        let mut piece = String::new();
        let mut piece_len = 0;
        for c in line.chars() {
            let len = escaped_char_len(c);
            if piece_len + len > budget && !piece.is_empty() {
                pieces.push(std::mem::take(&mut piece));
                piece_len = 0;
            }
            piece.push(c);
            piece_len += len;
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for piece in pieces {
        let len = escaped_len(&piece);
        if current_len + len > budget && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(&piece);
        current_len += len;
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }

    chunks
        .into_iter()
        .map(|c| c.trim_end_matches('\n').to_string())
        .collect()
}
