// src/render/format.rs
// Small formatting helpers for the Markdown renderer.

use chrono::{DateTime, Utc};

/// 1234567 -> "1,234,567"
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "January 5, 2024"
pub fn long_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// "2024-01-05 14:03:09 UTC"
pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

// Escapes text for a shields.io static badge path segment.
// Dashes and underscores are doubled, spaces become underscores, and the
// rest is percent-encoded.
pub fn badge_text(raw: &str) -> String {
    let escaped = raw.replace('-', "--").replace('_', "__").replace(' ', "_");
    url::form_urlencoded::byte_serialize(escaped.as_bytes()).collect()
}
