//! Minimal MIME message construction for the mail integration

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

/// Build a plain-text message and encode it base64url without padding
#[must_use]
pub fn encode_plain_text_message(to: &str, subject: &str, body: &str) -> String {
    let message = [
        format!("To: {to}"),
        format!("Subject: {}", encode_header_value(subject)),
        "Content-Type: text/plain; charset=utf-8".to_string(),
        String::new(),
        body.to_string(),
    ]
    .join("\n");

    URL_SAFE_NO_PAD.encode(message.as_bytes())
}

/// RFC 2047 encoded-word for non-ASCII header values
fn encode_header_value(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}
