//! Payload interpretation.
//!
//! Incoming bytes are either UTF-8 text or opaque binary; the two are
//! kept apart as an explicit tagged value rather than inferred ad hoc at
//! each call site. Text can additionally be classified as JSON, which is
//! observational only: it never changes what gets sent back.
//!
//! # Example
//!
//! ```
//! use udp2docker::codec::DecodedPayload;
//!
//! match DecodedPayload::from_bytes(b"hello".as_ref().into()) {
//!     DecodedPayload::Text(s) => assert_eq!(s, "hello"),
//!     DecodedPayload::Binary(_) => unreachable!(),
//! }
//! ```

use bytes::Bytes;
use serde_json::Value;

/// A payload decoded as either UTF-8 text or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedPayload {
    /// Valid UTF-8 text.
    Text(String),
    /// Not valid UTF-8; treated as opaque binary.
    Binary(Bytes),
}

impl DecodedPayload {
    /// Decode bytes, tagging them as text or binary.
    pub fn from_bytes(data: Bytes) -> Self {
        match std::str::from_utf8(&data) {
            Ok(s) => DecodedPayload::Text(s.to_string()),
            Err(_) => DecodedPayload::Binary(data),
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        match self {
            DecodedPayload::Text(s) => s.len(),
            DecodedPayload::Binary(b) => b.len(),
        }
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shape of a text payload: JSON document or plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextShape {
    /// Parsed as a JSON value.
    Json(Value),
    /// Not JSON; ordinary text.
    Plain,
}

/// Classify text as JSON or plain (second layer on top of
/// [`DecodedPayload::Text`] only).
pub fn classify_text(text: &str) -> TextShape {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => TextShape::Json(value),
        Err(_) => TextShape::Plain,
    }
}

/// First `max_chars` characters of `text`, always suffixed with `"..."`.
///
/// Counts characters, not bytes, so multi-byte UTF-8 input never splits
/// a code point. The ellipsis is appended even when nothing was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated)
}
