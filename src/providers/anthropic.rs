//! Anthropic SSE decoding.
//!
//! Frames are `event: <type>` / `data: <json>` line pairs separated by
//! `\r\n`, terminated by `\r\n\r\n`. Unlike the OpenAI family there is no
//! `[DONE]` sentinel: termination is the end of the byte stream, and
//! bookkeeping events (`ping`, `message_start`, `message_delta`, ...) flow
//! through as chunks that extract to an empty token.

use crate::decode::{Boundary, DecodeError, FrameDecoder, Parsed};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

/// Parse one `event:`/`data:` frame.
///
/// A non-empty frame missing either the `event:` or the `data:` line is a
/// hard parse error. The decoded provider chunk is the `data` payload; the
/// payload's own `type` field mirrors the event name.
pub fn parse_frame(frame: &str) -> Result<Parsed> {
    let trimmed = frame.trim();
    if trimmed.is_empty() {
        return Ok(Parsed::Skip);
    }

    let mut event: Option<&str> = None;
    let mut data: Option<&str> = None;
    for line in trimmed.lines() {
        let line = line.trim_end_matches('\r');
        if line.starts_with(':') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("event:") {
            event = Some(rest.trim());
        } else if let Some(rest) = line.strip_prefix("data:") {
            data = Some(rest.trim());
        }
    }

    let (event, data) = match (event, data) {
        (Some(e), Some(d)) => (e, d),
        _ => {
            return Err(
                DecodeError::malformed("anthropic", "missing event/data pair", frame).into(),
            )
        }
    };

    match serde_json::from_str(data) {
        Ok(value) => Ok(Parsed::Frame(value)),
        Err(e) => Err(DecodeError::malformed(
            "anthropic",
            format!("event {:?}: {}", event, e),
            frame,
        )
        .into()),
    }
}

/// Extract the plain-text increment from one Anthropic chunk.
///
/// Supports both the legacy completion shape (`{"type":"completion",
/// "completion":"..."}`) and the messages shape
/// (`{"type":"content_block_delta","delta":{"text":"..."}}`). Every other
/// event type — `ping` included — yields `""`.
pub fn extract_token(chunk: &Value) -> String {
    match chunk["type"].as_str() {
        Some("completion") => chunk["completion"].as_str().unwrap_or("").to_string(),
        Some("content_block_delta") => chunk["delta"]["text"].as_str().unwrap_or("").to_string(),
        Some(_) => String::new(),
        // Legacy payloads without a type field carry the completion inline.
        None => chunk["completion"].as_str().unwrap_or("").to_string(),
    }
}

pub fn decoder() -> FrameDecoder {
    FrameDecoder::new(Boundary::CrlfBlankLine, Arc::new(parse_frame))
}
