//! Cohere generation streaming: one JSON object per line.
//!
//! There is no framing-level sentinel; the final chunk carries
//! `is_finished: true` as a data field. That chunk repeats the full response
//! text, so it must not contribute a token.

use crate::decode::{Boundary, FrameDecoder, Parsed};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

pub fn parse_frame(frame: &str) -> Result<Parsed> {
    super::parse_json_line("cohere", frame)
}

/// Extract the plain-text increment from one Cohere stream chunk.
///
/// `is_finished: true` suppresses emission for the final chunk; termination
/// itself is signaled by the end of the byte stream, not by this flag.
pub fn extract_token(chunk: &Value) -> String {
    if chunk["is_finished"].as_bool().unwrap_or(false) {
        return String::new();
    }
    chunk["text"].as_str().unwrap_or("").to_string()
}

pub fn decoder() -> FrameDecoder {
    FrameDecoder::new(Boundary::Line, Arc::new(parse_frame))
}
