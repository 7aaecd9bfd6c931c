//! OpenAI-compatible SSE decoding.
//!
//! Frames are `data: <json>` lines terminated by a blank line. The literal
//! `[DONE]` payload signals a clean end of stream — it is a sentinel, not an
//! error and not a token. Azure OpenAI and TogetherAI speak the same framing;
//! Azure is a straight re-export, TogetherAI layers one extraction quirk on
//! top (see [`super::together`]).

use crate::decode::{Boundary, DecodeError, FrameDecoder, Parsed};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

pub(crate) const DONE_SIGNAL: &str = "[DONE]";

/// Parse one blank-line-terminated SSE frame.
///
/// Empty frames and SSE comment lines (`: keep-alive`) are skipped. A
/// non-empty `data:` payload that is not valid JSON is a fatal decode error:
/// silently dropping it could mask a broken or changed wire format.
pub fn parse_frame(frame: &str) -> Result<Parsed> {
    let trimmed = frame.trim();
    if trimmed.is_empty() {
        return Ok(Parsed::Skip);
    }
    if trimmed.starts_with(':') {
        return Ok(Parsed::Skip);
    }

    let payload = if let Some(rest) = trimmed.strip_prefix("data: ") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("data:") {
        rest.trim_start()
    } else {
        trimmed
    };

    if payload == DONE_SIGNAL {
        return Ok(Parsed::Done);
    }

    match serde_json::from_str(payload) {
        Ok(value) => Ok(Parsed::Frame(value)),
        Err(e) => Err(DecodeError::malformed("openai", e.to_string(), frame).into()),
    }
}

/// Extract the plain-text increment from one chat-completion chunk.
///
/// Role-only deltas and heartbeat chunks with an empty `choices` list yield
/// `""` rather than an error; `choices[0].text` covers the legacy completions
/// shape.
pub fn extract_token(chunk: &Value) -> String {
    chunk["choices"][0]["delta"]["content"]
        .as_str()
        .or_else(|| chunk["choices"][0]["text"].as_str())
        .unwrap_or("")
        .to_string()
}

pub fn decoder() -> FrameDecoder {
    FrameDecoder::new(Boundary::BlankLine, Arc::new(parse_frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn done_signal_parses_to_done() {
        assert!(matches!(parse_frame("data: [DONE]").unwrap(), Parsed::Done));
        assert!(matches!(parse_frame("data:[DONE]").unwrap(), Parsed::Done));
    }

    #[test]
    fn comment_and_blank_frames_are_skipped() {
        assert!(matches!(parse_frame("").unwrap(), Parsed::Skip));
        assert!(matches!(parse_frame(": keep-alive").unwrap(), Parsed::Skip));
    }

    #[test]
    fn garbage_payload_is_fatal() {
        assert!(parse_frame("data: {not json").is_err());
    }

    #[test]
    fn empty_choices_yields_empty_token() {
        assert_eq!(extract_token(&json!({"choices": []})), "");
    }

    #[test]
    fn delta_content_is_extracted() {
        let chunk = json!({"choices":[{"delta":{"content":"Hi"},"index":0}]});
        assert_eq!(extract_token(&chunk), "Hi");
    }
}
