//! Ollama streaming: one JSON object per line.
//!
//! Both the generate API (`response` field) and the chat API
//! (`message.content`) are supported. The final chunk sets `done: true` and
//! carries timing/eval metadata instead of text; it must not emit a token.

use crate::decode::{Boundary, FrameDecoder, Parsed};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

pub fn parse_frame(frame: &str) -> Result<Parsed> {
    super::parse_json_line("ollama", frame)
}

/// Extract the plain-text increment from one Ollama stream chunk.
pub fn extract_token(chunk: &Value) -> String {
    if chunk["done"].as_bool().unwrap_or(false) {
        return String::new();
    }
    if let Some(text) = chunk["response"].as_str() {
        return text.to_string();
    }
    chunk["message"]["content"].as_str().unwrap_or("").to_string()
}

pub fn decoder() -> FrameDecoder {
    FrameDecoder::new(Boundary::Line, Arc::new(parse_frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_response_is_extracted() {
        assert_eq!(extract_token(&json!({"response": "Hi", "done": false})), "Hi");
    }

    #[test]
    fn chat_message_content_is_extracted() {
        let chunk = json!({"message": {"role": "assistant", "content": "Hi"}, "done": false});
        assert_eq!(extract_token(&chunk), "Hi");
    }

    #[test]
    fn done_chunk_is_suppressed() {
        let chunk = json!({"response": "", "done": true, "total_duration": 123});
        assert_eq!(extract_token(&chunk), "");
    }
}
