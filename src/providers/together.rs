//! TogetherAI streaming: OpenAI-compatible SSE framing with one extraction
//! quirk — hosted open models can surface their literal stop marker (`</s>`)
//! as a token. It is excluded from the token stream without ending it;
//! termination is still signaled by `[DONE]`.

use crate::decode::{FrameDecoder, Parsed};
use crate::Result;
use serde_json::Value;

use super::openai;

const STOP_MARKER: &str = "</s>";

pub fn parse_frame(frame: &str) -> Result<Parsed> {
    openai::parse_frame(frame)
}

pub fn extract_token(chunk: &Value) -> String {
    let token = openai::extract_token(chunk);
    if token == STOP_MARKER {
        return String::new();
    }
    token
}

pub fn decoder() -> FrameDecoder {
    openai::decoder()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stop_marker_is_excluded() {
        let chunk = json!({"choices":[{"text":"</s>","index":0}]});
        assert_eq!(extract_token(&chunk), "");
    }

    #[test]
    fn ordinary_text_passes_through() {
        let chunk = json!({"choices":[{"text":"hello","index":0}]});
        assert_eq!(extract_token(&chunk), "hello");
    }
}
