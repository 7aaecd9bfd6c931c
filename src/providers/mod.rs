//! Per-provider framing and token-extraction rules.
//!
//! Each provider module groups two free functions: `parse_frame` (one
//! complete frame → [`Parsed`](crate::decode::Parsed)) and `extract_token` (one provider chunk →
//! plain-text token, possibly empty). The [`Provider`] enum dispatches to
//! them and exposes the stream entry points.
//!
//! Callers choose the granularity they need:
//! - raw bytes: the HTTP byte stream itself, untouched;
//! - [`chunk_stream`]: parsed provider chunks (post-JSON-parse,
//!   pre-extraction);
//! - [`token_stream`]: plain tokens, fully normalized.

pub mod anthropic;
pub mod cohere;
pub mod ollama;
pub mod openai;
pub mod together;

// Azure OpenAI speaks the OpenAI wire format verbatim.
pub use self::openai as azure_openai;

use crate::cancel::{cancel_pair, CancelHandle, ControlledStream};
use crate::decode::{DecodeError, Decoder, FrameDecoder, Parsed};
use crate::{BoxStream, Result};
use bytes::Bytes;
use futures::StreamExt;
use serde_json::Value;

/// Shared parse rule for one-JSON-object-per-line providers. Blank lines are
/// skipped; anything else must be valid JSON.
pub(crate) fn parse_json_line(provider: &'static str, frame: &str) -> Result<Parsed> {
    let trimmed = frame.trim();
    if trimmed.is_empty() {
        return Ok(Parsed::Skip);
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Parsed::Frame(value)),
        Err(e) => Err(DecodeError::malformed(provider, e.to_string(), frame).into()),
    }
}

/// A supported provider wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    AzureOpenAi,
    TogetherAi,
    Anthropic,
    Cohere,
    Ollama,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::AzureOpenAi => "azure_openai",
            Provider::TogetherAi => "togetherai",
            Provider::Anthropic => "anthropic",
            Provider::Cohere => "cohere",
            Provider::Ollama => "ollama",
        }
    }

    /// Frame decoder configured for this provider's wire framing.
    pub fn decoder(&self) -> FrameDecoder {
        match self {
            Provider::OpenAi | Provider::AzureOpenAi => openai::decoder(),
            Provider::TogetherAi => together::decoder(),
            Provider::Anthropic => anthropic::decoder(),
            Provider::Cohere => cohere::decoder(),
            Provider::Ollama => ollama::decoder(),
        }
    }

    /// Pure chunk → token mapping for this provider. Never fails on
    /// anticipated shape variance; non-content chunks yield `""`.
    pub fn extract_token(&self, chunk: &Value) -> String {
        match self {
            Provider::OpenAi | Provider::AzureOpenAi => openai::extract_token(chunk),
            Provider::TogetherAi => together::extract_token(chunk),
            Provider::Anthropic => anthropic::extract_token(chunk),
            Provider::Cohere => cohere::extract_token(chunk),
            Provider::Ollama => ollama::extract_token(chunk),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decode a raw byte stream into parsed provider chunks, in arrival order.
pub async fn chunk_stream(
    provider: Provider,
    input: BoxStream<'static, Bytes>,
) -> Result<BoxStream<'static, Value>> {
    provider.decoder().decode_stream(input).await
}

/// Decode a raw byte stream into plain-text tokens, in arrival order.
/// Non-content chunks (heartbeats, role deltas, final sentinels) are elided.
pub async fn token_stream(
    provider: Provider,
    input: BoxStream<'static, Bytes>,
) -> Result<BoxStream<'static, String>> {
    let chunks = chunk_stream(provider, input).await?;
    let tokens = chunks.filter_map(move |result| async move {
        match result {
            Ok(chunk) => {
                let token = provider.extract_token(&chunk);
                if token.is_empty() {
                    None
                } else {
                    Some(Ok(token))
                }
            }
            Err(e) => Some(Err(e)),
        }
    });
    Ok(Box::pin(tokens))
}

/// Like [`token_stream`], with a handle that cooperatively cancels the
/// stream: after `cancel()` the next pull ends the stream and drops the
/// decode pipeline, which releases its buffer and the underlying network
/// read.
pub async fn token_stream_with_cancel(
    provider: Provider,
    input: BoxStream<'static, Bytes>,
) -> Result<(BoxStream<'static, String>, CancelHandle)> {
    let (handle, token) = cancel_pair();
    let tokens = token_stream(provider, input).await?;
    Ok((Box::pin(ControlledStream::new(tokens, token)), handle))
}
