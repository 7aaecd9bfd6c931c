//! Incremental frame decoding (Bytes -> provider frames -> JSON values).
//!
//! Providers frame their streaming responses differently (blank-line SSE,
//! CRLF SSE, one JSON object per line), but the buffering problem is the
//! same everywhere: network chunks arrive at arbitrary byte offsets, so a
//! frame — or a multi-byte UTF-8 sequence inside one — can straddle any
//! number of reads. Rather than one buffering loop per provider, this module
//! keeps a single state machine, [`frame_stream`], parameterized by a
//! [`Boundary`] rule, and a single [`FrameDecoder`] parameterized by a
//! per-provider parse function.
//!
//! The scan runs on bytes: every supported delimiter is pure ASCII, and
//! ASCII bytes never occur inside a multi-byte UTF-8 sequence, so boundary
//! detection cannot split a character. UTF-8 validation happens once per
//! complete frame.

use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::{stream, StreamExt};
use serde_json::Value;
use std::sync::Arc;

/// Frame boundary rule for a provider's wire framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Blank-line terminated frames (`\n\n`) — OpenAI-compatible SSE.
    BlankLine,
    /// CRLF blank-line terminated frames (`\r\n\r\n`) — Anthropic SSE.
    CrlfBlankLine,
    /// One frame per line (`\n`) — Cohere/Ollama style ND-JSON.
    Line,
}

impl Boundary {
    pub(crate) fn delimiter(self) -> &'static [u8] {
        match self {
            Boundary::BlankLine => b"\n\n",
            Boundary::CrlfBlankLine => b"\r\n\r\n",
            Boundary::Line => b"\n",
        }
    }
}

/// Outcome of parsing one complete frame.
pub enum Parsed {
    /// A decoded provider chunk.
    Frame(Value),
    /// The frame carried no payload (blank, heartbeat comment); skip it.
    Skip,
    /// Clean end-of-stream sentinel (e.g. `[DONE]`); stop decoding.
    Done,
}

/// Per-provider frame parse function.
///
/// Must never fail on anticipated shape variance (empty frames return
/// [`Parsed::Skip`]); a genuinely malformed frame is a fatal decode error.
pub type ParseFrame = Arc<dyn Fn(&str) -> Result<Parsed> + Send + Sync>;

/// Frame-level decode failures.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("frame is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("malformed {provider} frame: {reason}; frame: {frame:?}")]
    MalformedFrame {
        provider: &'static str,
        reason: String,
        frame: String,
    },
}

impl DecodeError {
    pub(crate) fn malformed(provider: &'static str, reason: impl Into<String>, frame: &str) -> Self {
        // Cap the echoed frame so a runaway payload does not balloon the error.
        let mut frame = frame.to_string();
        if frame.len() > 256 {
            let mut cut = 256;
            while !frame.is_char_boundary(cut) {
                cut -= 1;
            }
            frame.truncate(cut);
            frame.push_str("...");
        }
        DecodeError::MalformedFrame {
            provider,
            reason: reason.into(),
            frame,
        }
    }
}

fn find_delimiter(buf: &[u8], from: usize, delim: &[u8]) -> Option<usize> {
    if buf.len() < delim.len() {
        return None;
    }
    (from..=buf.len() - delim.len()).find(|&i| &buf[i..i + delim.len()] == delim)
}

/// Splits an arbitrarily-chunked byte stream into complete text frames.
///
/// Maintains one byte buffer and one boundary-scan cursor that persist across
/// chunk boundaries. Frames are emitted strictly in arrival order, without
/// their trailing delimiter. If the stream ends with unterminated buffered
/// content, that content is emitted as a final frame rather than discarded:
/// a provider closing its connection without a trailing delimiter would
/// otherwise silently lose data.
pub fn frame_stream(
    input: BoxStream<'static, Bytes>,
    boundary: Boundary,
) -> BoxStream<'static, String> {
    let delim = boundary.delimiter();
    let input = input.fuse();

    let stream = stream::unfold(
        (input, Vec::new(), 0usize),
        move |(mut input, mut buf, mut scan)| async move {
            loop {
                if let Some(idx) = find_delimiter(&buf, scan, delim) {
                    let frame = match std::str::from_utf8(&buf[..idx]) {
                        Ok(s) => s.to_string(),
                        Err(e) => {
                            return Some((
                                Err(Error::Decode(DecodeError::InvalidUtf8(e))),
                                (input, Vec::new(), 0),
                            ))
                        }
                    };
                    buf.drain(..idx + delim.len());
                    return Some((Ok(frame), (input, buf, 0)));
                }

                // No boundary yet. Resume the next scan where a delimiter
                // could first span old and new bytes.
                scan = buf.len().saturating_sub(delim.len() - 1);

                match input.next().await {
                    Some(Ok(bytes)) => {
                        buf.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => return Some((Err(e), (input, buf, scan))),
                    None => {
                        if buf.is_empty() {
                            return None;
                        }
                        tracing::warn!(
                            len = buf.len(),
                            "byte stream ended without trailing delimiter; emitting buffered tail"
                        );
                        let tail = std::mem::take(&mut buf);
                        let frame = match std::str::from_utf8(&tail) {
                            Ok(s) => s.to_string(),
                            Err(e) => {
                                return Some((
                                    Err(Error::Decode(DecodeError::InvalidUtf8(e))),
                                    (input, Vec::new(), 0),
                                ))
                            }
                        };
                        return Some((Ok(frame), (input, Vec::new(), 0)));
                    }
                }
            }
        },
    );

    Box::pin(stream)
}

/// Decoder trait for stream decoding
#[async_trait::async_trait]
pub trait Decoder: Send + Sync {
    /// Decode a byte stream into provider chunks (JSON values)
    async fn decode_stream(
        &self,
        input: BoxStream<'static, Bytes>,
    ) -> Result<BoxStream<'static, Value>>;
}

/// Generic incremental frame decoder: one buffering state machine for every
/// provider, parameterized by the boundary rule and the frame-parse function.
///
/// The returned stream is lazy, finite and non-restartable. A parse failure
/// is fatal: the error is surfaced in-stream at the exact point the bad frame
/// was encountered, then the stream ends. Values emitted before the error are
/// never retracted.
pub struct FrameDecoder {
    boundary: Boundary,
    parse: ParseFrame,
}

impl FrameDecoder {
    pub fn new(boundary: Boundary, parse: ParseFrame) -> Self {
        Self { boundary, parse }
    }
}

#[async_trait::async_trait]
impl Decoder for FrameDecoder {
    async fn decode_stream(
        &self,
        input: BoxStream<'static, Bytes>,
    ) -> Result<BoxStream<'static, Value>> {
        let parse = self.parse.clone();
        let frames = frame_stream(input, self.boundary);

        let stream = stream::unfold(
            (frames, parse, false),
            |(mut frames, parse, stopped)| async move {
                if stopped {
                    return None;
                }
                loop {
                    match frames.next().await {
                        Some(Ok(frame)) => match parse(&frame) {
                            Ok(Parsed::Frame(value)) => {
                                return Some((Ok(value), (frames, parse, false)))
                            }
                            Ok(Parsed::Skip) => continue,
                            Ok(Parsed::Done) => return None,
                            Err(e) => return Some((Err(e), (frames, parse, true))),
                        },
                        Some(Err(e)) => return Some((Err(e), (frames, parse, true))),
                        None => return None,
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }
}
