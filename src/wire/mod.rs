//! ND-JSON relay protocol for downstream clients.
//!
//! A decoded token/chunk sequence is re-serialized as newline-delimited
//! tagged JSON: every line is `{"type":"chunk"|"data","value":V}\n`. Source
//! values are always tagged `chunk` and emitted in arrival order, one per
//! line. Optional side-channel data rides along tagged `data`.
//!
//! Side-data wire position is determined by its availability, and the
//! asymmetry is contractual:
//!
//! - values available when encoding starts ([`SideData::Ready`]) are emitted
//!   **before** any `chunk` line;
//! - values still being computed ([`SideData::Deferred`]) are emitted
//!   **after** the last `chunk` line, once the computation resolves.
//!
//! This lets a caller attach context only known after generation completes
//! (e.g. which retrieved documents were used) without buffering the whole
//! token stream first.
//!
//! Decoding uses the same incremental single-`\n` buffering discipline as the
//! provider decoders, but with stricter error semantics: this is an internal
//! protocol, so a malformed line is always a hard error with no silent-skip
//! path.

use crate::decode::{frame_stream, Boundary};
use crate::{BoxStream, Result};
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of the relay protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Envelope {
    /// A value from the main sequence.
    Chunk(Value),
    /// An out-of-band side-channel value.
    Data(Value),
}

/// Side-channel values attached to a stream's wire encoding.
pub enum SideData {
    /// Already available; its `data` lines precede every `chunk` line.
    Ready(Vec<Value>),
    /// Still being computed; its `data` lines follow the last `chunk` line,
    /// once the future resolves as the stream is closing.
    Deferred(BoxFuture<'static, Result<Vec<Value>>>),
}

/// Relay protocol violations.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed ND-JSON line {line:?}: {source}")]
    MalformedLine {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("blank line in ND-JSON stream")]
    BlankLine,
}

fn encode_line(envelope: &Envelope) -> Result<Bytes> {
    let mut line = serde_json::to_vec(envelope)?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}

/// Serialize a lazy value sequence, plus optional side-channel data, into
/// ND-JSON lines.
pub fn encode(
    chunks: BoxStream<'static, Value>,
    side: Option<SideData>,
) -> BoxStream<'static, Bytes> {
    let (head, deferred) = match side {
        Some(SideData::Ready(values)) => (values, None),
        Some(SideData::Deferred(fut)) => (Vec::new(), Some(fut)),
        None => (Vec::new(), None),
    };

    let head = stream::iter(
        head.into_iter()
            .map(|v| encode_line(&Envelope::Data(v)))
            .collect::<Vec<_>>(),
    );

    let body = chunks.map(|result| result.and_then(|v| encode_line(&Envelope::Chunk(v))));

    let tail = stream::once(async move {
        match deferred {
            None => Vec::new(),
            Some(fut) => match fut.await {
                Ok(values) => values
                    .into_iter()
                    .map(|v| encode_line(&Envelope::Data(v)))
                    .collect(),
                Err(e) => vec![Err(e)],
            },
        }
    })
    .map(stream::iter)
    .flatten();

    Box::pin(head.chain(body).chain(tail))
}

fn parse_line(line: &str) -> Result<Envelope> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        // The encoder never emits blank lines; one can only mean corruption.
        return Err(ProtocolError::BlankLine.into());
    }
    serde_json::from_str(trimmed).map_err(|e| {
        ProtocolError::MalformedLine {
            line: trimmed.chars().take(256).collect(),
            source: e,
        }
        .into()
    })
}

/// Parse an ND-JSON byte stream back into the tagged envelope sequence.
///
/// A malformed line surfaces as a hard error at the exact point encountered,
/// after which the stream ends; envelopes delivered before it remain valid.
pub fn decode(input: BoxStream<'static, Bytes>) -> BoxStream<'static, Envelope> {
    let frames = frame_stream(input, Boundary::Line);

    let stream = stream::unfold((frames, false), |(mut frames, stopped)| async move {
        if stopped {
            return None;
        }
        match frames.next().await {
            Some(Ok(line)) => match parse_line(&line) {
                Ok(envelope) => Some((Ok(envelope), (frames, false))),
                Err(e) => Some((Err(e), (frames, true))),
            },
            Some(Err(e)) => Some((Err(e), (frames, true))),
            None => None,
        }
    });

    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_wire_shape_is_tagged() {
        let line = serde_json::to_string(&Envelope::Chunk(json!({"content": "A"}))).unwrap();
        assert_eq!(line, r#"{"type":"chunk","value":{"content":"A"}}"#);

        let line = serde_json::to_string(&Envelope::Data(json!([1, 2]))).unwrap();
        assert_eq!(line, r#"{"type":"data","value":[1,2]}"#);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(serde_json::from_str::<Envelope>(r#"{"type":"bogus","value":1}"#).is_err());
        assert!(serde_json::from_str::<Envelope>(r#"{"type":"chunk"}"#).is_err());
    }

    #[test]
    fn blank_line_is_a_protocol_error() {
        assert!(matches!(
            parse_line("   "),
            Err(crate::Error::Protocol(ProtocolError::BlankLine))
        ));
    }
}
