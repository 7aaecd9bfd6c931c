//! # tokenwire
//!
//! Streaming decode layer for LLM provider APIs.
//!
//! Provider APIs stream generation results over HTTP with incompatible
//! incremental wire framings: OpenAI-compatible endpoints use blank-line
//! terminated `data: <json>` SSE frames with a literal `[DONE]` sentinel,
//! Anthropic uses CRLF-separated `event:`/`data:` pairs, Cohere and Ollama
//! emit one JSON object per line. Network reads hand those framings to us as
//! arbitrarily-chunked byte blocks whose boundaries carry no meaning.
//!
//! This crate turns such byte streams into a normalized, ordered sequence of
//! text tokens, and ships a companion ND-JSON relay protocol that
//! re-serializes a token/chunk sequence (plus optional side-channel data) for
//! a downstream client.
//!
//! ## Pipeline
//!
//! ```text
//! Raw Bytes → Frame Decoder → Token Extractor → (optional) ND-JSON encode
//!     │             │                │                      │
//!   HTTP       boundary scan     per-provider        {"type":"chunk",
//!   body       + frame parse     pure functions       "value":...}\n
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decode`] | Generic incremental frame decoder (boundary rule + parse fn) |
//! | [`providers`] | Per-provider framing/extraction rules and stream entry points |
//! | [`wire`] | ND-JSON relay protocol (encode/decode with side-channel data) |
//! | [`adapter`] | Push/pull bridging between byte sources and lazy streams |
//! | [`cancel`] | Cooperative cancellation of in-flight streams |
//! | [`transport`] | Thin HTTP byte-stream opener (input boundary) |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tokenwire::providers::{self, Provider};
//! use futures::StreamExt;
//!
//! # async fn run(bytes: tokenwire::BoxStream<'static, bytes::Bytes>) -> tokenwire::Result<()> {
//! let mut tokens = providers::token_stream(Provider::OpenAi, bytes).await?;
//! while let Some(token) = tokens.next().await {
//!     print!("{}", token?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod cancel;
pub mod decode;
pub mod providers;
pub mod transport;
pub mod wire;

// Re-export main types for convenience
pub use cancel::{cancel_pair, CancelHandle, ControlledStream};
pub use decode::{Boundary, Decoder, FrameDecoder, Parsed};
pub use providers::Provider;
pub use wire::{Envelope, SideData};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
