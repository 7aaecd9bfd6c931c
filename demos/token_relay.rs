//! Decode a canned OpenAI-style SSE stream into tokens, then relay them to
//! stdout as ND-JSON lines — the full pipeline minus the network.
//!
//! Run with: `cargo run --example token_relay`

use anyhow::Result;
use bytes::Bytes;
use futures::StreamExt;
use serde_json::json;
use tokenwire::providers::{self, Provider};
use tokenwire::wire::{self, SideData};

const FIXTURE: &str = concat!(
    "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"},\"index\":0}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"},\"index\":0}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\", streaming\"},\"index\":0}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\" world!\"},\"index\":0}]}\n\n",
    "data: [DONE]\n\n",
);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Simulate network arrival in awkward 7-byte reads.
    let reads: Vec<Bytes> = FIXTURE
        .as_bytes()
        .chunks(7)
        .map(Bytes::copy_from_slice)
        .collect();
    let bytes: tokenwire::BoxStream<'static, Bytes> =
        Box::pin(futures::stream::iter(reads.into_iter().map(Ok)));

    let tokens = providers::token_stream(Provider::OpenAi, bytes).await?;
    let values = Box::pin(tokens.map(|r| r.map(|t| json!({ "content": t }))));

    // Side data resolved after generation: emitted after the chunk lines.
    let side = SideData::Deferred(Box::pin(async {
        Ok(vec![json!({"sources": ["doc-1", "doc-7"]})])
    }));

    let mut lines = wire::encode(values, Some(side));
    while let Some(line) = lines.next().await {
        print!("{}", String::from_utf8_lossy(&line?));
    }

    Ok(())
}
