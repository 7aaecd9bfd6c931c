//! Encode a value sequence over the relay protocol and decode it back,
//! printing the tagged envelopes.
//!
//! Run with: `cargo run --example ndjson_roundtrip`

use anyhow::Result;
use futures::StreamExt;
use serde_json::json;
use tokenwire::wire::{self, SideData};

#[tokio::main]
async fn main() -> Result<()> {
    let values = vec![
        json!({"content": "A"}),
        json!({"content": " Nd"}),
        json!({"content": "Json"}),
        json!({"content": " stream"}),
    ];
    let input: tokenwire::BoxStream<'static, serde_json::Value> =
        Box::pin(futures::stream::iter(values.into_iter().map(Ok)));

    let side = SideData::Ready(vec![json!({"request_id": "demo-42"})]);
    let encoded = wire::encode(input, Some(side));

    let mut envelopes = wire::decode(encoded);
    while let Some(envelope) = envelopes.next().await {
        println!("{:?}", envelope?);
    }

    Ok(())
}
