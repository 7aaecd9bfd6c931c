//! Benchmarks for the streaming decode core
//!
//! This benchmark measures:
//! - incremental frame splitting speed
//! - full byte-stream -> token decode throughput
//! - ND-JSON relay encode throughput

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use futures::StreamExt;
use tokenwire::providers::{self, Provider};
use tokenwire::wire;

/// Sample SSE frames (OpenAI format)
const SSE_FRAMES: &[&str] = &[
    r#"data: {"id":"chatcmpl-123","object":"chat.completion.chunk","created":1694268190,"model":"gpt-4o","choices":[{"index":0,"delta":{"role":"assistant","content":""},"finish_reason":null}]}"#,
    r#"data: {"id":"chatcmpl-123","object":"chat.completion.chunk","created":1694268190,"model":"gpt-4o","choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#,
    r#"data: {"id":"chatcmpl-123","object":"chat.completion.chunk","created":1694268190,"model":"gpt-4o","choices":[{"index":0,"delta":{"content":" there"},"finish_reason":null}]}"#,
    r#"data: {"id":"chatcmpl-123","object":"chat.completion.chunk","created":1694268190,"model":"gpt-4o","choices":[{"index":0,"delta":{"content":"!"},"finish_reason":null}]}"#,
    r#"data: {"id":"chatcmpl-123","object":"chat.completion.chunk","created":1694268190,"model":"gpt-4o","choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
    "data: [DONE]",
];

fn sse_body() -> String {
    let mut body = SSE_FRAMES.join("\n\n");
    body.push_str("\n\n");
    body
}

fn byte_chunks(body: &str, chunk_size: usize) -> Vec<Bytes> {
    body.as_bytes()
        .chunks(chunk_size)
        .map(Bytes::copy_from_slice)
        .collect()
}

fn bench_token_decode(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let body = sse_body();

    let mut group = c.benchmark_group("token_decode");
    group.throughput(Throughput::Bytes(body.len() as u64));

    for &chunk_size in &[16usize, 256, 4096] {
        let chunks = byte_chunks(&body, chunk_size);
        group.bench_function(format!("openai_chunk_{}", chunk_size), |b| {
            b.to_async(&rt).iter(|| {
                let chunks = chunks.clone();
                async move {
                    let input: tokenwire::BoxStream<'static, Bytes> =
                        Box::pin(futures::stream::iter(chunks.into_iter().map(Ok)));
                    let tokens: Vec<String> =
                        providers::token_stream(Provider::OpenAi, input)
                            .await
                            .unwrap()
                            .map(|r| r.unwrap())
                            .collect()
                            .await;
                    black_box(tokens)
                }
            })
        });
    }
    group.finish();
}

fn bench_wire_encode(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let values: Vec<serde_json::Value> = (0..64)
        .map(|i| serde_json::json!({"content": format!("token-{}", i)}))
        .collect();

    let mut group = c.benchmark_group("wire_encode");
    group.bench_function("encode_64_chunks", |b| {
        b.to_async(&rt).iter(|| {
            let values = values.clone();
            async move {
                let input: tokenwire::BoxStream<'static, serde_json::Value> =
                    Box::pin(futures::stream::iter(values.into_iter().map(Ok)));
                let lines: Vec<Bytes> = wire::encode(input, None)
                    .map(|r| r.unwrap())
                    .collect()
                    .await;
                black_box(lines)
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_token_decode, bench_wire_encode);
criterion_main!(benches);
