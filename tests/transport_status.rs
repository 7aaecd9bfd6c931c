//! Transport boundary tests: non-success statuses surface before decoding,
//! success bodies stream through the provider decoders.

use futures::StreamExt;
use serde_json::json;
use tokenwire::providers::{self, Provider};
use tokenwire::transport::{HttpTransport, TransportError};

#[tokio::test]
async fn non_success_status_surfaces_with_body_detail() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_body("{\"error\":\"rate limited\"}")
        .create_async()
        .await;

    let transport = HttpTransport::new(&server.url()).unwrap();
    let result = transport
        .open_stream("/v1/chat/completions", &json!({"stream": true}))
        .await;

    match result {
        Err(tokenwire::Error::Transport(TransportError::Status { status, body })) => {
            assert_eq!(status, 429);
            assert!(body.contains("rate limited"));
        }
        other => panic!("expected status error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn success_body_decodes_through_the_pipeline() {
    let sse_body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"},\"index\":0}]}\n\n",
        "data: [DONE]\n\n",
    );

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse_body)
        .create_async()
        .await;

    let transport = HttpTransport::new(&server.url()).unwrap();
    let bytes = transport
        .open_stream("/v1/chat/completions", &json!({"stream": true}))
        .await
        .unwrap();

    let tokens: Vec<String> = providers::token_stream(Provider::OpenAi, bytes)
        .await
        .unwrap()
        .map(|r| r.unwrap())
        .collect()
        .await;
    assert_eq!(tokens, vec!["Hi"]);
}
