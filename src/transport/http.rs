//! Thin HTTP opener for streaming response bodies.
//!
//! Request construction, authentication and retry policy belong to callers;
//! this layer only turns a response body into the crate's byte-stream shape
//! and surfaces non-success statuses — with body detail — before any
//! decoding starts.

use crate::{BoxStream, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use std::env;
use std::time::Duration;
use url::Url;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::Other(format!("invalid base url {:?}: {}", base_url, e)))?;

        // Minimal production-friendly defaults (env-overridable).
        let timeout_secs = env::var("TOKENWIRE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(120);

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(
                env::var("TOKENWIRE_HTTP_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(10),
            ))
            // Overall timeout covers the whole body; generation streams are
            // long-lived, so it is generous and callers layer tighter limits
            // via cancellation plus an external timer.
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// POST a JSON body and return the response body as a raw byte stream.
    ///
    /// A non-success status is surfaced immediately as
    /// [`TransportError::Status`], carrying the response body, before any
    /// decoding can start.
    pub async fn open_stream(
        &self,
        path: &str,
        request_body: &serde_json::Value,
    ) -> Result<BoxStream<'static, Bytes>> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| TransportError::Other(format!("invalid path {:?}: {}", path, e)))?;

        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(%url, %request_id, "opening streaming request");

        let response = self
            .client
            .post(url)
            .json(request_body)
            .header("accept", "text/event-stream")
            // Correlation id. Providers may ignore it, but applications can
            // use it for linkage.
            .header("x-request-id", &request_id)
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %request_id, "streaming request rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let byte_stream = response
            .bytes_stream()
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)));
        Ok(Box::pin(byte_stream))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Other(String),
}
