//! HTTP clients for the two external collaborators: the embedding-inference
//! endpoint and the search index. Both are reached through a shared
//! `reqwest::Client` constructed once at startup and share the same
//! bounded-timeout, single-retry policy for transient failures.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::{GeoSeekError, GeoSeekResult};
use crate::model::{EmbeddingVector, RawSearchResults};

pub mod embedding;
pub mod search;

pub use embedding::EmbeddingClient;
pub use search::SearchClient;

/// Seam for the embedding-inference collaborator.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> GeoSeekResult<EmbeddingVector>;
}

/// Seam for the search index collaborator.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, body: &Value) -> GeoSeekResult<RawSearchResults>;
}

/// Pause before the single retry of a transient upstream failure.
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

fn is_transient_status(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 502 | 503 | 504)
}

fn is_transient_transport(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// Send a request, retrying once after a short backoff when the failure is
/// transient (connect/timeout or a 502/503/504 response). The returned
/// response may still be non-success; callers map that to `UpstreamError`.
pub(crate) async fn send_with_retry<F>(
    service: &'static str,
    build: F,
) -> GeoSeekResult<reqwest::Response>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    match build().send().await {
        Ok(response) if !is_transient_status(response.status()) => return Ok(response),
        Ok(response) => {
            tracing::warn!(
                service,
                status = %response.status(),
                "transient upstream response, retrying once"
            );
        }
        Err(err) if is_transient_transport(&err) => {
            tracing::warn!(service, error = %err, "transient transport failure, retrying once");
        }
        Err(err) => return Err(GeoSeekError::from_transport(service, err)),
    }

    tokio::time::sleep(RETRY_BACKOFF).await;
    build()
        .send()
        .await
        .map_err(|err| GeoSeekError::from_transport(service, err))
}

/// Map a non-success response to `UpstreamError`, capturing the body text.
pub(crate) async fn fail_with_status(
    service: &'static str,
    response: reqwest::Response,
) -> GeoSeekError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    GeoSeekError::UpstreamError {
        service,
        status,
        message,
    }
}
