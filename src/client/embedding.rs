use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::client::{fail_with_status, send_with_retry, Embedder};
use crate::config::EmbeddingConfig;
use crate::error::{GeoSeekError, GeoSeekResult};
use crate::model::EmbeddingVector;

// ---------------------------------------------------------------------------
// Embedding Client: text in, fixed-length vector out
// ---------------------------------------------------------------------------

/// Client for the embedding-inference endpoint. The contract is plain text
/// in, a JSON float array out.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    http: reqwest::Client,
    endpoint: Url,
    expected_dimensions: Option<usize>,
    timeout: Duration,
}

/// The inference container returns either a flat vector or a singly nested
/// one (a one-row matrix); both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingPayload {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}

impl EmbeddingClient {
    pub fn new(http: reqwest::Client, config: &EmbeddingConfig) -> GeoSeekResult<Self> {
        let endpoint = Url::parse(&config.endpoint)?;
        Ok(Self {
            http,
            endpoint,
            expected_dimensions: config.expected_dimensions,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> GeoSeekResult<EmbeddingVector> {
        let response = send_with_retry("embedding", || {
            self.http
                .post(self.endpoint.clone())
                .header(CONTENT_TYPE, "text/plain")
                .timeout(self.timeout)
                .body(text.to_string())
        })
        .await?;

        if !response.status().is_success() {
            return Err(fail_with_status("embedding", response).await);
        }

        let payload: EmbeddingPayload =
            response
                .json()
                .await
                .map_err(|err| GeoSeekError::UpstreamUnavailable {
                    service: "embedding",
                    reason: format!("malformed inference response: {err}"),
                })?;

        let values = match payload {
            EmbeddingPayload::Flat(values) => values,
            EmbeddingPayload::Nested(mut rows) => {
                if rows.is_empty() {
                    return Err(GeoSeekError::UpstreamUnavailable {
                        service: "embedding",
                        reason: "inference endpoint returned no rows".to_string(),
                    });
                }
                rows.swap_remove(0)
            }
        };

        let vector = EmbeddingVector::new(values, self.expected_dimensions)?;
        tracing::debug!(dimensions = vector.dimensions(), "embedding received");
        Ok(vector)
    }
}
