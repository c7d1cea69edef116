use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::client::{fail_with_status, send_with_retry, SearchBackend};
use crate::config::SearchConfig;
use crate::error::{GeoSeekError, GeoSeekResult};
use crate::model::{RawSearchResults, SearchHit};

// ---------------------------------------------------------------------------
// Search Gateway Client: composed query in, ranked hits + total out
// ---------------------------------------------------------------------------

/// Client for the search index collaborator. Sends the composed query body
/// to `{endpoint}/{index}/_search` with optional basic auth.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    search_url: Url,
    username: Option<String>,
    password: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    hits: WireHits,
}

#[derive(Debug, Deserialize)]
struct WireHits {
    total: WireTotal,
    hits: Vec<SearchHit>,
}

/// Newer index versions report the total as an object, older ones as a bare
/// integer.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireTotal {
    Tracked { value: u64 },
    Legacy(u64),
}

impl WireTotal {
    fn value(&self) -> u64 {
        match self {
            WireTotal::Tracked { value } => *value,
            WireTotal::Legacy(value) => *value,
        }
    }
}

impl SearchClient {
    pub fn new(http: reqwest::Client, config: &SearchConfig) -> GeoSeekResult<Self> {
        let mut base = config.endpoint.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let search_url = Url::parse(&base)?.join(&format!("{}/_search", config.index))?;

        Ok(Self {
            http,
            search_url,
            username: config.username.clone(),
            password: config.password.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn search(&self, body: &Value) -> GeoSeekResult<RawSearchResults> {
        let response = send_with_retry("search", || {
            let mut request = self
                .http
                .post(self.search_url.clone())
                .timeout(self.timeout)
                .json(body);
            if let Some(username) = &self.username {
                request = request.basic_auth(username, self.password.as_deref());
            }
            request
        })
        .await?;

        if !response.status().is_success() {
            return Err(fail_with_status("search", response).await);
        }

        let wire: WireResponse =
            response
                .json()
                .await
                .map_err(|err| GeoSeekError::UpstreamUnavailable {
                    service: "search",
                    reason: format!("malformed search response: {err}"),
                })?;

        let results = RawSearchResults {
            total_hits: wire.hits.total.value(),
            hits: wire.hits.hits,
        };
        tracing::debug!(
            total_hits = results.total_hits,
            returned = results.hits.len(),
            "search results received"
        );
        Ok(results)
    }
}
