use std::collections::HashMap;
use std::sync::Arc;

use crate::client::{Embedder, EmbeddingClient, SearchBackend, SearchClient};
use crate::config::{AppConfig, PipelineConfig};
use crate::error::{GeoSeekError, GeoSeekResult};
use crate::format::format_response;
use crate::model::{SearchMethod, SearchRequest, SearchResponse};
use crate::query::build_search_body;

// ---------------------------------------------------------------------------
// Search Pipeline: normalize -> embed -> build -> search -> format
// ---------------------------------------------------------------------------

/// The request pipeline. Holds the two collaborator handles behind trait
/// objects; each request runs the strictly linear five-stage flow and shares
/// no mutable state with concurrent requests.
pub struct SearchPipeline {
    embedder: Arc<dyn Embedder>,
    backend: Arc<dyn SearchBackend>,
    config: PipelineConfig,
}

impl SearchPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        backend: Arc<dyn SearchBackend>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            backend,
            config,
        }
    }

    /// Wire up the HTTP collaborators from configuration. The shared
    /// `reqwest::Client` is the only process-wide resource and is created
    /// here, explicitly, once.
    pub fn from_config(config: &AppConfig) -> GeoSeekResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| GeoSeekError::ConfigError(format!("http client setup: {err}")))?;

        let embedder = EmbeddingClient::new(http.clone(), &config.embedding)?;
        let backend = SearchClient::new(http, &config.search)?;

        Ok(Self::new(
            Arc::new(embedder),
            Arc::new(backend),
            config.pipeline.clone(),
        ))
    }

    /// Normalize raw query parameters and run the pipeline.
    pub async fn execute_params(
        &self,
        params: &HashMap<String, String>,
    ) -> GeoSeekResult<SearchResponse> {
        let request = SearchRequest::from_params(params)?;
        self.execute(request).await
    }

    /// Run a normalized request through the pipeline. All-or-nothing: any
    /// stage failure fails the whole request, no partial results.
    pub async fn execute(&self, mut request: SearchRequest) -> GeoSeekResult<SearchResponse> {
        if request.size > self.config.max_size {
            tracing::debug!(
                requested = request.size,
                max = self.config.max_size,
                "clamping page size"
            );
            request.size = self.config.max_size;
        }

        let embedding = match request.method {
            SearchMethod::SemanticSearch => {
                let q = request.q.as_deref().filter(|q| !q.trim().is_empty()).ok_or_else(
                    || {
                        GeoSeekError::InvalidRequest(
                            "SemanticSearch requires a non-empty 'q' parameter".to_string(),
                        )
                    },
                )?;
                Some(self.embedder.embed(q).await?)
            }
            SearchMethod::KeywordSearch => None,
        };

        let body = build_search_body(&request, embedding.as_ref(), &self.config.tie_breaker_field)?;
        tracing::debug!(method = %request.method, "dispatching search query");

        let results = self.backend.search(&body).await?;

        Ok(format_response(request.method, results, request.from))
    }
}
