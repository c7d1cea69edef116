use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::GeoSeekError;
use crate::model::SearchResponse;
use crate::server::AppState;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<GeoSeekError> for ApiError {
    fn from(err: GeoSeekError) -> Self {
        let status = match &err {
            GeoSeekError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GeoSeekError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GeoSeekError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "search request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// GET /search-opensearch: run the full search pipeline over the raw query
/// parameters and return the GeoJSON response envelope.
pub async fn search_opensearch(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SearchResponse>, ApiError> {
    let response = state.pipeline.execute_params(&params).await?;
    Ok(Json(response))
}
