use serde::{Deserialize, Serialize};

use crate::error::{GeoSeekError, GeoSeekResult};

// ---------------------------------------------------------------------------
// EmbeddingVector: dense vector representation of the query text
// ---------------------------------------------------------------------------

/// A fixed-dimension embedding of the query text, produced once per request
/// by the external inference endpoint and consumed by the KNN query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    values: Vec<f32>,
}

impl EmbeddingVector {
    /// Wrap raw values from the inference endpoint, checking the expected
    /// dimensionality when one is configured.
    pub fn new(values: Vec<f32>, expected_dimensions: Option<usize>) -> GeoSeekResult<Self> {
        if values.is_empty() {
            return Err(GeoSeekError::UpstreamUnavailable {
                service: "embedding",
                reason: "inference endpoint returned an empty vector".to_string(),
            });
        }
        if let Some(expected) = expected_dimensions {
            if values.len() != expected {
                return Err(GeoSeekError::UpstreamUnavailable {
                    service: "embedding",
                    reason: format!(
                        "dimension mismatch: expected {expected}, got {}",
                        values.len()
                    ),
                });
            }
        }
        Ok(Self { values })
    }

    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
