use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Raw search results as returned by the index collaborator
// ---------------------------------------------------------------------------

/// One ranked hit from the search index: the document id, its score, and the
/// raw source document (geometry under `coordinates`, stored vector, and all
/// catalogue attributes).
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: Map<String, Value>,
}

/// The hit page plus the total match count, straight off the wire.
#[derive(Debug, Clone)]
pub struct RawSearchResults {
    pub total_hits: u64,
    pub hits: Vec<SearchHit>,
}

// ---------------------------------------------------------------------------
// GeoJSON response schema
// ---------------------------------------------------------------------------

/// A GeoJSON Feature: the record's geometry plus its catalogue attributes,
/// with `row_num` and `relevancy` prepended to the properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub geometry: Value,
    pub properties: Map<String, Value>,
}

/// Each hit is wrapped in its own single-feature FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn single(feature: Feature) -> Self {
        Self {
            collection_type: "FeatureCollection".to_string(),
            features: vec![feature],
        }
    }
}

/// Body of the search response: counts plus the formatted items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseBody {
    pub total_hits: u64,
    pub returned_hits: usize,
    pub items: Vec<FeatureCollection>,
}

/// The final response envelope: the method echoed back plus the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub method: String,
    pub response: ResponseBody,
}
