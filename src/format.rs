use serde_json::{Map, Value};

use crate::model::{
    Feature, FeatureCollection, RawSearchResults, ResponseBody, SearchHit, SearchMethod,
    SearchResponse,
};

// ---------------------------------------------------------------------------
// Response Formatter: raw hits -> GeoJSON feature collections
// ---------------------------------------------------------------------------

/// Reshape raw search results into the response envelope. Each hit becomes a
/// single-feature FeatureCollection: geometry lifted out of the source
/// document, the stored vector stripped, and `row_num` / `relevancy`
/// prepended to the remaining attributes. Pure and idempotent.
pub fn format_response(
    method: SearchMethod,
    results: RawSearchResults,
    from: usize,
) -> SearchResponse {
    let total_hits = results.total_hits;
    let items: Vec<FeatureCollection> = results
        .hits
        .into_iter()
        .enumerate()
        .map(|(position, hit)| {
            let row_num = from + position + 1;
            FeatureCollection::single(format_hit(hit, row_num))
        })
        .collect();

    SearchResponse {
        method: method.as_str().to_string(),
        response: ResponseBody {
            total_hits,
            returned_hits: items.len(),
            items,
        },
    }
}

fn format_hit(hit: SearchHit, row_num: usize) -> Feature {
    let mut source = hit.source;
    let geometry = source.remove("coordinates").unwrap_or(Value::Null);
    source.remove("vector");

    // row_num and relevancy lead the properties, then id, then the rest.
    let mut properties = Map::new();
    properties.insert("row_num".to_string(), Value::from(row_num));
    properties.insert(
        "relevancy".to_string(),
        hit.score.map(Value::from).unwrap_or(Value::Null),
    );
    if !source.contains_key("id") {
        properties.insert("id".to_string(), Value::from(hit.id));
    }
    properties.extend(source);

    Feature {
        feature_type: "Feature".to_string(),
        geometry,
        properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(id: &str, score: f64, source: Value) -> SearchHit {
        SearchHit {
            id: id.to_string(),
            score: Some(score),
            source: source.as_object().cloned().unwrap_or_default(),
        }
    }

    fn sample_results() -> RawSearchResults {
        RawSearchResults {
            total_hits: 12,
            hits: vec![
                hit(
                    "a1",
                    0.91,
                    json!({
                        "id": "a1",
                        "title": "Wildfire Information",
                        "description": "Active wildfire perimeters",
                        "coordinates": { "type": "Polygon", "coordinates": [] },
                        "vector": [0.1, 0.2],
                        "published": "2023-06-01"
                    }),
                ),
                hit(
                    "b2",
                    0.74,
                    json!({
                        "id": "b2",
                        "title": "Burned Areas",
                        "coordinates": { "type": "Point", "coordinates": [0.0, 0.0] }
                    }),
                ),
            ],
        }
    }

    #[test]
    fn test_envelope_counts() {
        let response = format_response(SearchMethod::SemanticSearch, sample_results(), 0);
        assert_eq!(response.method, "SemanticSearch");
        assert_eq!(response.response.total_hits, 12);
        assert_eq!(response.response.returned_hits, 2);
        assert!(response.response.returned_hits as u64 <= response.response.total_hits);
    }

    #[test]
    fn test_hit_becomes_single_feature_collection() {
        let response = format_response(SearchMethod::SemanticSearch, sample_results(), 0);
        let collection = &response.response.items[0];
        assert_eq!(collection.collection_type, "FeatureCollection");
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        assert_eq!(feature.feature_type, "Feature");
        assert_eq!(feature.geometry["type"], "Polygon");
        assert_eq!(feature.properties["row_num"], 1);
        assert_eq!(feature.properties["relevancy"], 0.91);
        assert_eq!(feature.properties["id"], "a1");
        assert_eq!(feature.properties["title"], "Wildfire Information");
    }

    #[test]
    fn test_vector_is_stripped() {
        let response = format_response(SearchMethod::SemanticSearch, sample_results(), 0);
        let feature = &response.response.items[0].features[0];
        assert!(!feature.properties.contains_key("vector"));
        assert!(!feature.properties.contains_key("coordinates"));
    }

    #[test]
    fn test_row_num_is_global_rank() {
        let response = format_response(SearchMethod::SemanticSearch, sample_results(), 20);
        let items = &response.response.items;
        assert_eq!(items[0].features[0].properties["row_num"], 21);
        assert_eq!(items[1].features[0].properties["row_num"], 22);
    }

    #[test]
    fn test_relevancy_order_is_preserved() {
        let response = format_response(SearchMethod::SemanticSearch, sample_results(), 0);
        let scores: Vec<f64> = response
            .response
            .items
            .iter()
            .map(|item| item.features[0].properties["relevancy"].as_f64().unwrap())
            .collect();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn test_missing_id_falls_back_to_hit_id() {
        let results = RawSearchResults {
            total_hits: 1,
            hits: vec![hit("doc-9", 0.5, json!({ "title": "Untitled" }))],
        };
        let response = format_response(SearchMethod::KeywordSearch, results, 0);
        let feature = &response.response.items[0].features[0];
        assert_eq!(feature.properties["id"], "doc-9");
        assert!(feature.geometry.is_null());
    }
}
