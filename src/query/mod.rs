use serde_json::{json, Value};

use crate::error::{GeoSeekError, GeoSeekResult};
use crate::model::{EmbeddingVector, SearchMethod, SearchRequest};

pub mod filters;

// ---------------------------------------------------------------------------
// Search Query Builder: composes the request body for the index collaborator
// ---------------------------------------------------------------------------

/// Index field holding the record geometry.
const GEO_FIELD: &str = "coordinates";
/// Index field holding the record publication date.
const DATE_FIELD: &str = "published";
/// Text fields targeted by keyword search.
const KEYWORD_FIELDS: &[&str] = &[
    "topicCategory",
    "keywords",
    "description",
    "title*",
    "organisation",
    "systemName",
];
/// Organisation fields targeted by the org wildcard filter.
const ORG_FIELDS: &[&str] = &["organisation.keyword"];

/// Build the full search body: the ranking clause (KNN or multi_match),
/// conjoined filters, pagination, and sort.
pub fn build_search_body(
    request: &SearchRequest,
    embedding: Option<&EmbeddingVector>,
    tie_breaker_field: &str,
) -> GeoSeekResult<Value> {
    let filter = build_filter_clauses(request);

    let must = match request.method {
        SearchMethod::SemanticSearch => {
            let embedding = embedding.ok_or_else(|| {
                GeoSeekError::Internal(
                    "semantic search reached the query builder without an embedding".to_string(),
                )
            })?;
            // k must cover the requested page even when paginating.
            json!({
                "knn": {
                    "vector": {
                        "vector": embedding.values(),
                        "k": request.from + request.size
                    }
                }
            })
        }
        SearchMethod::KeywordSearch => match &request.q {
            Some(q) => json!({
                "multi_match": {
                    "query": q,
                    "fields": KEYWORD_FIELDS
                }
            }),
            None => json!({ "match_all": {} }),
        },
    };

    let mut body = json!({
        "size": request.size,
        "from": request.from,
        "_source": { "excludes": ["vector"] },
        "query": {
            "bool": {
                "must": must,
                "filter": filter
            }
        },
        "sort": filters::sort_clauses(request.sort, request.order, tie_breaker_field)
    });

    if request.method == SearchMethod::KeywordSearch {
        body["highlight"] = json!({ "fields": { "description": {} } });
    }

    Ok(body)
}

/// Non-vector filter clauses shared by both search methods.
fn build_filter_clauses(request: &SearchRequest) -> Vec<Value> {
    let mut filter = Vec::new();

    if let Some(bbox) = &request.bbox {
        filter.push(filters::spatial_filter(GEO_FIELD, bbox, request.relation));
    }

    filter.extend(filters::date_filters(
        DATE_FIELD,
        request.begin.as_deref(),
        request.end.as_deref(),
    ));

    if let Some(org) = &request.org {
        filter.push(filters::wildcard_filter(ORG_FIELDS, org));
    }
    if let Some(record_type) = &request.record_type {
        filter.push(filters::term_filter("type.keyword", &json!(record_type)));
    }
    if let Some(theme) = &request.theme {
        filter.push(filters::term_filter("topicCategory.keyword", &json!(theme)));
    }
    if let Some(foundational) = request.foundational {
        filter.push(filters::term_filter("foundational", &json!(foundational)));
    }
    if let Some(source_system) = &request.source_system {
        filter.push(filters::term_filter(
            "systemName.keyword",
            &json!(source_system),
        ));
    }
    if let Some(eo_collection) = &request.eo_collection {
        filter.push(filters::term_filter(
            "eoCollection.keyword",
            &json!(eo_collection),
        ));
    }
    if let Some(polarization) = &request.polarization {
        filter.push(filters::term_filter(
            "eoFilters.polarization.keyword",
            &json!(polarization),
        ));
    }
    if let Some(orbit_direction) = &request.orbit_direction {
        filter.push(filters::term_filter(
            "eoFilters.orbitDirection.keyword",
            &json!(orbit_direction),
        ));
    }

    filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request(pairs: &[(&str, &str)]) -> SearchRequest {
        let params: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SearchRequest::from_params(&params).unwrap()
    }

    #[test]
    fn test_semantic_body_carries_knn_clause() {
        let req = request(&[("method", "SemanticSearch"), ("q", "wildfire"), ("size", "5")]);
        let embedding = EmbeddingVector::new(vec![0.1, 0.2, 0.3], None).unwrap();
        let body = build_search_body(&req, Some(&embedding), "published").unwrap();

        let knn = &body["query"]["bool"]["must"]["knn"]["vector"];
        assert_eq!(knn["k"], 5);
        assert_eq!(knn["vector"].as_array().unwrap().len(), 3);
        assert_eq!(body["size"], 5);
        assert_eq!(body["from"], 0);
        assert_eq!(body["_source"]["excludes"][0], "vector");
    }

    #[test]
    fn test_semantic_knn_k_covers_pagination() {
        let req = request(&[
            ("method", "SemanticSearch"),
            ("q", "wildfire"),
            ("size", "10"),
            ("from", "20"),
        ]);
        let embedding = EmbeddingVector::new(vec![0.1], None).unwrap();
        let body = build_search_body(&req, Some(&embedding), "published").unwrap();
        assert_eq!(body["query"]["bool"]["must"]["knn"]["vector"]["k"], 30);
        assert_eq!(body["from"], 20);
    }

    #[test]
    fn test_semantic_without_embedding_is_internal_error() {
        let req = request(&[("method", "SemanticSearch"), ("q", "wildfire")]);
        let err = build_search_body(&req, None, "published").unwrap_err();
        assert!(matches!(err, GeoSeekError::Internal(_)));
    }

    #[test]
    fn test_keyword_body_uses_multi_match() {
        let req = request(&[("method", "KeywordSearch"), ("q", "hydrography")]);
        let body = build_search_body(&req, None, "published").unwrap();

        let multi_match = &body["query"]["bool"]["must"]["multi_match"];
        assert_eq!(multi_match["query"], "hydrography");
        assert!(multi_match["fields"]
            .as_array()
            .unwrap()
            .contains(&json!("description")));
        assert!(body["highlight"]["fields"]["description"].is_object());
    }

    #[test]
    fn test_keyword_without_query_matches_all() {
        let req = request(&[("method", "KeywordSearch")]);
        let body = build_search_body(&req, None, "published").unwrap();
        assert!(body["query"]["bool"]["must"]["match_all"].is_object());
    }

    #[test]
    fn test_filters_are_conjoined() {
        let req = request(&[
            ("method", "KeywordSearch"),
            ("q", "roads"),
            ("bbox", "-141,60,-123.8,69.7"),
            ("relation", "within"),
            ("begin", "2020"),
            ("org", "nrcan"),
            ("type", "dataset"),
            ("theme", "transport"),
            ("foundational", "true"),
        ]);
        let body = build_search_body(&req, None, "published").unwrap();

        let filter = body["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filter.len(), 6);
        assert_eq!(
            filter[0]["geo_shape"]["coordinates"]["relation"],
            "within"
        );
        assert_eq!(filter[1]["range"]["published"]["gte"], "2020-01-01");
        assert_eq!(filter[3]["term"]["type.keyword"], "dataset");
        assert_eq!(filter[5]["term"]["foundational"], true);
    }

    #[test]
    fn test_default_sort_breaks_ties_on_recency() {
        let req = request(&[("method", "SemanticSearch"), ("q", "wildfire")]);
        let embedding = EmbeddingVector::new(vec![0.1], None).unwrap();
        let body = build_search_body(&req, Some(&embedding), "published").unwrap();

        let sort = body["sort"].as_array().unwrap();
        assert_eq!(sort[0]["_score"]["order"], "desc");
        assert_eq!(sort[1]["published"]["order"], "desc");
    }
}
