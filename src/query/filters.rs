use chrono::Utc;
use serde_json::{json, Value};

use crate::model::{BoundingBox, SortField, SortOrder, SpatialRelation};

// ---------------------------------------------------------------------------
// Filter clause builders
// ---------------------------------------------------------------------------

/// Build a geo_shape envelope filter for a bounding box. Envelope corners are
/// upper-left then lower-right, per the index's geo_shape contract.
pub fn spatial_filter(geo_field: &str, bbox: &BoundingBox, relation: SpatialRelation) -> Value {
    json!({
        "geo_shape": {
            geo_field: {
                "shape": {
                    "type": "envelope",
                    "coordinates": [[bbox.west, bbox.north], [bbox.east, bbox.south]]
                },
                "relation": relation.as_str()
            }
        }
    })
}

/// Build range filters for a publication-date window. Partial dates are
/// widened to cover the whole year or month; `present` means today.
pub fn date_filters(field: &str, begin: Option<&str>, end: Option<&str>) -> Vec<Value> {
    let mut clauses = Vec::new();

    if let Some(begin) = begin {
        let begin = match begin.len() {
            4 => format!("{begin}-01-01"),
            7 => format!("{begin}-01"),
            _ => begin.to_string(),
        };
        clauses.push(json!({ "range": { field: { "gte": begin } } }));
    }

    if let Some(end) = end {
        let end = if end.eq_ignore_ascii_case("present") {
            Utc::now().format("%Y-%m-%d").to_string()
        } else {
            match end.len() {
                4 => format!("{end}-12-31"),
                7 => format!("{end}-31"),
                _ => end.to_string(),
            }
        };
        clauses.push(json!({ "range": { field: { "lte": end } } }));
    }

    clauses
}

/// Build a wildcard OR filter over one or more field paths for a
/// comma-separated value list (multi-selection).
pub fn wildcard_filter(field_paths: &[&str], values: &str) -> Value {
    let should: Vec<Value> = values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .flat_map(|value| {
            field_paths.iter().map(move |path| {
                let path = *path;
                json!({ "wildcard": { path: { "value": format!("*{value}*") } } })
            })
        })
        .collect();

    json!({ "bool": { "should": should, "minimum_should_match": 1 } })
}

/// Exact-match filter on a keyword field.
pub fn term_filter(field: &str, value: &Value) -> Value {
    json!({ "term": { field: value } })
}

// ---------------------------------------------------------------------------
// Sort clause builder
// ---------------------------------------------------------------------------

/// Build the sort parameter. Relevance sorting is forced descending; when no
/// sort is requested, order by score with an explicit tie-break on the
/// configured recency field (descending).
pub fn sort_clauses(
    sort: Option<SortField>,
    order: SortOrder,
    tie_breaker_field: &str,
) -> Vec<Value> {
    match sort {
        None => vec![
            json!({ "_score": { "order": "desc" } }),
            json!({ tie_breaker_field: { "order": "desc" } }),
        ],
        Some(SortField::Relevancy) => vec![json!({ "_score": { "order": "desc" } })],
        Some(field) => {
            let index_field = field.index_field();
            vec![json!({ index_field: { "order": order.as_str() } })]
        }
    }
}
