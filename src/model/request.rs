use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{GeoSeekError, GeoSeekResult};

// ---------------------------------------------------------------------------
// Search request: normalized form of the raw query parameters
// ---------------------------------------------------------------------------

/// How the search should be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMethod {
    SemanticSearch,
    KeywordSearch,
}

impl SearchMethod {
    pub fn parse(value: &str) -> GeoSeekResult<Self> {
        match value {
            "SemanticSearch" => Ok(SearchMethod::SemanticSearch),
            "KeywordSearch" => Ok(SearchMethod::KeywordSearch),
            other => Err(GeoSeekError::InvalidRequest(format!(
                "unrecognized method '{other}'; expected 'SemanticSearch' or 'KeywordSearch'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMethod::SemanticSearch => "SemanticSearch",
            SearchMethod::KeywordSearch => "KeywordSearch",
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spatial relation between a record's geometry and the request bbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpatialRelation {
    Intersects,
    Disjoint,
    Contains,
    Within,
}

impl SpatialRelation {
    pub fn parse(value: &str) -> GeoSeekResult<Self> {
        match value {
            "intersects" => Ok(SpatialRelation::Intersects),
            "disjoint" => Ok(SpatialRelation::Disjoint),
            "contains" => Ok(SpatialRelation::Contains),
            "within" => Ok(SpatialRelation::Within),
            other => Err(GeoSeekError::InvalidRequest(format!(
                "unsupported relation '{other}'; must be one of intersects, disjoint, contains, within"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpatialRelation::Intersects => "intersects",
            SpatialRelation::Disjoint => "disjoint",
            SpatialRelation::Contains => "contains",
            SpatialRelation::Within => "within",
        }
    }
}

/// Catalogue language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub fn parse(value: &str) -> GeoSeekResult<Self> {
        match value {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            other => Err(GeoSeekError::InvalidRequest(format!(
                "unsupported lang '{other}'; must be 'en' or 'fr'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

/// User-facing sort keys and the index fields they map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Relevancy,
    Date,
    Popularity,
    Title,
}

impl SortField {
    pub fn parse(value: &str) -> GeoSeekResult<Self> {
        match value {
            "relevancy" | "_score" => Ok(SortField::Relevancy),
            "date" => Ok(SortField::Date),
            "popularity" => Ok(SortField::Popularity),
            "title" => Ok(SortField::Title),
            other => Err(GeoSeekError::InvalidRequest(format!(
                "unsupported sort field '{other}'; must be one of relevancy, date, popularity, title"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Relevancy => "relevancy",
            SortField::Date => "date",
            SortField::Popularity => "popularity",
            SortField::Title => "title",
        }
    }

    /// The index field this sort key addresses.
    pub fn index_field(&self) -> &'static str {
        match self {
            SortField::Relevancy => "_score",
            SortField::Date => "published",
            SortField::Popularity => "popularity",
            SortField::Title => "title.keyword",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> GeoSeekResult<Self> {
        match value {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(GeoSeekError::InvalidRequest(format!(
                "unsupported order '{other}'; must be 'asc' or 'desc'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A geographic bounding box in west, south, east, north order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Parse a comma-separated `west,south,east,north` string.
    pub fn parse(value: &str) -> GeoSeekResult<Self> {
        let coords: Vec<f64> = value
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| {
                GeoSeekError::InvalidRequest(
                    "invalid bbox: expected four comma-separated numbers \
                     west,south,east,north"
                        .to_string(),
                )
            })?;

        if coords.len() != 4 {
            return Err(GeoSeekError::InvalidRequest(format!(
                "invalid bbox: expected four coordinates, got {}",
                coords.len()
            )));
        }

        let bbox = BoundingBox {
            west: coords[0],
            south: coords[1],
            east: coords[2],
            north: coords[3],
        };

        if !(-180.0..=180.0).contains(&bbox.west) || !(-180.0..=180.0).contains(&bbox.east) {
            return Err(GeoSeekError::InvalidRequest(
                "invalid bbox: longitude values must be between -180 and 180".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&bbox.south) || !(-90.0..=90.0).contains(&bbox.north) {
            return Err(GeoSeekError::InvalidRequest(
                "invalid bbox: latitude values must be between -90 and 90".to_string(),
            ));
        }

        Ok(bbox)
    }

    pub fn to_param(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

/// A fully normalized search request. Every recognized query parameter is
/// enumerated here; `method` is the only mandatory one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub method: SearchMethod,
    pub q: Option<String>,
    pub bbox: Option<BoundingBox>,
    pub relation: SpatialRelation,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub org: Option<String>,
    pub record_type: Option<String>,
    pub theme: Option<String>,
    pub foundational: Option<bool>,
    pub source_system: Option<String>,
    pub eo_collection: Option<String>,
    pub polarization: Option<String>,
    pub orbit_direction: Option<String>,
    pub lang: Language,
    pub sort: Option<SortField>,
    pub order: SortOrder,
    pub size: usize,
    pub from: usize,
}

/// Parameter names the normalizer recognizes. Anything else is ignored with
/// a warning (gateways and proxies append their own tracking parameters).
const RECOGNIZED_PARAMS: &[&str] = &[
    "method",
    "q",
    "bbox",
    "relation",
    "begin",
    "end",
    "org",
    "type",
    "theme",
    "foundational",
    "source_system",
    "eo_collection",
    "polarization",
    "orbit_direction",
    "lang",
    "sort",
    "order",
    "size",
    "from",
];

impl SearchRequest {
    /// Query Normalizer: validate and default raw key/value parameters into
    /// a typed request. Pure transformation, no side effects beyond logging.
    pub fn from_params(params: &HashMap<String, String>) -> GeoSeekResult<Self> {
        for key in params.keys() {
            if !RECOGNIZED_PARAMS.contains(&key.as_str()) {
                tracing::warn!(param = %key, "ignoring unrecognized query parameter");
            }
        }

        let method = match params.get("method") {
            Some(value) => SearchMethod::parse(value)?,
            None => {
                return Err(GeoSeekError::InvalidRequest(
                    "missing mandatory 'method' parameter".to_string(),
                ))
            }
        };

        let bbox = params
            .get("bbox")
            .map(|value| BoundingBox::parse(value))
            .transpose()?;

        let relation = params
            .get("relation")
            .map(|value| SpatialRelation::parse(value))
            .transpose()?
            .unwrap_or(SpatialRelation::Intersects);

        let lang = params
            .get("lang")
            .map(|value| Language::parse(value))
            .transpose()?
            .unwrap_or(Language::En);

        let sort = params
            .get("sort")
            .map(|value| SortField::parse(value))
            .transpose()?;

        // Explicit order wins; otherwise titles read naturally ascending and
        // everything else defaults to descending.
        let order = match params.get("order") {
            Some(value) => SortOrder::parse(value)?,
            None => match sort {
                Some(SortField::Title) => SortOrder::Asc,
                _ => SortOrder::Desc,
            },
        };

        let foundational = params
            .get("foundational")
            .map(|value| match value.to_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(GeoSeekError::InvalidRequest(format!(
                    "invalid foundational flag '{other}'; expected true or false"
                ))),
            })
            .transpose()?;

        let size = parse_count(params, "size")?.unwrap_or(10);
        let from = parse_count(params, "from")?.unwrap_or(0);

        if size == 0 {
            return Err(GeoSeekError::InvalidRequest(
                "size must be greater than zero".to_string(),
            ));
        }

        let non_empty = |key: &str| {
            params
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(|value| value.to_string())
        };

        Ok(SearchRequest {
            method,
            q: non_empty("q"),
            bbox,
            relation,
            begin: non_empty("begin"),
            end: non_empty("end"),
            org: non_empty("org"),
            record_type: non_empty("type"),
            theme: non_empty("theme"),
            foundational,
            source_system: non_empty("source_system"),
            eo_collection: non_empty("eo_collection"),
            polarization: non_empty("polarization"),
            orbit_direction: non_empty("orbit_direction"),
            lang,
            sort,
            order,
            size,
            from,
        })
    }

    /// Encode the request back into its effective query parameters. The
    /// normalizer is idempotent over this encoding.
    pub fn to_params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("method".to_string(), self.method.as_str().to_string());
        if let Some(q) = &self.q {
            params.insert("q".to_string(), q.clone());
        }
        if let Some(bbox) = &self.bbox {
            params.insert("bbox".to_string(), bbox.to_param());
        }
        params.insert("relation".to_string(), self.relation.as_str().to_string());
        for (key, value) in [
            ("begin", &self.begin),
            ("end", &self.end),
            ("org", &self.org),
            ("type", &self.record_type),
            ("theme", &self.theme),
            ("source_system", &self.source_system),
            ("eo_collection", &self.eo_collection),
            ("polarization", &self.polarization),
            ("orbit_direction", &self.orbit_direction),
        ] {
            if let Some(value) = value {
                params.insert(key.to_string(), value.clone());
            }
        }
        if let Some(foundational) = self.foundational {
            params.insert("foundational".to_string(), foundational.to_string());
        }
        params.insert("lang".to_string(), self.lang.as_str().to_string());
        if let Some(sort) = self.sort {
            params.insert("sort".to_string(), sort.as_str().to_string());
        }
        params.insert("order".to_string(), self.order.as_str().to_string());
        params.insert("size".to_string(), self.size.to_string());
        params.insert("from".to_string(), self.from.to_string());
        params
    }
}

fn parse_count(params: &HashMap<String, String>, key: &str) -> GeoSeekResult<Option<usize>> {
    params
        .get(key)
        .map(|value| {
            value.parse::<usize>().map_err(|_| {
                GeoSeekError::InvalidRequest(format!(
                    "invalid '{key}' parameter '{value}'; expected a non-negative integer"
                ))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_method_is_invalid() {
        let result = SearchRequest::from_params(&params(&[("q", "wildfire")]));
        assert!(matches!(result, Err(GeoSeekError::InvalidRequest(_))));
    }

    #[test]
    fn test_unrecognized_method_is_invalid() {
        let result = SearchRequest::from_params(&params(&[("method", "FuzzySearch")]));
        assert!(matches!(result, Err(GeoSeekError::InvalidRequest(_))));
    }

    #[test]
    fn test_defaults() {
        let request =
            SearchRequest::from_params(&params(&[("method", "SemanticSearch"), ("q", "flood")]))
                .unwrap();
        assert_eq!(request.method, SearchMethod::SemanticSearch);
        assert_eq!(request.relation, SpatialRelation::Intersects);
        assert_eq!(request.lang, Language::En);
        assert_eq!(request.order, SortOrder::Desc);
        assert_eq!(request.size, 10);
        assert_eq!(request.from, 0);
        assert!(request.sort.is_none());
        assert!(request.bbox.is_none());
    }

    #[test]
    fn test_title_sort_defaults_to_ascending() {
        let request = SearchRequest::from_params(&params(&[
            ("method", "KeywordSearch"),
            ("sort", "title"),
        ]))
        .unwrap();
        assert_eq!(request.sort, Some(SortField::Title));
        assert_eq!(request.order, SortOrder::Asc);

        let request = SearchRequest::from_params(&params(&[
            ("method", "KeywordSearch"),
            ("sort", "title"),
            ("order", "desc"),
        ]))
        .unwrap();
        assert_eq!(request.order, SortOrder::Desc);
    }

    #[test]
    fn test_bbox_parsing() {
        let request = SearchRequest::from_params(&params(&[
            ("method", "SemanticSearch"),
            ("bbox", "-141,60,-123.8,69.7"),
        ]))
        .unwrap();
        let bbox = request.bbox.unwrap();
        assert_eq!(bbox.west, -141.0);
        assert_eq!(bbox.south, 60.0);
        assert_eq!(bbox.east, -123.8);
        assert_eq!(bbox.north, 69.7);
    }

    #[test]
    fn test_bbox_wrong_count_rejected() {
        let result = SearchRequest::from_params(&params(&[
            ("method", "SemanticSearch"),
            ("bbox", "-141,60,-123.8"),
        ]));
        assert!(matches!(result, Err(GeoSeekError::InvalidRequest(_))));
    }

    #[test]
    fn test_bbox_non_numeric_rejected() {
        let result = SearchRequest::from_params(&params(&[
            ("method", "SemanticSearch"),
            ("bbox", "west,south,east,north"),
        ]));
        assert!(matches!(result, Err(GeoSeekError::InvalidRequest(_))));
    }

    #[test]
    fn test_bbox_out_of_range_rejected() {
        let result = SearchRequest::from_params(&params(&[
            ("method", "SemanticSearch"),
            ("bbox", "-200,60,-123.8,69.7"),
        ]));
        assert!(matches!(result, Err(GeoSeekError::InvalidRequest(_))));
        let result = SearchRequest::from_params(&params(&[
            ("method", "SemanticSearch"),
            ("bbox", "-141,60,-123.8,99"),
        ]));
        assert!(matches!(result, Err(GeoSeekError::InvalidRequest(_))));
    }

    #[test]
    fn test_invalid_relation_rejected() {
        let result = SearchRequest::from_params(&params(&[
            ("method", "SemanticSearch"),
            ("relation", "touches"),
        ]));
        assert!(matches!(result, Err(GeoSeekError::InvalidRequest(_))));
    }

    #[test]
    fn test_zero_size_rejected() {
        let result =
            SearchRequest::from_params(&params(&[("method", "KeywordSearch"), ("size", "0")]));
        assert!(matches!(result, Err(GeoSeekError::InvalidRequest(_))));
    }

    #[test]
    fn test_unknown_params_are_ignored() {
        let request = SearchRequest::from_params(&params(&[
            ("method", "KeywordSearch"),
            ("utm_source", "newsletter"),
        ]))
        .unwrap();
        assert_eq!(request.method, SearchMethod::KeywordSearch);
    }

    #[test]
    fn test_normalization_round_trip() {
        let original = SearchRequest::from_params(&params(&[
            ("method", "SemanticSearch"),
            ("q", "hydrography"),
            ("bbox", "-141,60,-123.8,69.7"),
            ("relation", "within"),
            ("begin", "2020-01"),
            ("org", "nrcan, statcan"),
            ("theme", "environment"),
            ("foundational", "true"),
            ("lang", "fr"),
            ("sort", "date"),
            ("size", "25"),
            ("from", "50"),
        ]))
        .unwrap();

        let reparsed = SearchRequest::from_params(&original.to_params()).unwrap();
        assert_eq!(original, reparsed);
    }
}
