pub mod embedding;
pub mod request;
pub mod response;

pub use embedding::EmbeddingVector;
pub use request::{
    BoundingBox, Language, SearchMethod, SearchRequest, SortField, SortOrder, SpatialRelation,
};
pub use response::{
    Feature, FeatureCollection, RawSearchResults, ResponseBody, SearchHit, SearchResponse,
};
