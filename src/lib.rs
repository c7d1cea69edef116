pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod pipeline;
pub mod query;
pub mod server;

pub use config::{AppConfig, EmbeddingConfig, PipelineConfig, SearchConfig, ServerConfig};
pub use error::{GeoSeekError, GeoSeekResult};
pub use model::*;
pub use pipeline::SearchPipeline;
