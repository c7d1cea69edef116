use thiserror::Error;

/// Central error type for GeoSeek operations.
#[derive(Error, Debug)]
pub enum GeoSeekError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream unavailable ({service}): {reason}")]
    UpstreamUnavailable { service: &'static str, reason: String },

    #[error("Upstream error ({service}, status {status}): {message}")]
    UpstreamError {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GeoSeekError {
    /// Classify a transport-level failure from one of the upstream clients.
    pub fn from_transport(service: &'static str, err: reqwest::Error) -> Self {
        GeoSeekError::UpstreamUnavailable {
            service,
            reason: err.to_string(),
        }
    }
}

/// Convenience type alias for GeoSeek results.
pub type GeoSeekResult<T> = Result<T, GeoSeekError>;
