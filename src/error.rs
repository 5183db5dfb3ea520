use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration could not be loaded; the harvester cannot start.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("QUADRATICAL_BBOX_WIDTH must be a positive number of meters, got '{0}'")]
    InvalidWidth(String),
}

/// Failure talking to the photo service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Flickr returned HTTP status {0}")]
    Status(u16),

    #[error("Flickr API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Malformed Flickr response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Malformed(err.to_string())
    }
}

/// Errors surfaced by harvest operations.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// The caller passed an unusable argument, no remote call was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Invalid photo id '{id}': {source}")]
    IdParse {
        id: String,
        #[source]
        source: ParseIntError,
    },

    /// Any provider-side failure. Partial results are discarded.
    #[error("Failed to decode Flickr results: {0}")]
    Decoding(#[from] ServiceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built; the harvester cannot start.
    #[error("Failed to set up the Flickr client: {0}")]
    ClientSetup(#[source] ServiceError),
}
