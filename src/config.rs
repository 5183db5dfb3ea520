use crate::error::ConfigError;
use crate::models::{AccessCredentials, AuthToken};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "flickr_credentials.toml";

/// Settings file as written on disk. Key names follow the credential
/// property names Flickr tooling hands out.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "ACCESS_TOKEN")]
    access_token: String,
    #[serde(rename = "ACCESS_TOKEN_SECRET")]
    access_token_secret: String,
    #[serde(rename = "OAUTH_CONSUMER_KEY")]
    oauth_consumer_key: String,
    #[serde(rename = "OAUTH_CONSUMER_SECRET")]
    oauth_consumer_secret: String,
    #[serde(rename = "QUADRATICAL_BBOX_WIDTH")]
    bbox_width: RawWidth,
    #[serde(rename = "SEARCH_TERMS", default)]
    search_terms: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawWidth {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct HarvesterConfig {
    pub credentials: AccessCredentials,
    pub auth_token: AuthToken,
    /// Side length in meters of the square searched around a point.
    pub bbox_width: f64,
    pub search_terms: Vec<String>,
}

impl HarvesterConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let bbox_width = match raw.bbox_width {
            RawWidth::Number(width) => width,
            RawWidth::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidWidth(text.clone()))?,
        };
        if !bbox_width.is_finite() || bbox_width <= 0.0 {
            return Err(ConfigError::InvalidWidth(bbox_width.to_string()));
        }

        let search_terms = raw
            .search_terms
            .as_deref()
            .map(split_terms)
            .unwrap_or_default();

        Ok(Self {
            credentials: AccessCredentials::new(raw.access_token, raw.access_token_secret),
            auth_token: AuthToken::new(raw.oauth_consumer_key, raw.oauth_consumer_secret),
            bbox_width,
            search_terms,
        })
    }
}

fn split_terms(terms: &str) -> Vec<String> {
    terms
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}
