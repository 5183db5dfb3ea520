use super::wire;
use super::{GeoData, PhotoInfo, PhotoPage, PhotoService, SearchParameters};
use crate::error::ServiceError;
use crate::models::AccessCredentials;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const API_ENDPOINT: &str = "https://api.flickr.com/services/rest/";

const USER_AGENT: &str = concat!("flickr-harvester/", env!("CARGO_PKG_VERSION"));

/// Flickr REST API over HTTPS
pub struct RestClient {
    client: Client,
    endpoint: String,
}

impl RestClient {
    /// Client for the public Flickr endpoint
    pub fn new() -> Result<Self, ServiceError> {
        Self::with_endpoint(API_ENDPOINT)
    }

    /// Client for another endpoint speaking the same API (proxies, test servers)
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn call(
        &self,
        credentials: &AccessCredentials,
        method: &str,
        args: Vec<(&'static str, String)>,
    ) -> Result<Value, ServiceError> {
        let mut query: Vec<(&str, String)> = vec![
            ("method", method.to_string()),
            ("api_key", credentials.api_key().to_string()),
            ("format", "json".to_string()),
            ("nojsoncallback", "1".to_string()),
        ];
        query.extend(args);

        debug!(method, "Calling Flickr");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await?;

        if let Err(err) = wire::check_status(response.status()) {
            warn!(method, status = %response.status(), "Flickr request failed");
            return Err(err);
        }

        let body: Value = response.json().await?;
        wire::unwrap_stat(body)
    }
}

#[async_trait]
impl PhotoService for RestClient {
    async fn search(
        &self,
        credentials: &AccessCredentials,
        params: &SearchParameters,
        per_page: u32,
        page: u32,
    ) -> Result<PhotoPage, ServiceError> {
        let mut args = params.to_pairs();
        args.push(("per_page", per_page.to_string()));
        args.push(("page", page.to_string()));

        let body = self.call(credentials, "flickr.photos.search", args).await?;
        wire::parse_search(body)
    }

    async fn info(
        &self,
        credentials: &AccessCredentials,
        photo_id: &str,
        secret: Option<&str>,
    ) -> Result<PhotoInfo, ServiceError> {
        let mut args = vec![("photo_id", photo_id.to_string())];
        if let Some(secret) = secret {
            args.push(("secret", secret.to_string()));
        }

        let body = self.call(credentials, "flickr.photos.getInfo", args).await?;
        wire::parse_info(body)
    }

    async fn geo(
        &self,
        credentials: &AccessCredentials,
        photo_id: &str,
    ) -> Result<Option<GeoData>, ServiceError> {
        let args = vec![("photo_id", photo_id.to_string())];

        let response = self
            .call(credentials, "flickr.photos.geo.getLocation", args)
            .await;
        wire::geo_result(response)
    }
}
