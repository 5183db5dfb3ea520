use crate::client::{FlickrDao, PhotoService, RestClient};
use crate::config::HarvesterConfig;
use crate::error::HarvestError;
use crate::geo;
use crate::harvesters::traits::Harvester;
use crate::harvesters::types::{BoundingBox, Query};
use crate::models::{AccessCredentials, AuthToken, ObservationMessage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Flickr harvester
///
/// Point searches cover a square of `bbox_width` meters centered on the point.
pub struct FlickrHarvester {
    credentials: AccessCredentials,
    auth_token: AuthToken,
    search_terms: Vec<String>,
    bbox_width: f64,
    dao: FlickrDao,
}

impl FlickrHarvester {
    /// Load configuration from `path` and talk to the public Flickr API
    pub fn from_config_file(path: &Path) -> Result<Self, HarvestError> {
        let config = HarvesterConfig::load(path)?;
        Self::from_config(config)
    }

    /// Harvester backed by the public Flickr API
    pub fn from_config(config: HarvesterConfig) -> Result<Self, HarvestError> {
        let client = RestClient::new().map_err(HarvestError::ClientSetup)?;
        Ok(Self::with_service(config, Arc::new(client)))
    }

    /// Harvester backed by any photo service
    pub fn with_service(config: HarvesterConfig, service: Arc<dyn PhotoService>) -> Self {
        let dao = FlickrDao::new(service, config.credentials.clone());

        Self {
            credentials: config.credentials,
            auth_token: config.auth_token,
            search_terms: config.search_terms,
            bbox_width: config.bbox_width,
            dao,
        }
    }

    pub fn credentials(&self) -> &AccessCredentials {
        &self.credentials
    }

    pub fn auth_token(&self) -> &AuthToken {
        &self.auth_token
    }

    pub fn bbox_width(&self) -> f64 {
        self.bbox_width
    }

    pub fn has_configured_search_terms(&self) -> bool {
        !self.search_terms.is_empty()
    }

    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }

    /// Area searched around (`latitude`, `longitude`)
    pub fn bbox_for(&self, latitude: f64, longitude: f64) -> BoundingBox {
        geo::bbox_around(latitude, longitude, self.bbox_width / 2.0)
    }

    /// Photos around a point, optionally restricted to a taken-date range
    pub async fn search_by_location_and_time(
        &self,
        latitude: f64,
        longitude: f64,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<ObservationMessage>, HarvestError> {
        check_coordinates(latitude, longitude)?;

        let query = Query::new()
            .with_bbox(self.bbox_for(latitude, longitude))
            .with_time_range(start, end);

        let messages = self.dao.execute_query(&query).await?;
        info!(
            "Harvested {} photos around ({}, {})",
            messages.len(),
            latitude,
            longitude
        );
        Ok(messages)
    }

    /// Photos around a point, any time
    pub async fn search_by_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ObservationMessage>, HarvestError> {
        self.search_by_location_and_time(latitude, longitude, None, None)
            .await
    }

    /// Photos carrying every given tag, anywhere
    pub async fn search_by_tags<S: AsRef<str>>(
        &self,
        tags: &[S],
    ) -> Result<HashSet<ObservationMessage>, HarvestError> {
        if tags.is_empty() {
            return Err(HarvestError::InvalidArgument("At least one tag is required"));
        }

        let query = Query::new().with_tags(tags.iter().map(|t| t.as_ref().to_string()));

        let result: HashSet<_> = self.dao.execute_query(&query).await?.into_iter().collect();
        info!("Harvested {} photos tagged {:?}", result.len(), query.keywords());
        Ok(result)
    }

    /// Photos by Flickr id
    ///
    /// Every id must be numeric; nothing is fetched otherwise.
    pub async fn get_by_ids<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<HashSet<ObservationMessage>, HarvestError> {
        if ids.is_empty() {
            return Err(HarvestError::InvalidArgument("At least one id is required"));
        }

        let numeric_ids = ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                id.trim()
                    .parse::<u64>()
                    .map_err(|source| HarvestError::IdParse {
                        id: id.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let result: HashSet<_> = self
            .dao
            .fetch_by_ids(&numeric_ids)
            .await?
            .into_iter()
            .collect();
        info!("Fetched {} of {} requested photos", result.len(), ids.len());
        Ok(result)
    }

    /// Tag search over the configured search terms
    pub async fn harvest_search_terms(&self) -> Result<HashSet<ObservationMessage>, HarvestError> {
        if !self.has_configured_search_terms() {
            return Err(HarvestError::InvalidArgument("No search terms configured"));
        }
        self.search_by_tags(self.search_terms.as_slice()).await
    }
}

fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), HarvestError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(HarvestError::InvalidArgument(
            "Latitude must be within [-90, 90]",
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(HarvestError::InvalidArgument(
            "Longitude must be within [-180, 180]",
        ));
    }
    Ok(())
}

#[async_trait]
impl Harvester for FlickrHarvester {
    fn source_name(&self) -> &'static str {
        "Flickr"
    }

    fn search_terms(&self) -> &[String] {
        &self.search_terms
    }

    async fn get_by_ids(&self, ids: &[String]) -> Result<HashSet<ObservationMessage>, HarvestError> {
        FlickrHarvester::get_by_ids(self, ids).await
    }

    async fn search_by_tags(
        &self,
        tags: &[String],
    ) -> Result<HashSet<ObservationMessage>, HarvestError> {
        FlickrHarvester::search_by_tags(self, tags).await
    }

    async fn search_by_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ObservationMessage>, HarvestError> {
        FlickrHarvester::search_by_location(self, latitude, longitude).await
    }
}
