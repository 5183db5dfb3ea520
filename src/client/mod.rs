//! Flickr photo service boundary.
//!
//! [`PhotoService`] is the seam between the harvester and the network: the
//! REST implementation lives in [`rest`], an in-memory one in [`memory`],
//! and [`FlickrDao`] turns either into observations.

pub mod dao;
pub mod memory;
pub mod rest;
mod wire;

use crate::error::ServiceError;
use crate::harvesters::types::BoundingBox;
use crate::models::AccessCredentials;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use dao::FlickrDao;
pub use memory::InMemoryPhotoService;
pub use rest::RestClient;

/// Provider-side filter for `flickr.photos.search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParameters {
    pub tags: Vec<String>,
    /// Require every tag instead of any of them.
    pub match_all_tags: bool,
    pub bbox: Option<BoundingBox>,
    pub has_geo: bool,
    pub min_taken_date: Option<DateTime<Utc>>,
    pub max_taken_date: Option<DateTime<Utc>>,
}

impl SearchParameters {
    /// Request arguments, excluding paging and authentication.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        if self.match_all_tags {
            pairs.push(("tag_mode", "all".to_string()));
        }
        if let Some(bbox) = &self.bbox {
            pairs.push(("bbox", bbox.to_param()));
        }
        if self.has_geo {
            pairs.push(("has_geo", "1".to_string()));
        }
        if let Some(date) = self.min_taken_date {
            pairs.push(("min_taken_date", date.timestamp().to_string()));
        }
        if let Some(date) = self.max_taken_date {
            pairs.push(("max_taken_date", date.timestamp().to_string()));
        }
        pairs
    }
}

/// A search hit; only the identity is used, details are fetched separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSummary {
    pub id: String,
    pub secret: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct PhotoPage {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
    pub photos: Vec<PhotoSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Place {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub nsid: String,
    pub username: String,
}

impl Owner {
    pub fn profile_url(&self) -> String {
        format!("https://www.flickr.com/people/{}/", self.nsid)
    }
}

/// Extended photo detail from `flickr.photos.getInfo`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoInfo {
    pub id: String,
    pub owner: Owner,
    pub title: Option<String>,
    pub description: Option<String>,
    pub posted: Option<DateTime<Utc>>,
    pub taken: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub tags: Vec<String>,
    pub locality: Option<Place>,
}

/// Position from `flickr.photos.geo.getLocation`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoData {
    pub longitude: f64,
    pub latitude: f64,
    pub accuracy: i32,
    pub locality: Option<Place>,
}

/// Read-only Flickr calls the harvester relies on.
///
/// Credentials travel with every call, so one instance can serve any number
/// of harvesters and tasks.
#[async_trait]
pub trait PhotoService: Send + Sync {
    async fn search(
        &self,
        credentials: &AccessCredentials,
        params: &SearchParameters,
        per_page: u32,
        page: u32,
    ) -> Result<PhotoPage, ServiceError>;

    /// `secret` is the per-photo secret from the search hit, if known.
    async fn info(
        &self,
        credentials: &AccessCredentials,
        photo_id: &str,
        secret: Option<&str>,
    ) -> Result<PhotoInfo, ServiceError>;

    /// `Ok(None)` when the photo carries no location.
    async fn geo(
        &self,
        credentials: &AccessCredentials,
        photo_id: &str,
    ) -> Result<Option<GeoData>, ServiceError>;
}
