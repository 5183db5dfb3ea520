use super::{GeoData, PhotoInfo, PhotoService, SearchParameters};
use crate::error::HarvestError;
use crate::harvesters::types::Query;
use crate::models::{AccessCredentials, Location, ObservationMessage, Procedure};
use std::sync::Arc;
use tracing::{debug, info};

/// Largest page Flickr serves for `flickr.photos.search`.
pub const PAGE_SIZE: u32 = 500;

/// Turns queries into observations, one Flickr call at a time.
pub struct FlickrDao {
    service: Arc<dyn PhotoService>,
    credentials: AccessCredentials,
}

impl FlickrDao {
    pub fn new(service: Arc<dyn PhotoService>, credentials: AccessCredentials) -> Self {
        Self {
            service,
            credentials,
        }
    }

    /// Provider filter for `query`: all tags must match, and a bounding box
    /// implies photos must carry geo data.
    pub fn search_parameters(query: &Query) -> SearchParameters {
        let mut params = SearchParameters::default();
        if query.has_keywords() {
            params.tags = query.keywords().to_vec();
            params.match_all_tags = true;
        }
        if let Some(bbox) = query.bbox() {
            params.bbox = Some(*bbox);
            params.has_geo = true;
        }
        params.min_taken_date = query.min_date();
        params.max_taken_date = query.max_date();
        params
    }

    /// Runs `query` over every result page and enriches each hit.
    ///
    /// Photos without geo data or without a posted date are skipped. Any
    /// provider failure aborts the whole query.
    pub async fn execute_query(
        &self,
        query: &Query,
    ) -> Result<Vec<ObservationMessage>, HarvestError> {
        let params = Self::search_parameters(query);
        let mut messages = Vec::new();
        let mut page_index = 1;

        loop {
            let page = self
                .service
                .search(&self.credentials, &params, PAGE_SIZE, page_index)
                .await?;

            info!(
                "Number of photos on page {}: {} of {} photos for this result set",
                page_index,
                page.photos.len(),
                page.total
            );

            for (i, photo) in page.photos.iter().enumerate() {
                if let Some(message) = self
                    .create_message(&photo.id, photo.secret.as_deref())
                    .await?
                {
                    debug!("Downloaded photo No. {}: {}", i, message);
                    messages.push(message);
                }
            }

            if page.photos.is_empty() || page_index >= page.pages {
                break;
            }
            page_index += 1;
        }

        Ok(messages)
    }

    /// Looks up photos directly by id, applying the same skips as searches.
    pub async fn fetch_by_ids(&self, ids: &[u64]) -> Result<Vec<ObservationMessage>, HarvestError> {
        let mut messages = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(message) = self.create_message(&id.to_string(), None).await? {
                debug!("Downloaded photo {}: {}", id, message);
                messages.push(message);
            }
        }
        Ok(messages)
    }

    async fn create_message(
        &self,
        photo_id: &str,
        secret: Option<&str>,
    ) -> Result<Option<ObservationMessage>, HarvestError> {
        let Some(geo) = self.service.geo(&self.credentials, photo_id).await? else {
            info!("Photo {} is not geo located, skipped", photo_id);
            return Ok(None);
        };

        let info = self
            .service
            .info(&self.credentials, photo_id, secret)
            .await?;

        Ok(to_message(photo_id, geo, info))
    }
}

fn to_message(photo_id: &str, geo: GeoData, info: PhotoInfo) -> Option<ObservationMessage> {
    let Some(posted) = info.posted else {
        info!("Photo {} has no posted date, skipped", photo_id);
        return None;
    };

    // each place field from the photo detail, else from the geo lookup
    let detail = info.locality.unwrap_or_default();
    let located = geo.locality.unwrap_or_default();
    let place_id = detail.id.or(located.id);
    let place_name = detail.name.or(located.name);
    let location = Location::new(
        geo.longitude,
        geo.latitude,
        geo.accuracy,
        place_id.as_deref(),
        place_name.as_deref(),
    );

    let result_href = info.url.unwrap_or_else(|| {
        format!(
            "https://www.flickr.com/photos/{}/{}/",
            info.owner.nsid, photo_id
        )
    });

    Some(ObservationMessage {
        id: photo_id.to_string(),
        location,
        phenomenon_time: info.taken.unwrap_or(posted),
        result_time: posted,
        result_href,
        procedure: Procedure::new(info.owner.username.clone(), info.owner.profile_url()),
        title: info.title,
        caption: info.description,
        tags: info.tags,
    })
}
