//! In-memory [`PhotoService`] for tests and offline runs.
//!
//! Photos are registered up front, grouped into result pages. Every call is
//! recorded so callers can check what would have gone over the wire.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{GeoData, PhotoInfo, PhotoPage, PhotoService, PhotoSummary, SearchParameters};
use crate::error::ServiceError;
use crate::models::AccessCredentials;

/// A call received by [`InMemoryPhotoService`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search {
        params: SearchParameters,
        per_page: u32,
        page: u32,
    },
    Info(String),
    Geo(String),
}

pub struct InMemoryPhotoService {
    pages: Vec<Vec<PhotoSummary>>,
    reported_pages: Option<u32>,
    infos: HashMap<String, PhotoInfo>,
    locations: HashMap<String, GeoData>,
    failing: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl InMemoryPhotoService {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            reported_pages: None,
            infos: HashMap::new(),
            locations: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Appends a result page. A `None` location marks a photo without geo data.
    pub fn with_page(mut self, photos: Vec<(PhotoInfo, Option<GeoData>)>) -> Self {
        let mut page = Vec::with_capacity(photos.len());
        for (info, geo) in photos {
            page.push(PhotoSummary {
                id: info.id.clone(),
                secret: None,
            });
            self = self.with_photo(info, geo);
        }
        self.pages.push(page);
        self
    }

    /// Registers a photo that only id lookups will find.
    pub fn with_photo(mut self, info: PhotoInfo, geo: Option<GeoData>) -> Self {
        if let Some(geo) = geo {
            self.locations.insert(info.id.clone(), geo);
        }
        self.infos.insert(info.id.clone(), info);
        self
    }

    /// Overrides the page count reported with every search page.
    pub fn with_reported_pages(mut self, pages: u32) -> Self {
        self.reported_pages = Some(pages);
        self
    }

    /// Lookups for `photo_id` fail with an API error.
    pub fn failing_on(mut self, photo_id: impl Into<String>) -> Self {
        self.failing.insert(photo_id.into());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Page numbers requested so far, in order.
    pub fn searched_pages(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Search { page, .. } => Some(page),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn check_failing(&self, photo_id: &str) -> Result<(), ServiceError> {
        if self.failing.contains(photo_id) {
            return Err(ServiceError::Api {
                code: 105,
                message: "Service currently unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn photo_not_found() -> ServiceError {
    ServiceError::Api {
        code: 1,
        message: "Photo not found".to_string(),
    }
}

impl Default for InMemoryPhotoService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhotoService for InMemoryPhotoService {
    async fn search(
        &self,
        _credentials: &AccessCredentials,
        params: &SearchParameters,
        per_page: u32,
        page: u32,
    ) -> Result<PhotoPage, ServiceError> {
        self.record(Call::Search {
            params: params.clone(),
            per_page,
            page,
        });

        let photos = page
            .checked_sub(1)
            .and_then(|index| self.pages.get(index as usize))
            .cloned()
            .unwrap_or_default();

        Ok(PhotoPage {
            page,
            pages: self.reported_pages.unwrap_or(self.pages.len() as u32),
            total: self.pages.iter().map(Vec::len).sum::<usize>() as u64,
            photos,
        })
    }

    async fn info(
        &self,
        _credentials: &AccessCredentials,
        photo_id: &str,
        _secret: Option<&str>,
    ) -> Result<PhotoInfo, ServiceError> {
        self.record(Call::Info(photo_id.to_string()));
        self.check_failing(photo_id)?;

        self.infos
            .get(photo_id)
            .cloned()
            .ok_or_else(photo_not_found)
    }

    async fn geo(
        &self,
        _credentials: &AccessCredentials,
        photo_id: &str,
    ) -> Result<Option<GeoData>, ServiceError> {
        self.record(Call::Geo(photo_id.to_string()));
        self.check_failing(photo_id)?;

        if !self.infos.contains_key(photo_id) {
            return Err(photo_not_found());
        }
        Ok(self.locations.get(photo_id).cloned())
    }
}
