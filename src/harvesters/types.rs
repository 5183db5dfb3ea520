use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// `minLon,minLat,maxLon,maxLat`, the order Flickr expects.
    pub fn to_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Search request for photos
///
/// Built fresh for every search and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    bbox: Option<BoundingBox>,
    min_date: Option<DateTime<Utc>>,
    max_date: Option<DateTime<Utc>>,
    tags: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Either bound may be open.
    pub fn with_time_range(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.min_date = start;
        self.max_date = end;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    pub fn is_geolocated(&self) -> bool {
        self.bbox.is_some()
    }

    pub fn has_keywords(&self) -> bool {
        !self.tags.is_empty()
    }

    /// Tags in the order they were given.
    pub fn keywords(&self) -> &[String] {
        &self.tags
    }

    pub fn has_min_date(&self) -> bool {
        self.min_date.is_some()
    }

    pub fn has_max_date(&self) -> bool {
        self.max_date.is_some()
    }

    pub fn min_date(&self) -> Option<DateTime<Utc>> {
        self.min_date
    }

    pub fn max_date(&self) -> Option<DateTime<Utc>> {
        self.max_date
    }
}
