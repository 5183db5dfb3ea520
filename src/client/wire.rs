//! Flickr JSON response shapes.
//!
//! Flickr encodes most numbers as strings and omits fields freely, so every
//! optional field defaults and numbers are read leniently.

use super::{GeoData, Owner, PhotoInfo, PhotoPage, PhotoSummary, Place};
use crate::error::ServiceError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Error code of `flickr.photos.geo.getLocation` for photos without a location.
const NO_LOCATION_CODE: i64 = 2;

const TAKEN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Lenient {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Lenient::Int(v) => Some(*v as f64),
            Lenient::Float(v) => Some(*v),
            Lenient::Text(v) => v.trim().parse().ok(),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Lenient::Int(v) => Some(*v),
            Lenient::Float(v) => Some(*v as i64),
            Lenient::Text(v) => v.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(rename = "_content", default)]
    content: String,
}

impl Content {
    fn into_option(self) -> Option<String> {
        Some(self.content).filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct RawLocality {
    #[serde(rename = "_content", default)]
    name: Option<String>,
    #[serde(default)]
    place_id: Option<String>,
}

impl From<RawLocality> for Place {
    fn from(raw: RawLocality) -> Self {
        Place {
            id: raw.place_id.filter(|id| !id.is_empty()),
            name: raw.name.filter(|name| !name.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    photos: RawPhotos,
}

#[derive(Debug, Deserialize)]
struct RawPhotos {
    #[serde(default)]
    page: Option<Lenient>,
    #[serde(default)]
    pages: Option<Lenient>,
    #[serde(default)]
    total: Option<Lenient>,
    #[serde(default)]
    photo: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    id: String,
    #[serde(default)]
    secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfoEnvelope {
    photo: RawInfo,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    id: String,
    owner: RawOwner,
    #[serde(default)]
    title: Content,
    #[serde(default)]
    description: Content,
    #[serde(default)]
    dates: RawDates,
    #[serde(default)]
    tags: RawTags,
    #[serde(default)]
    location: Option<RawInfoLocation>,
    #[serde(default)]
    urls: RawUrls,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    nsid: String,
    #[serde(default)]
    username: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawDates {
    #[serde(default)]
    posted: Option<Lenient>,
    #[serde(default)]
    taken: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTags {
    #[serde(default)]
    tag: Vec<RawTag>,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    #[serde(default)]
    raw: Option<String>,
    #[serde(rename = "_content", default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct RawInfoLocation {
    #[serde(default)]
    locality: Option<RawLocality>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUrls {
    #[serde(default)]
    url: Vec<RawUrl>,
}

#[derive(Debug, Deserialize)]
struct RawUrl {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(rename = "_content", default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct GeoEnvelope {
    photo: RawGeoPhoto,
}

#[derive(Debug, Deserialize)]
struct RawGeoPhoto {
    #[serde(default)]
    location: Option<RawGeoLocation>,
}

#[derive(Debug, Deserialize)]
struct RawGeoLocation {
    latitude: Lenient,
    longitude: Lenient,
    #[serde(default)]
    accuracy: Option<Lenient>,
    #[serde(default)]
    locality: Option<RawLocality>,
}

/// Strips the `stat` envelope, turning `stat = "fail"` into an API error.
pub(crate) fn unwrap_stat(body: Value) -> Result<Value, ServiceError> {
    match body.get("stat").and_then(Value::as_str) {
        Some("ok") => Ok(body),
        Some("fail") => Err(ServiceError::Api {
            code: body.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        }),
        other => Err(ServiceError::Malformed(format!(
            "unexpected stat field: {:?}",
            other
        ))),
    }
}

pub(crate) fn parse_search(body: Value) -> Result<PhotoPage, ServiceError> {
    let envelope: SearchEnvelope = serde_json::from_value(body)?;
    let photos = envelope.photos;

    Ok(PhotoPage {
        page: lenient_u32(photos.page.as_ref()),
        pages: lenient_u32(photos.pages.as_ref()),
        total: photos
            .total
            .as_ref()
            .and_then(Lenient::as_i64)
            .unwrap_or_default()
            .max(0) as u64,
        photos: photos
            .photo
            .into_iter()
            .map(|hit| PhotoSummary {
                id: hit.id,
                secret: hit.secret.filter(|s| !s.is_empty()),
            })
            .collect(),
    })
}

pub(crate) fn parse_info(body: Value) -> Result<PhotoInfo, ServiceError> {
    let envelope: InfoEnvelope = serde_json::from_value(body)?;
    let raw = envelope.photo;

    let url = raw
        .urls
        .url
        .into_iter()
        .find(|u| u.kind == "photopage" && !u.content.is_empty())
        .map(|u| u.content);

    let tags = raw
        .tags
        .tag
        .into_iter()
        .map(|t| t.raw.filter(|r| !r.is_empty()).unwrap_or(t.content))
        .filter(|t| !t.is_empty())
        .collect();

    Ok(PhotoInfo {
        id: raw.id,
        owner: Owner {
            nsid: raw.owner.nsid,
            username: raw.owner.username,
        },
        title: raw.title.into_option(),
        description: raw.description.into_option(),
        posted: raw
            .dates
            .posted
            .as_ref()
            .and_then(Lenient::as_i64)
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        taken: raw.dates.taken.as_deref().and_then(parse_taken),
        url,
        tags,
        locality: raw
            .location
            .and_then(|l| l.locality)
            .map(Place::from),
    })
}

/// Outcome of `flickr.photos.geo.getLocation`; a photo without a location
/// is `Ok(None)`, not a failure.
pub(crate) fn geo_result(
    response: Result<Value, ServiceError>,
) -> Result<Option<GeoData>, ServiceError> {
    match response {
        Ok(body) => parse_geo(body),
        Err(ServiceError::Api { code, .. }) if code == NO_LOCATION_CODE => Ok(None),
        Err(err) => Err(err),
    }
}

/// Rejects non-2xx responses before the body is read.
pub(crate) fn check_status(status: StatusCode) -> Result<(), ServiceError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ServiceError::Status(status.as_u16()))
    }
}

fn parse_geo(body: Value) -> Result<Option<GeoData>, ServiceError> {
    let envelope: GeoEnvelope = serde_json::from_value(body)?;
    let Some(location) = envelope.photo.location else {
        return Ok(None);
    };

    let latitude = location
        .latitude
        .as_f64()
        .ok_or_else(|| ServiceError::Malformed("latitude is not a number".to_string()))?;
    let longitude = location
        .longitude
        .as_f64()
        .ok_or_else(|| ServiceError::Malformed("longitude is not a number".to_string()))?;

    Ok(Some(GeoData {
        longitude,
        latitude,
        accuracy: location
            .accuracy
            .as_ref()
            .and_then(Lenient::as_i64)
            .unwrap_or_default() as i32,
        locality: location.locality.map(Place::from),
    }))
}

fn lenient_u32(value: Option<&Lenient>) -> u32 {
    value
        .and_then(Lenient::as_i64)
        .unwrap_or_default()
        .clamp(0, u32::MAX as i64) as u32
}

/// Taken dates carry no zone; they are read as UTC. Unknown dates such as
/// `0000-00-00 00:00:00` yield `None`.
fn parse_taken(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), TAKEN_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
