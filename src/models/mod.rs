use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

pub const PLACE_ID_NOT_SET: &str = "place-id-not-set";
pub const PLACE_NAME_NOT_SET: &str = "place-name-not-set";

const TITLE_NOT_SET: &str = "title-not-set";
const CAPTION_NOT_SET: &str = "caption-not-set";
const TAGS_NOT_SET: &str = "tags-not-set";

/// API key and shared secret identifying this application to Flickr.
///
/// Passed explicitly with every remote call; there is no process-wide
/// authentication slot.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCredentials {
    api_key: String,
    shared_secret: String,
}

impl AccessCredentials {
    pub fn new(api_key: impl Into<String>, shared_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            shared_secret: shared_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn shared_secret(&self) -> &str {
        &self.shared_secret
    }
}

impl fmt::Debug for AccessCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredentials")
            .field("api_key", &self.api_key)
            .field("shared_secret", &"***")
            .finish()
    }
}

/// OAuth token pair granted to the harvesting account.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    token: String,
    token_secret: String,
}

impl AuthToken {
    pub fn new(token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn token_secret(&self) -> &str {
        &self.token_secret
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &self.token)
            .field("token_secret", &"***")
            .finish()
    }
}

/// Where a photo was taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
    pub accuracy: i32,
    pub place_id: String,
    pub place_name: String,
}

impl Location {
    /// Absent or empty place fields fall back to the `*-not-set` markers.
    pub fn new(
        longitude: f64,
        latitude: f64,
        accuracy: i32,
        place_id: Option<&str>,
        place_name: Option<&str>,
    ) -> Self {
        Self {
            longitude,
            latitude,
            accuracy,
            place_id: or_marker(place_id, PLACE_ID_NOT_SET),
            place_name: or_marker(place_name, PLACE_NAME_NOT_SET),
        }
    }
}

fn or_marker(value: Option<&str>, marker: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => marker.to_string(),
    }
}

// Coordinates compare by bit pattern so that Location can be Eq + Hash.
impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.longitude.to_bits() == other.longitude.to_bits()
            && self.latitude.to_bits() == other.latitude.to_bits()
            && self.accuracy == other.accuracy
            && self.place_id == other.place_id
            && self.place_name == other.place_name
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.longitude.to_bits().hash(state);
        self.latitude.to_bits().hash(state);
        self.accuracy.hash(state);
        self.place_id.hash(state);
        self.place_name.hash(state);
    }
}

/// Author of a harvested photo
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub profile_url: String,
}

impl Procedure {
    pub fn new(name: impl Into<String>, profile_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile_url: profile_url.into(),
        }
    }
}

/// Read contract the aggregation framework expects from every harvested
/// human visual perception observation.
pub trait Observation {
    fn identifier(&self) -> &str;

    fn location(&self) -> &Location;

    /// When the content was captured.
    fn phenomenon_time(&self) -> DateTime<Utc>;

    /// When the content was published.
    fn result_time(&self) -> DateTime<Utc>;

    fn procedure(&self) -> &Procedure;

    fn result_href(&self) -> &str;

    /// Descriptive text, safe to embed in XML.
    fn result(&self) -> String;
}

/// One geotagged Flickr photo, normalized.
///
/// Equality and hashing cover every field, so collecting into a `HashSet`
/// drops photos returned twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservationMessage {
    pub id: String,
    pub location: Location,
    pub phenomenon_time: DateTime<Utc>,
    pub result_time: DateTime<Utc>,
    pub result_href: String,
    pub procedure: Procedure,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub tags: Vec<String>,
}

impl Observation for ObservationMessage {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn phenomenon_time(&self) -> DateTime<Utc> {
        self.phenomenon_time
    }

    fn result_time(&self) -> DateTime<Utc> {
        self.result_time
    }

    fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    fn result_href(&self) -> &str {
        &self.result_href
    }

    fn result(&self) -> String {
        let title = non_empty(self.title.as_deref()).unwrap_or(TITLE_NOT_SET);
        let caption = non_empty(self.caption.as_deref()).unwrap_or(CAPTION_NOT_SET);
        let tags = if self.tags.is_empty() {
            TAGS_NOT_SET.to_string()
        } else {
            format!("[{}]", self.tags.join(", "))
        };

        let raw = format!("TITLE: {}; CAPTION: {}; TAGS: {}; ", title, caption, tags);
        escape(raw.as_str()).into_owned()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl fmt::Display for ObservationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at ({}, {}) by {} taken {} posted {}",
            self.id,
            self.location.latitude,
            self.location.longitude,
            self.procedure.name,
            self.phenomenon_time,
            self.result_time
        )
    }
}
