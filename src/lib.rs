//! Harvests geotagged Flickr photos as human visual perception observations.

pub mod client;
pub mod config;
pub mod error;
pub mod geo;
pub mod harvesters;
pub mod models;

pub use client::{FlickrDao, InMemoryPhotoService, PhotoService, RestClient};
pub use config::HarvesterConfig;
pub use error::{ConfigError, HarvestError, ServiceError};
pub use harvesters::{BoundingBox, FlickrHarvester, Harvester, Query};
pub use models::{AccessCredentials, AuthToken, Location, Observation, ObservationMessage, Procedure};
