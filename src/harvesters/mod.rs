pub mod flickr;
pub mod traits;
pub mod types;

pub use flickr::FlickrHarvester;
pub use traits::Harvester;
pub use types::{BoundingBox, Query};
