use crate::error::HarvestError;
use crate::models::ObservationMessage;
use async_trait::async_trait;
use std::collections::HashSet;

/// Common contract of all social-media harvesters
/// The aggregation framework drives every source through this trait
#[async_trait]
pub trait Harvester: Send + Sync {
    /// Name of the harvested source
    fn source_name(&self) -> &'static str;

    /// Search terms configured for this harvester, possibly none
    fn search_terms(&self) -> &[String];

    /// Fetch observations by provider id
    async fn get_by_ids(&self, ids: &[String]) -> Result<HashSet<ObservationMessage>, HarvestError>;

    /// Observations carrying every given tag
    async fn search_by_tags(
        &self,
        tags: &[String],
    ) -> Result<HashSet<ObservationMessage>, HarvestError>;

    /// Observations around a point
    async fn search_by_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ObservationMessage>, HarvestError>;
}
