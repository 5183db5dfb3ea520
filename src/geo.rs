//! Point-to-area conversion for location searches.

use crate::harvesters::types::BoundingBox;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Square box centered on (`latitude`, `longitude`) reaching `half_extent_m`
/// meters in each direction.
///
/// Meters are converted to degrees with the equirectangular approximation
/// at the given latitude. Every edge is clamped to the valid coordinate
/// range, so boxes touching a pole or the antimeridian are cut off there.
pub fn bbox_around(latitude: f64, longitude: f64, half_extent_m: f64) -> BoundingBox {
    let d_lat = (half_extent_m / EARTH_RADIUS_M).to_degrees();
    let cos_lat = latitude.to_radians().cos().abs();
    let d_lon = if cos_lat > f64::EPSILON {
        (half_extent_m / (EARTH_RADIUS_M * cos_lat))
            .to_degrees()
            .min(180.0)
    } else {
        180.0
    };

    BoundingBox::new(
        (longitude - d_lon).max(-180.0),
        (latitude - d_lat).max(-90.0),
        (longitude + d_lon).min(180.0),
        (latitude + d_lat).min(90.0),
    )
}
