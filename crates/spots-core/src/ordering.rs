//! Distance ordering with a near-tie rating override.

use std::cmp::Ordering;

use crate::Spot;

/// Two spots closer together than this many meters count as a near-tie and
/// are ranked by rating instead of distance.
pub const RATING_TIE_WINDOW_METERS: f64 = 50.0;

/// A spot paired with its computed distance from the query point, in meters.
///
/// Lives only between row materialization and response encoding; the distance
/// is dropped once the final order is fixed.
#[derive(Debug, Clone)]
pub struct DistancedSpot {
    pub spot: Spot,
    pub distance_meters: f64,
}

/// Pairwise rank rule: spots within [`RATING_TIE_WINDOW_METERS`] of each
/// other order by rating descending, every other pair by distance ascending.
///
/// The window comparison is not transitive: a chain of sub-window gaps can
/// span more than the window, so the final order of such a chain depends on
/// the comparison sequence of the surrounding sort. The rule is applied
/// directly as a comparator rather than collapsed into a transitive key.
#[must_use]
pub fn rank(a: &DistancedSpot, b: &DistancedSpot) -> Ordering {
    if (a.distance_meters - b.distance_meters).abs() < RATING_TIE_WINDOW_METERS {
        b.spot
            .rating
            .partial_cmp(&a.spot.rating)
            .unwrap_or(Ordering::Equal)
    } else {
        a.distance_meters
            .partial_cmp(&b.distance_meters)
            .unwrap_or(Ordering::Equal)
    }
}

/// Sort spots in place by [`rank`].
pub fn sort_by_proximity(spots: &mut [DistancedSpot]) {
    spots.sort_unstable_by(rank);
}
