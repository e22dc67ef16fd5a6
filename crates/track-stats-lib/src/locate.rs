//! Locating the point at a given travelled distance along a segment

use crate::{AnnotatedPoint, Coordinate, Result, TrackError};

/// Result of a distance lookup
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointAtDistance {
    /// Index of the recorded point whose cumulative distance is closest to the target
    pub closest_point_index: usize,
    /// Linear estimate of the position at exactly the target distance
    pub estimated_coordinate: Coordinate,
}

/// Find the position at `target_distance` meters from the start of the segment
///
/// Binary searches for the pair of adjacent points bracketing the target, then interpolates
/// latitude, longitude and elevation linearly between them. When the target hits a recorded
/// distance exactly, that point is returned without interpolation.
///
/// # Errors
/// * `EmptyCollection` if `points` is empty
/// * `OutOfBounds` if the target lies outside the first and last cumulative distances
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn locate(points: &[AnnotatedPoint], target_distance: f64) -> Result<PointAtDistance> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(TrackError::EmptyCollection);
    };

    let min = first.distance_from_start;
    let max = last.distance_from_start;
    // Written negated so that NaN is rejected too
    if !(target_distance >= min && target_distance <= max) {
        return Err(TrackError::OutOfBounds {
            target: target_distance,
            min,
            max,
        });
    }

    let (lower, upper) = bracket(points, target_distance);

    if lower == upper {
        return Ok(PointAtDistance {
            closest_point_index: lower,
            estimated_coordinate: points[lower].coordinate,
        });
    }

    let low = &points[lower];
    let high = &points[upper];
    let below = target_distance - low.distance_from_start;
    let above = high.distance_from_start - target_distance;

    let estimated_coordinate = interpolate(low, high, target_distance);
    let closest_point_index = if below <= above { lower } else { upper };

    Ok(PointAtDistance {
        closest_point_index,
        estimated_coordinate,
    })
}

/// Narrow `[lower, upper]` until the indices are adjacent or equal.
///
/// Maintains `points[lower] <= target <= points[upper]` throughout; an exact hit collapses the
/// interval onto that index. Requires a non-empty slice and an in-range target.
fn bracket(points: &[AnnotatedPoint], target: f64) -> (usize, usize) {
    let mut lower = 0;
    let mut upper = points.len() - 1;

    if points[lower].distance_from_start == target {
        return (lower, lower);
    }
    if points[upper].distance_from_start == target {
        return (upper, upper);
    }

    while upper - lower > 1 {
        let mid = lower + (upper - lower) / 2;
        let probe = points[mid].distance_from_start;

        if probe == target {
            return (mid, mid);
        } else if probe < target {
            lower = mid;
        } else {
            upper = mid;
        }
    }

    (lower, upper)
}

fn interpolate(low: &AnnotatedPoint, high: &AnnotatedPoint, target: f64) -> Coordinate {
    let span = high.distance_from_start - low.distance_from_start;
    if span <= 0.0 {
        return low.coordinate;
    }

    let p = (target - low.distance_from_start) / span;
    let a = &low.coordinate;
    let b = &high.coordinate;

    Coordinate::new_unchecked(
        a.latitude() + p * (b.latitude() - a.latitude()),
        a.longitude() + p * (b.longitude() - a.longitude()),
        a.elevation() + p * (b.elevation() - a.elevation()),
    )
}
