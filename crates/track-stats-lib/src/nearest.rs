//! Nearest recorded point to a query coordinate

use crate::{AnnotatedPoint, Coordinate, Result, TrackError, coordinate};

/// Stable reference back to a raw input point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointKey {
    /// Index of the segment in the track
    pub segment_index: usize,
    /// Index of the point in the segment's raw point list
    pub point_index: usize,
}

/// Result of a nearest-point search over one segment
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearestPoint {
    /// Index of the winning point in the annotated sequence
    pub index: usize,
    /// Positional distance from the query in meters
    pub distance: f64,
    pub key: PointKey,
}

/// Find the point nearest to `query` using the ellipsoidal positional distance
///
/// Ties resolve to the lowest index.
///
/// # Errors
/// * `EmptyCollection` if `points` is empty
#[inline]
pub fn find_nearest(
    points: &[AnnotatedPoint],
    query: &Coordinate,
    segment_index: usize,
) -> Result<NearestPoint> {
    find_nearest_by(points, query, segment_index, coordinate::distance)
}

/// Find the point nearest to `query` under a caller-supplied distance function
///
/// Points whose distance is not finite are skipped.
///
/// # Errors
/// * `EmptyCollection` if `points` is empty
/// * `MalformedInput` if no point has a finite distance to `query`
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn find_nearest_by<F>(
    points: &[AnnotatedPoint],
    query: &Coordinate,
    segment_index: usize,
    distance_fn: F,
) -> Result<NearestPoint>
where
    F: Fn(&Coordinate, &Coordinate) -> f64,
{
    if points.is_empty() {
        return Err(TrackError::EmptyCollection);
    }

    let mut best: Option<(usize, f64)> = None;

    for (index, point) in points.iter().enumerate() {
        let d = distance_fn(query, &point.coordinate);
        if !d.is_finite() {
            continue;
        }
        match best {
            // Strict comparison keeps the first occurrence on ties
            Some((_, best_distance)) if d >= best_distance => {}
            _ => best = Some((index, d)),
        }
    }

    let (index, distance) = best.ok_or_else(|| {
        TrackError::MalformedInput(format!(
            "no finite distance from {query:?} to any of {} points",
            points.len()
        ))
    })?;
    Ok(NearestPoint {
        index,
        distance,
        key: PointKey {
            segment_index,
            point_index: index,
        },
    })
}
