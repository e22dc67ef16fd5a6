//! Per-segment accumulation of distance and elevation profiles

use crate::{Coordinate, RawPoint, Result, coordinate};

/// A coordinate annotated with running totals from the start of its segment
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotatedPoint {
    /// The recorded position
    pub coordinate: Coordinate,
    /// Travelled distance from the first point of the segment in meters
    pub distance_from_start: f64,
    /// Sum of positive elevation changes up to and including this point
    pub elevation_gain_from_start: f64,
    /// Sum of negative elevation changes (as a positive number) up to and including this point
    pub elevation_loss_from_start: f64,
}

/// Accumulated profile of one track segment
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentInfo {
    /// Annotated points, in recording order
    pub points: Vec<AnnotatedPoint>,
    /// Total travelled distance in meters
    pub total_distance: f64,
    /// Total elevation gain in meters
    pub total_elevation_gain: f64,
    /// Total elevation loss in meters
    pub total_elevation_loss: f64,
}

/// Running distance along the segment
#[derive(Debug, Default)]
struct DistanceState {
    total_distance: f64,
    last_point: Option<Coordinate>,
}

/// Running elevation gain and loss along the segment
#[derive(Debug)]
struct ElevationState {
    total_gain: f64,
    total_loss: f64,
    previous_elevation: f64,
}

impl DistanceState {
    #[inline]
    fn step(&mut self, current: &Coordinate) -> f64 {
        self.total_distance += coordinate::distance_from(self.last_point.as_ref(), current);
        self.last_point = Some(*current);
        self.total_distance
    }
}

impl ElevationState {
    /// Seeded from the first point, which contributes no gain or loss
    fn starting_at(first: &Coordinate) -> Self {
        Self {
            total_gain: 0.0,
            total_loss: 0.0,
            previous_elevation: first.elevation(),
        }
    }

    #[inline]
    fn step(&mut self, current: &Coordinate) -> (f64, f64) {
        let diff = current.elevation() - self.previous_elevation;
        if diff >= 0.0 {
            self.total_gain += diff;
        } else {
            self.total_loss -= diff;
        }
        self.previous_elevation = current.elevation();
        (self.total_gain, self.total_loss)
    }
}

/// Accumulate distance and elevation totals over an ordered sequence of points
///
/// Returns a fresh annotated sequence; the input is left untouched. An empty input
/// yields an empty, all-zero [`SegmentInfo`].
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn accumulate(points: &[Coordinate]) -> SegmentInfo {
    let Some(first) = points.first() else {
        return SegmentInfo::default();
    };

    let mut distance = DistanceState::default();
    let mut elevation = ElevationState::starting_at(first);

    let annotated: Vec<AnnotatedPoint> = points
        .iter()
        .map(|point| {
            let distance_from_start = distance.step(point);
            let (gain, loss) = elevation.step(point);
            AnnotatedPoint {
                coordinate: *point,
                distance_from_start,
                elevation_gain_from_start: gain,
                elevation_loss_from_start: loss,
            }
        })
        .collect();

    SegmentInfo {
        points: annotated,
        total_distance: distance.total_distance,
        total_elevation_gain: elevation.total_gain,
        total_elevation_loss: elevation.total_loss,
    }
}

impl SegmentInfo {
    /// Validate raw points and accumulate them
    ///
    /// Fails with `MalformedInput` on the first point with an invalid latitude or longitude.
    pub fn from_raw(points: &[RawPoint]) -> Result<Self> {
        let coordinates = points
            .iter()
            .map(|raw| Coordinate::try_from(*raw))
            .collect::<Result<Vec<_>>>()?;
        Ok(accumulate(&coordinates))
    }

    /// Number of points in the segment
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the segment has no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&AnnotatedPoint> {
        self.points.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&AnnotatedPoint> {
        self.points.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackError;

    fn coord(lat: f64, lon: f64, ele: f64) -> Coordinate {
        Coordinate::new(lat, lon, ele).unwrap()
    }

    fn create_test_points() -> Vec<Coordinate> {
        // A short climb and descent (around London)
        vec![
            coord(51.5074, -0.1278, 10.0),
            coord(51.5076, -0.1276, 14.0),
            coord(51.5078, -0.1274, 12.5),
            coord(51.5078, -0.1274, 12.5),
            coord(51.5081, -0.1270, 20.0),
        ]
    }

    #[test]
    fn test_empty_segment() {
        let info = accumulate(&[]);
        assert!(info.is_empty());
        assert_eq!(info.total_distance, 0.0);
        assert_eq!(info.total_elevation_gain, 0.0);
        assert_eq!(info.total_elevation_loss, 0.0);
    }

    #[test]
    fn test_single_point() {
        let info = accumulate(&[coord(1.0, 2.0, 300.0)]);
        assert_eq!(info.len(), 1);
        assert_eq!(info.points[0].distance_from_start, 0.0);
        assert_eq!(info.points[0].elevation_gain_from_start, 0.0);
        assert_eq!(info.points[0].elevation_loss_from_start, 0.0);
        assert_eq!(info.total_distance, 0.0);
    }

    #[test]
    fn test_total_distance_is_sum_of_steps() {
        let points = create_test_points();
        let info = accumulate(&points);

        let expected: f64 = points
            .windows(2)
            .map(|w| coordinate::distance(&w[0], &w[1]))
            .sum();
        assert!((info.total_distance - expected).abs() < 1e-9);
        assert_eq!(
            info.total_distance,
            info.last().unwrap().distance_from_start
        );
    }

    #[test]
    fn test_distance_monotonic() {
        let info = accumulate(&create_test_points());
        assert_eq!(info.first().unwrap().distance_from_start, 0.0);

        for w in info.points.windows(2) {
            assert!(w[1].distance_from_start >= w[0].distance_from_start);
            if w[0].coordinate != w[1].coordinate {
                assert!(w[1].distance_from_start > w[0].distance_from_start);
            }
        }
    }

    #[test]
    fn test_repeated_point_adds_no_distance() {
        let info = accumulate(&create_test_points());
        assert_eq!(
            info.points[2].distance_from_start,
            info.points[3].distance_from_start
        );
    }

    #[test]
    fn test_elevation_gain_and_loss() {
        let info = accumulate(&create_test_points());

        assert!((info.total_elevation_gain - 11.5).abs() < 1e-9);
        assert!((info.total_elevation_loss - 1.5).abs() < 1e-9);

        // Running totals are inclusive of each point
        assert!((info.points[1].elevation_gain_from_start - 4.0).abs() < 1e-9);
        assert!((info.points[2].elevation_loss_from_start - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_net_elevation_matches_endpoints() {
        let info = accumulate(&create_test_points());
        let first = info.first().unwrap().coordinate.elevation();
        let last = info.last().unwrap().coordinate.elevation();
        let net = info.total_elevation_gain - info.total_elevation_loss;
        assert!((net - (last - first)).abs() < 1e-9);
    }

    #[test]
    fn test_input_untouched() {
        let points = create_test_points();
        let copy = points.clone();
        let info = accumulate(&points);
        assert_eq!(points, copy);
        assert_eq!(info.points[4].coordinate, points[4]);
    }

    #[test]
    fn test_from_raw_fails_fast() {
        let raw = vec![
            RawPoint::new(1.0, 1.0, None),
            RawPoint::new(f64::NAN, 1.0, None),
        ];
        assert!(matches!(
            SegmentInfo::from_raw(&raw),
            Err(TrackError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_from_raw_defaults_missing_elevation() {
        let raw = vec![
            RawPoint::new(1.0, 1.0, None),
            RawPoint::new(1.0, 1.001, Some(5.0)),
        ];
        let info = SegmentInfo::from_raw(&raw).unwrap();
        assert_eq!(info.points[0].coordinate.elevation(), 0.0);
        assert_eq!(info.total_elevation_gain, 5.0);
    }
}
