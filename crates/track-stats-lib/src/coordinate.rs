//! Geodetic coordinates and the ellipsoidal positional distance between them

use crate::{Result, TrackError};
use geo::Point;

/// Semi-major axis of the Earth ellipsoid in meters
pub const EARTH_SEMI_MAJOR_AXIS: f64 = 6378137.0;

/// Flattening of the Earth ellipsoid
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257224;

/// Precomputed constant: (1 - f)²
const ONE_MINUS_F_SQ: f64 = (1.0 - EARTH_FLATTENING) * (1.0 - EARTH_FLATTENING);

/// A point as delivered by a track source, before validation
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Absent when the source has no elevation for this point
    pub elevation: Option<f64>,
}

/// A validated geodetic position
///
/// Latitude and longitude are in degrees, elevation in meters. The fields are only
/// readable through accessors so a constructed coordinate can never become invalid.
/// Deserialization goes through [`RawPoint`] and is validated the same way.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPoint"))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
    elevation: f64,
}

impl RawPoint {
    pub fn new(latitude: f64, longitude: f64, elevation: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }
}

impl From<&gpx::Waypoint> for RawPoint {
    #[inline]
    fn from(waypoint: &gpx::Waypoint) -> Self {
        let point = waypoint.point();
        Self {
            latitude: point.y(),
            longitude: point.x(),
            elevation: waypoint.elevation,
        }
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Result<Self> {
        validate_lat_lon(latitude, longitude)?;
        if !elevation.is_finite() {
            return Err(TrackError::MalformedInput(format!(
                "elevation must be finite, got {elevation}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            elevation,
        })
    }

    /// Build from values already known to be valid (e.g. interpolated between two coordinates)
    #[inline]
    pub(crate) fn new_unchecked(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[inline]
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Convert to ellipsoidal Cartesian coordinates `[x, y, z]` in meters
    #[inline(always)]
    pub fn to_cartesian(&self) -> [f64; 3] {
        let (sin_lat, cos_lat) = self.latitude.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.longitude.to_radians().sin_cos();

        let c = 1.0 / (cos_lat * cos_lat + ONE_MINUS_F_SQ * sin_lat * sin_lat).sqrt();
        let s = ONE_MINUS_F_SQ * c;

        let horizontal = (EARTH_SEMI_MAJOR_AXIS * c + self.elevation) * cos_lat;
        [
            horizontal * cos_lon,
            horizontal * sin_lon,
            (EARTH_SEMI_MAJOR_AXIS * s + self.elevation) * sin_lat,
        ]
    }
}

fn validate_lat_lon(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(TrackError::MalformedInput(format!(
            "latitude must be a number in [-90, 90], got {latitude}"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(TrackError::MalformedInput(format!(
            "longitude must be a number in [-180, 180], got {longitude}"
        )));
    }
    Ok(())
}

impl TryFrom<RawPoint> for Coordinate {
    type Error = TrackError;

    fn try_from(raw: RawPoint) -> Result<Self> {
        validate_lat_lon(raw.latitude, raw.longitude)?;

        let elevation = match raw.elevation {
            Some(ele) if ele.is_finite() => ele,
            Some(ele) => {
                tracing::warn!(
                    "Ignoring non-finite elevation {} at ({}, {})",
                    ele,
                    raw.latitude,
                    raw.longitude
                );
                0.0
            }
            None => 0.0,
        };

        Ok(Self::new_unchecked(raw.latitude, raw.longitude, elevation))
    }
}

impl TryFrom<Point<f64>> for Coordinate {
    type Error = TrackError;

    /// Interprets `x` as longitude and `y` as latitude, at zero elevation
    fn try_from(point: Point<f64>) -> Result<Self> {
        Coordinate::new(point.y(), point.x(), 0.0)
    }
}

impl From<Coordinate> for Point<f64> {
    #[inline]
    fn from(coordinate: Coordinate) -> Self {
        Point::new(coordinate.longitude, coordinate.latitude)
    }
}

/// Euclidean distance between the ellipsoidal Cartesian forms of two coordinates, in meters
///
/// Accounts for both horizontal separation and elevation difference.
#[inline]
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let [x1, y1, z1] = a.to_cartesian();
    let [x2, y2, z2] = b.to_cartesian();
    ((x2 - x1).powi(2) + (y2 - y1).powi(2) + (z2 - z1).powi(2)).sqrt()
}

/// Distance from an optional previous coordinate; zero when there is none
#[inline]
pub fn distance_from(previous: Option<&Coordinate>, current: &Coordinate) -> f64 {
    previous.map_or(0.0, |prev| distance(prev, current))
}
