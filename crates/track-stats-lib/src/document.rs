//! TrackDocument - GPX adapter listing the tracks of a parsed file
//!
//! This module reads GPX data with the `gpx` crate and exposes it as [`Track`] handles,
//! preserving document order.

use crate::{Result, Track};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Name reported by [`TrackDocument::track_names`] for tracks without a name
pub const DEFAULT_TRACK_NAME: &str = "No Name";

/// Configuration for segment accumulation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Accumulate the segments of a track in parallel (default: true)
    pub parallel: bool,
    /// Minimum number of points in a track before parallel accumulation kicks in.
    /// Small tracks are faster to process on the calling thread.
    /// Default: 10000
    pub parallel_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 10_000,
        }
    }
}

/// A parsed GPX document
#[derive(Debug, Clone)]
pub struct TrackDocument {
    /// The original GPX data
    gpx_data: gpx::Gpx,
    /// Configuration handed to every track
    config: Config,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl TrackDocument {
    /// Wrap already parsed GPX data
    pub fn new(gpx_data: gpx::Gpx) -> Self {
        Self::with_config(gpx_data, Config::default())
    }

    pub fn with_config(gpx_data: gpx::Gpx, config: Config) -> Self {
        Self { gpx_data, config }
    }

    /// Parse GPX data from a reader
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("document::parse");

        let gpx_data = gpx::read(reader)?;
        tracing::debug!("Parsed GPX document with {} tracks", gpx_data.tracks.len());
        Ok(Self::new(gpx_data))
    }

    /// Parse a GPX file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        Self::parse(reader)
    }

    /// Replace the configuration handed to tracks created from now on
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of tracks in the document
    #[inline]
    pub fn track_count(&self) -> usize {
        self.gpx_data.tracks.len()
    }

    /// Names of all tracks, with [`DEFAULT_TRACK_NAME`] for unnamed tracks
    pub fn track_names(&self) -> Vec<String> {
        self.gpx_data
            .tracks
            .iter()
            .map(|track| {
                track
                    .name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TRACK_NAME.to_string())
            })
            .collect()
    }

    /// All tracks as independent handles, in document order
    pub fn tracks(&self) -> Vec<Track> {
        self.gpx_data
            .tracks
            .iter()
            .map(|track| Track::from_gpx(track, self.config))
            .collect()
    }

    /// A single track by index
    pub fn track(&self, index: usize) -> Option<Track> {
        self.gpx_data
            .tracks
            .get(index)
            .map(|track| Track::from_gpx(track, self.config))
    }
}

impl FromStr for TrackDocument {
    type Err = crate::TrackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackError;
    use gpx::{Gpx, Track as GpxTrack, TrackSegment, Waypoint};

    fn create_test_waypoint(lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(geo::Point::new(lon, lat))
    }

    fn create_test_gpx() -> Gpx {
        let mut gpx = Gpx::default();

        for (i, name) in [Some("First"), None, Some("Third")].iter().enumerate() {
            let mut track = GpxTrack::default();
            track.name = name.map(str::to_string);
            let mut segment = TrackSegment::default();
            for j in 0..10 {
                segment.points.push(create_test_waypoint(
                    51.5074 + i as f64 + j as f64 * 0.0001,
                    -0.1278 + j as f64 * 0.0001,
                ));
            }
            track.segments.push(segment);
            gpx.tracks.push(track);
        }
        gpx
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.parallel);
        assert_eq!(config.parallel_threshold, 10_000);
    }

    #[test]
    fn test_track_names_default() {
        let document = TrackDocument::new(create_test_gpx());
        assert_eq!(
            document.track_names(),
            vec!["First", DEFAULT_TRACK_NAME, "Third"]
        );
    }

    #[test]
    fn test_track_name_preserves_absence() {
        let document = TrackDocument::new(create_test_gpx());
        let tracks = document.tracks();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].name(), Some("First"));
        assert_eq!(tracks[1].name(), None);
        assert_eq!(tracks[2].name(), Some("Third"));
    }

    #[test]
    fn test_track_by_index() {
        let document = TrackDocument::new(create_test_gpx());
        assert_eq!(document.track_count(), 3);
        assert!(document.track(2).is_some());
        assert!(document.track(3).is_none());
    }

    #[test]
    fn test_tracks_inherit_config() {
        let config = Config {
            parallel: false,
            parallel_threshold: 1,
        };
        let document = TrackDocument::with_config(create_test_gpx(), config);
        assert_eq!(*document.config(), config);

        let track = document.track(0).unwrap();
        assert_eq!(track.load_all_segment_info().unwrap()[0].len(), 10);
    }

    #[test]
    fn test_empty_document() {
        let document = TrackDocument::new(Gpx::default());
        assert!(document.track_names().is_empty());
        assert!(document.tracks().is_empty());
    }

    #[test]
    fn test_parse_invalid() {
        let result = "<not-gpx/>".parse::<TrackDocument>();
        assert!(matches!(result, Err(TrackError::GpxParse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = TrackDocument::from_path("/nonexistent/track.gpx");
        assert!(matches!(result, Err(TrackError::Io(_))));
    }
}
