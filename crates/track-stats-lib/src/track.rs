//! Track handle with a compute-once segment cache
//!
//! A `Track` owns the raw points of its segments and lazily accumulates them into
//! [`SegmentInfo`]s the first time any analysis needs them. The accumulated data is kept
//! for the lifetime of the track; concurrent first requests are coalesced into a single pass.

use crate::{
    Config, Coordinate, NearestPoint, PointAtDistance, RawPoint, Result, SegmentInfo, TrackError,
    find_nearest, locate,
};
use once_cell::sync::OnceCell;
use rayon::prelude::*;

/// Raw points of one segment, in recording order
pub type RawSegment = Vec<RawPoint>;

/// Aggregate statistics over all segments of a track
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSummary {
    /// Number of segments in the track
    pub segment_count: usize,
    /// Total number of points across all segments
    pub point_count: usize,
    /// Sum of segment distances in meters (gaps between segments are not counted)
    pub total_distance: f64,
    /// Sum of segment elevation gains in meters
    pub total_elevation_gain: f64,
    /// Sum of segment elevation losses in meters
    pub total_elevation_loss: f64,
}

/// A named path made of one or more segments
#[derive(Clone, Debug)]
pub struct Track {
    /// Name from the source, `None` when the source has no name for this track
    name: Option<String>,
    /// Raw segments, `None` when the source could not enumerate them
    segments: Option<Vec<RawSegment>>,
    /// Accumulation settings
    config: Config,
    /// Accumulated segments, populated on first use
    segment_info: OnceCell<Vec<SegmentInfo>>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Track {
    /// Create a track from raw segments with the default configuration
    pub fn new(name: Option<String>, segments: Vec<RawSegment>) -> Self {
        Self::from_parts(name, Some(segments), Config::default())
    }

    /// Create a track from whatever a source could provide
    ///
    /// Passing `None` for `segments` marks the segment list as unavailable: any analysis
    /// on the track then fails with `MissingSegments`.
    pub fn from_parts(
        name: Option<String>,
        segments: Option<Vec<RawSegment>>,
        config: Config,
    ) -> Self {
        Self {
            name,
            segments,
            config,
            segment_info: OnceCell::new(),
        }
    }

    /// Create a track from a parsed GPX track
    pub fn from_gpx(track: &gpx::Track, config: Config) -> Self {
        let segments = track
            .segments
            .iter()
            .map(|segment| segment.points.iter().map(RawPoint::from).collect())
            .collect();
        Self::from_parts(track.name.clone(), Some(segments), config)
    }

    /// Name of the track, if the source provides one
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Raw segments as provided by the source
    #[inline]
    pub fn raw_segments(&self) -> Option<&[RawSegment]> {
        self.segments.as_deref()
    }

    /// Number of segments, or `None` when the source could not enumerate them
    #[inline]
    pub fn segment_count(&self) -> Option<usize> {
        self.segments.as_ref().map(Vec::len)
    }

    /// Whether the segment cache has been populated
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.segment_info.get().is_some()
    }

    /// Accumulated info for every segment, computed at most once per track
    ///
    /// The first successful call runs the accumulator over all segments and stores the result;
    /// later calls return the stored slice. A failure in any segment fails the whole call and
    /// leaves the cache empty.
    ///
    /// # Errors
    /// * `MissingSegments` if the source could not enumerate segments
    /// * `MalformedInput` if any point has an invalid latitude or longitude
    pub fn load_all_segment_info(&self) -> Result<&[SegmentInfo]> {
        let infos = self
            .segment_info
            .get_or_try_init(|| self.compute_segment_info())?;
        Ok(infos)
    }

    fn compute_segment_info(&self) -> Result<Vec<SegmentInfo>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("track::compute_segment_info");

        let segments = self
            .segments
            .as_deref()
            .ok_or(TrackError::MissingSegments)?;
        let point_count: usize = segments.iter().map(Vec::len).sum();

        let infos = if self.runs_in_parallel(segments.len(), point_count) {
            segments
                .par_iter()
                .map(|segment| SegmentInfo::from_raw(segment))
                .collect::<Result<Vec<_>>>()?
        } else {
            segments
                .iter()
                .map(|segment| SegmentInfo::from_raw(segment))
                .collect::<Result<Vec<_>>>()?
        };

        tracing::debug!(
            "Accumulated {} segments ({} points) for track {:?}",
            infos.len(),
            point_count,
            self.name
        );

        Ok(infos)
    }

    /// Whether per-segment work should be spread over the rayon pool
    fn runs_in_parallel(&self, segment_count: usize, point_count: usize) -> bool {
        self.config.parallel && segment_count > 1 && point_count >= self.config.parallel_threshold
    }

    /// Accumulated info for a single segment
    pub fn segment(&self, segment_index: usize) -> Result<&SegmentInfo> {
        let infos = self.load_all_segment_info()?;
        infos.get(segment_index).ok_or(TrackError::NoSuchSegment {
            index: segment_index,
            count: infos.len(),
        })
    }

    /// Position at `target_distance` meters along the given segment
    pub fn point_at_distance(
        &self,
        target_distance: f64,
        segment_index: usize,
    ) -> Result<PointAtDistance> {
        locate(&self.segment(segment_index)?.points, target_distance)
    }

    /// Nearest recorded point of one segment
    pub fn find_nearest_in_segment(
        &self,
        coordinate: &Coordinate,
        segment_index: usize,
    ) -> Result<NearestPoint> {
        find_nearest(&self.segment(segment_index)?.points, coordinate, segment_index)
    }

    /// Nearest recorded point of every segment, in segment order
    ///
    /// Fails with `EmptyCollection` if any segment has no points.
    pub fn find_nearest_in_track(&self, coordinate: &Coordinate) -> Result<Vec<NearestPoint>> {
        let infos = self.load_all_segment_info()?;
        let point_count: usize = infos.iter().map(SegmentInfo::len).sum();

        if self.runs_in_parallel(infos.len(), point_count) {
            infos
                .par_iter()
                .enumerate()
                .map(|(i, info)| find_nearest(&info.points, coordinate, i))
                .collect()
        } else {
            infos
                .iter()
                .enumerate()
                .map(|(i, info)| find_nearest(&info.points, coordinate, i))
                .collect()
        }
    }

    /// Nearest point of one segment when `segment_index` is given, else of every segment
    pub fn find_nearest(
        &self,
        coordinate: &Coordinate,
        segment_index: Option<usize>,
    ) -> Result<Vec<NearestPoint>> {
        match segment_index {
            Some(index) => Ok(vec![self.find_nearest_in_segment(coordinate, index)?]),
            None => self.find_nearest_in_track(coordinate),
        }
    }

    /// Total distance of each segment in meters
    pub fn segment_lengths(&self) -> Result<Vec<f64>> {
        Ok(self
            .load_all_segment_info()?
            .iter()
            .map(|info| info.total_distance)
            .collect())
    }

    /// Totals over all segments
    pub fn summary(&self) -> Result<TrackSummary> {
        let infos = self.load_all_segment_info()?;
        Ok(infos.iter().fold(
            TrackSummary {
                segment_count: infos.len(),
                ..TrackSummary::default()
            },
            |mut summary, info| {
                summary.point_count += info.len();
                summary.total_distance += info.total_distance;
                summary.total_elevation_gain += info.total_elevation_gain;
                summary.total_elevation_loss += info.total_elevation_loss;
                summary
            },
        ))
    }
}
