//! Track Stats Library - Distance and Elevation Analysis for GPX Tracks
//!
//! This library turns the raw points of GPX track segments into cumulative distance and
//! elevation profiles, and answers two kinds of lookups on top of them: which point lies at
//! a given travelled distance, and which recorded point is nearest to a query coordinate.
//!
//! # Architecture
//!
//! - **[`Coordinate`]**: Validated geodetic position and the ellipsoidal positional distance
//! - **[`SegmentInfo`]**: Accumulated per-segment profile of [`AnnotatedPoint`]s plus totals
//! - **[`locate`]**: Binary search + linear interpolation by cumulative distance
//! - **[`find_nearest`]**: Linear scan for the nearest recorded point
//! - **[`Track`]**: Track handle with a lazily populated, compute-once segment cache
//! - **[`TrackDocument`]**: GPX adapter that lists tracks and their names
//!
//! # Performance Characteristics
//!
//! - **Accumulation**: O(N) per segment, segments processed in parallel
//! - **Distance lookup**: O(log N)
//! - **Nearest lookup**: O(N) per segment

mod coordinate;
mod document;
mod locate;
mod nearest;
mod segment;
mod track;

// Public API exports
pub use coordinate::{
    Coordinate, EARTH_FLATTENING, EARTH_SEMI_MAJOR_AXIS, RawPoint, distance, distance_from,
};
pub use document::{Config, DEFAULT_TRACK_NAME, TrackDocument};
pub use locate::{PointAtDistance, locate};
pub use nearest::{NearestPoint, PointKey, find_nearest, find_nearest_by};
pub use segment::{AnnotatedPoint, SegmentInfo, accumulate};
pub use track::{RawSegment, Track, TrackSummary};

/// Error types for track analysis
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Operation requires at least one point")]
    EmptyCollection,

    #[error("Distance {target} is outside the segment range [{min}, {max}]")]
    OutOfBounds { target: f64, min: f64, max: f64 },

    #[error("No segment at index {index} (track has {count})")]
    NoSuchSegment { index: usize, count: usize },

    #[error("Track segments could not be enumerated")]
    MissingSegments,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
