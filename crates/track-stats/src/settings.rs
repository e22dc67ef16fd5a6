use clap::{Parser, Subcommand};
use std::path::PathBuf;
use track_stats_lib::Config;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Track Stats - Distance, elevation and point lookups for GPX tracks
pub struct Settings {
    /// GPX file to analyze
    #[clap(value_name = "FILE")]
    pub gpx_file: PathBuf,

    /// Log filter (RUST_LOG syntax), e.g. "debug" or "track_stats_lib=trace"
    #[clap(long, env = "TRACK_STATS_LOG")]
    pub log_level: Option<String>,

    /// Print results as JSON instead of text
    #[clap(long, env = "TRACK_STATS_JSON", default_value = "false")]
    pub json: bool,

    /// Accumulate segments on the calling thread only
    #[clap(long, default_value = "false")]
    pub sequential: bool,

    /// Minimum number of points in a track before segments are accumulated in parallel
    #[clap(long, default_value = "10000")]
    pub parallel_threshold: usize,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List track names
    Names,

    /// Distance and elevation totals per segment
    Stats {
        /// Only report this track (default: all tracks)
        #[clap(short, long)]
        track: Option<usize>,
    },

    /// Find the position at a travelled distance along a segment
    Locate {
        #[clap(short, long, default_value = "0")]
        track: usize,

        #[clap(short, long, default_value = "0")]
        segment: usize,

        /// Distance from the segment start in meters
        #[clap(short, long, allow_negative_numbers = true)]
        distance: f64,
    },

    /// Find the recorded point nearest to a coordinate
    Nearest {
        #[clap(short, long, default_value = "0")]
        track: usize,

        /// Only search this segment (default: one result per segment)
        #[clap(short, long)]
        segment: Option<usize>,

        /// Latitude in degrees
        #[clap(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[clap(long, allow_negative_numbers = true)]
        lon: f64,

        /// Elevation in meters
        #[clap(long, default_value = "0.0", allow_negative_numbers = true)]
        ele: f64,
    },
}

impl Settings {
    /// Accumulation settings for the library
    pub fn config(&self) -> Config {
        Config {
            parallel: !self.sequential,
            parallel_threshold: self.parallel_threshold,
        }
    }
}
