//! Command execution and output formatting

use crate::settings::{Command, Settings};
use serde::Serialize;
use std::io::Write;
use track_stats_lib::{
    Coordinate, DEFAULT_TRACK_NAME, NearestPoint, PointAtDistance, Track, TrackDocument,
    TrackError, TrackSummary,
};

/// Errors surfaced by the command line front end
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Track(#[from] TrackError),

    #[error("No track at index {index} (document has {count})")]
    NoSuchTrack { index: usize, count: usize },

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Per-segment line of the `stats` report
#[derive(Debug, Serialize)]
struct SegmentReport {
    segment: usize,
    points: usize,
    distance_m: f64,
    elevation_gain_m: f64,
    elevation_loss_m: f64,
}

#[derive(Debug, Serialize)]
struct TrackReport {
    track: usize,
    name: String,
    segments: Vec<SegmentReport>,
    summary: TrackSummary,
}

/// Load the document named in `settings` and run its command, writing results to `out`
pub fn run(settings: &Settings, out: &mut impl Write) -> Result<(), CliError> {
    let mut document = TrackDocument::from_path(&settings.gpx_file)?;
    document.set_config(settings.config());
    tracing::info!(
        "Loaded {} with {} tracks",
        settings.gpx_file.display(),
        document.track_count()
    );
    execute(&document, &settings.command, settings.json, out)
}

/// Run a single command against an already loaded document
pub fn execute(
    document: &TrackDocument,
    command: &Command,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Names => {
            let names = document.track_names();
            if json {
                serde_json::to_writer_pretty(&mut *out, &names)?;
                writeln!(out)?;
            } else {
                for (i, name) in names.iter().enumerate() {
                    writeln!(out, "{i}\t{name}")?;
                }
            }
        }
        Command::Stats { track } => {
            let reports = match track {
                Some(index) => vec![track_report(*index, &get_track(document, *index)?)?],
                None => document
                    .tracks()
                    .iter()
                    .enumerate()
                    .map(|(i, t)| track_report(i, t))
                    .collect::<Result<Vec<_>, _>>()?,
            };
            if json {
                serde_json::to_writer_pretty(&mut *out, &reports)?;
                writeln!(out)?;
            } else {
                for report in &reports {
                    write_track_report(out, report)?;
                }
            }
        }
        Command::Locate {
            track,
            segment,
            distance,
        } => {
            let result = get_track(document, *track)?.point_at_distance(*distance, *segment)?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &result)?;
                writeln!(out)?;
            } else {
                write_point_at_distance(out, &result)?;
            }
        }
        Command::Nearest {
            track,
            segment,
            lat,
            lon,
            ele,
        } => {
            let query = Coordinate::new(*lat, *lon, *ele)?;
            let results = get_track(document, *track)?.find_nearest(&query, *segment)?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &results)?;
                writeln!(out)?;
            } else {
                for result in &results {
                    write_nearest(out, result)?;
                }
            }
        }
    }
    Ok(())
}

fn get_track(document: &TrackDocument, index: usize) -> Result<Track, CliError> {
    document.track(index).ok_or(CliError::NoSuchTrack {
        index,
        count: document.track_count(),
    })
}

fn track_report(index: usize, track: &Track) -> Result<TrackReport, TrackError> {
    let segments = track
        .load_all_segment_info()?
        .iter()
        .enumerate()
        .map(|(i, info)| SegmentReport {
            segment: i,
            points: info.len(),
            distance_m: info.total_distance,
            elevation_gain_m: info.total_elevation_gain,
            elevation_loss_m: info.total_elevation_loss,
        })
        .collect();

    Ok(TrackReport {
        track: index,
        name: track.name().unwrap_or(DEFAULT_TRACK_NAME).to_string(),
        segments,
        summary: track.summary()?,
    })
}

fn write_track_report(out: &mut impl Write, report: &TrackReport) -> std::io::Result<()> {
    writeln!(out, "Track {}: {}", report.track, report.name)?;
    for segment in &report.segments {
        writeln!(
            out,
            "  segment {}: {} points, {:.1} m, +{:.1} m / -{:.1} m",
            segment.segment,
            segment.points,
            segment.distance_m,
            segment.elevation_gain_m,
            segment.elevation_loss_m
        )?;
    }
    let summary = &report.summary;
    writeln!(
        out,
        "  total: {} segments, {} points, {:.1} m, +{:.1} m / -{:.1} m",
        summary.segment_count,
        summary.point_count,
        summary.total_distance,
        summary.total_elevation_gain,
        summary.total_elevation_loss
    )
}

fn write_point_at_distance(out: &mut impl Write, result: &PointAtDistance) -> std::io::Result<()> {
    let c = &result.estimated_coordinate;
    writeln!(
        out,
        "closest point {}, estimated position {:.7}, {:.7} @ {:.1} m",
        result.closest_point_index,
        c.latitude(),
        c.longitude(),
        c.elevation()
    )
}

fn write_nearest(out: &mut impl Write, result: &NearestPoint) -> std::io::Result<()> {
    writeln!(
        out,
        "segment {}: point {} at {:.1} m",
        result.key.segment_index, result.key.point_index, result.distance
    )
}
