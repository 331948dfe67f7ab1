//! StatsPerform tracking stream (.txt)
//!
//! One line per frame:
//!
//! ```text
//! systemclock;gameclock_ms,segment,ballstatus:team,pID,jID,x,y;team,pID,jID,x,y;...:x,y,z;
//! ```
//!
//! The ball chunk after the second `:` is optional. The file carries no
//! framerate; it is estimated from the gameclock (see `PeriodTracker`).

use std::fs;
use std::path::Path;

use super::fields::parse_required;
use crate::config::{ParserConfig, TxtFormatCodes};
use crate::error::{Diagnostics, ParseError, ParseWarning, Result};
use crate::io::assembly::PositionAssembler;
use crate::io::segments::PeriodTracker;
use crate::io::teamsheet_builder::{resolve_teamsheets, JerseyCollector};
use crate::io::TrackingData;
use crate::models::{PerTeam, SegmentKey, Team, Teamsheet};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSample {
    /// `None` when the raw code is neither a home nor an away code
    pub team: Option<Team>,
    pub raw_team: String,
    pub player_id: String,
    pub jersey: u32,
    pub position: (f64, f64),
}

/// One decoded frame of the tracking stream
#[derive(Debug, Clone, PartialEq)]
pub struct TxtFrame {
    pub gameclock_ms: i64,
    pub segment: u32,
    pub players: Vec<PlayerSample>,
    pub ball: Option<(f64, f64)>,
}

fn decode_player_chunk(chunk: &str, line: usize, codes: &TxtFormatCodes) -> Result<PlayerSample> {
    let fields: Vec<&str> = chunk.split(',').map(str::trim).collect();
    if fields.len() != 5 {
        return Err(ParseError::malformed(
            line,
            format!("player chunk '{}' has {} fields, expected 5", chunk, fields.len()),
        ));
    }

    Ok(PlayerSample {
        team: codes.team(fields[0]),
        raw_team: fields[0].to_string(),
        player_id: fields[1].to_string(),
        jersey: parse_required(fields[2], line, "jersey")?,
        position: (parse_required(fields[3], line, "x")?, parse_required(fields[4], line, "y")?),
    })
}

fn decode_ball_chunk(chunk: &str, line: usize) -> Result<Option<(f64, f64)>> {
    let first = chunk.split(';').next().unwrap_or("").trim();
    if first.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = first.split(',').collect();
    if fields.len() != 3 {
        return Err(ParseError::malformed(
            line,
            format!("ball chunk '{}' has {} fields, expected 3", first, fields.len()),
        ));
    }
    // z is read for validation only
    let x: f64 = parse_required(fields[0], line, "ball x")?;
    let y: f64 = parse_required(fields[1], line, "ball y")?;
    let _z: f64 = parse_required(fields[2], line, "ball z")?;
    Ok(Some((x, y)))
}

/// Decode one line of the tracking stream
pub fn decode_tracking_txt_line(line: &str, line_no: usize, codes: &TxtFormatCodes) -> Result<TxtFrame> {
    let chunks: Vec<&str> = line.trim_end().split(':').collect();
    if chunks.len() < 2 {
        return Err(ParseError::malformed(line_no, "expected time and player chunks"));
    }

    let time_info = chunks[0]
        .split(';')
        .nth(1)
        .ok_or_else(|| ParseError::malformed(line_no, "time chunk without gameclock"))?;
    let mut time_fields = time_info.split(',');
    let gameclock_ms = parse_required(time_fields.next().unwrap_or(""), line_no, "gameclock")?;
    let segment = parse_required(
        time_fields
            .next()
            .ok_or_else(|| ParseError::malformed(line_no, "time chunk without segment"))?,
        line_no,
        "segment",
    )?;

    let players = chunks[1]
        .split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| decode_player_chunk(chunk, line_no, codes))
        .collect::<Result<Vec<_>>>()?;

    let ball = match chunks.get(2) {
        Some(chunk) => decode_ball_chunk(chunk, line_no)?,
        None => None,
    };

    Ok(TxtFrame { gameclock_ms, segment, players, ball })
}

fn decode_all(content: &str, codes: &TxtFormatCodes) -> Result<Vec<TxtFrame>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| decode_tracking_txt_line(line, idx + 1, codes))
        .collect()
}

fn collect_jerseys(frames: &[TxtFrame]) -> JerseyCollector {
    let mut collector = JerseyCollector::new();
    for frame in frames {
        for sample in &frame.players {
            if let Some(team) = sample.team {
                collector.observe(team, sample.jersey, None);
            }
        }
    }
    collector
}

/// Simple teamsheets (placeholder names and jersey numbers) from the
/// jerseys found in a tracking stream
pub fn read_teamsheets_from_tracking_data_txt<P: AsRef<Path>>(path: P) -> Result<PerTeam<Teamsheet>> {
    let content = fs::read_to_string(path.as_ref())?;
    let frames = decode_all(&content, &ParserConfig::default().txt_codes)?;
    collect_jerseys(&frames).finish(None)
}

pub fn parse_tracking_data_txt(
    content: &str,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
    config: &ParserConfig,
) -> Result<TrackingData> {
    let frames = decode_all(content, &config.txt_codes)?;

    let mut diag = Diagnostics::default();
    let mut tracker = PeriodTracker::new();
    for frame in &frames {
        tracker.observe(SegmentKey::Index(frame.segment), frame.gameclock_ms);
        for sample in frame.players.iter().filter(|s| s.team.is_none()) {
            diag.warn(ParseWarning::UnknownTeamIdentifier { raw: sample.raw_team.clone() });
        }
    }
    let (periods, framerate, period_diag) = tracker.finish();
    diag.extend(period_diag);

    let teamsheets = resolve_teamsheets(home_teamsheet, away_teamsheet, true, || {
        collect_jerseys(&frames).finish(None)
    })?;

    let mut assembler = PositionAssembler::new(
        &teamsheets,
        periods.iter().map(|(segment, period)| (segment.clone(), period.frame_count_at(framerate))),
        framerate,
    );

    for frame in &frames {
        let segment = SegmentKey::Index(frame.segment);
        let Some(offset) = periods
            .get(&segment)
            .and_then(|p| p.frame_offset_at(frame.gameclock_ms, framerate))
        else {
            continue;
        };

        for sample in &frame.players {
            if let Some(team) = sample.team {
                assembler.place_player(&segment, offset, team, sample.jersey, sample.position);
            }
        }
        if let Some(ball) = frame.ball {
            assembler.place_ball(&segment, offset, ball);
        }
    }

    let (xy, ball, placement_diag) = assembler.finish();
    diag.extend(placement_diag);

    log::debug!(
        "Tracking txt: {} frames, {} segment(s), framerate {:?}",
        frames.len(),
        periods.len(),
        framerate
    );

    Ok(TrackingData {
        xy,
        ball,
        possession: Default::default(),
        periods,
        framerate,
        pitch: None,
        teamsheets,
        warnings: diag.into_warnings(),
    })
}

/// Parse a StatsPerform tracking .txt file into position and ball buffers.
/// The framerate is estimated from the gameclock; teamsheets not supplied
/// are derived from the jerseys in the file.
pub fn read_tracking_data_txt<P: AsRef<Path>>(
    path: P,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
) -> Result<TrackingData> {
    read_tracking_data_txt_with_config(path, home_teamsheet, away_teamsheet, &ParserConfig::default())
}

pub fn read_tracking_data_txt_with_config<P: AsRef<Path>>(
    path: P,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
    config: &ParserConfig,
) -> Result<TrackingData> {
    let path = path.as_ref();
    log::info!("Reading tracking txt {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_tracking_data_txt(&content, home_teamsheet, away_teamsheet, config)
}
