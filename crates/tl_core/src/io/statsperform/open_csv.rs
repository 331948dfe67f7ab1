//! StatsPerform open format (CSV)
//!
//! Two files per match:
//! - event CSV: positional columns, one event per line, header row marked by
//!   `current_phase` in column 3
//! - tracking CSV: named columns, one row per object per frame, both halves
//!   on one running `frame_count`
//!
//! Team codes: home 1, away 2, ball 4 (see `OpenFormatCodes`). The format
//! has no clock, so positions use the configured framerate (10 Hz).

use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::fields::{
    optional_text, parse_optional_f64, parse_optional_int, parse_optional_jersey,
    parse_required,
};
use crate::config::ParserConfig;
use crate::error::{Diagnostics, ParseError, ParseWarning, Result};
use crate::io::assembly::{EventTableAssembler, PositionAssembler};
use crate::io::segments::periods_from_frame_jumps;
use crate::io::teamsheet_builder::{resolve_teamsheets, JerseyCollector};
use crate::io::{EventData, TrackingData};
use crate::models::{
    Code, Event, Outcome, PerTeam, Pitch, PitchTemplate, SegmentKey, Team, Teamsheet, MISSING,
};

const HEADER_MARKER: &str = "current_phase";
const EVENT_FIELD_COUNT: usize = 20;

/// Qualifier names of event CSV columns, by column index
const EVENT_QUALIFIER_COLUMNS: [(usize, &str); 13] = [
    (1, "event_id"),
    (6, "event_type_id"),
    (7, "sequencenumber"),
    (10, "jersey_no"),
    (11, "is_pass"),
    (12, "is_cross"),
    (13, "is_corner"),
    (14, "is_free_kick"),
    (15, "is_goal_kick"),
    (16, "passtypeid"),
    (17, "wintypeid"),
    (18, "savetypeid"),
    (19, "possessionnumber"),
];

/// One decoded line of the event CSV
#[derive(Debug, Clone, PartialEq)]
pub struct OpenEventRecord {
    pub event: Event,
    /// Raw `team_id` cell; empty when the event has no team
    pub team_raw: String,
    pub segment: SegmentKey,
}

fn record_line(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

fn is_event_header(record: &StringRecord) -> bool {
    record.get(3).map(str::trim) == Some(HEADER_MARKER)
}

/// Decode one event CSV line
pub fn decode_open_event_record(record: &StringRecord, line: usize) -> Result<OpenEventRecord> {
    if record.len() < EVENT_FIELD_COUNT {
        return Err(ParseError::malformed(
            line,
            format!("expected {} fields, found {}", EVENT_FIELD_COUNT, record.len()),
        ));
    }

    let description = &record[5];
    let outcome = if description.split(' ').any(|w| w == "Won") {
        Outcome::Success
    } else if description.split(' ').any(|w| w == "Lost") {
        Outcome::Fail
    } else {
        Outcome::Unknown
    };

    let gameclock: f64 = parse_required(&record[4], line, "gameclock")?;
    let qualifier = EVENT_QUALIFIER_COLUMNS
        .iter()
        .map(|&(idx, name)| (name.to_string(), record[idx].trim().to_string()))
        .collect();

    let event = Event {
        e_id: description.replace(' ', ""),
        frameclock: parse_optional_f64(&record[2], line, "frameclock")?,
        p_id: optional_text(&record[8]),
        t_id: optional_text(&record[9]),
        outcome,
        qualifier,
        ..Default::default()
    }
    .with_gameclock(gameclock);

    Ok(OpenEventRecord {
        event,
        team_raw: record[9].trim().to_string(),
        segment: SegmentKey::parse(&record[3]),
    })
}

/// Map a raw open-format team code to a team. Unknown codes are reported and
/// resolve to no team; the ball code resolves to no team silently.
fn resolve_team_code(
    code: Option<i64>,
    raw: &str,
    config: &ParserConfig,
    diag: &mut Diagnostics,
) -> Option<Team> {
    let code = code?;
    let team = config.open_codes.team(code);
    if team.is_none() && code != config.open_codes.ball {
        diag.warn(ParseWarning::UnknownTeamIdentifier { raw: raw.trim().to_string() });
    }
    team
}

fn team_id_strings(config: &ParserConfig) -> PerTeam<String> {
    PerTeam::new(config.open_codes.home.to_string(), config.open_codes.away.to_string())
}

fn column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
}

fn open_teamsheets_from_str(
    content: &str,
    config: &ParserConfig,
) -> Result<(PerTeam<Teamsheet>, Diagnostics)> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    let team_col = column(&headers, "team_id")?;
    let player_col = column(&headers, "player_id")?;
    let jersey_col = column(&headers, "jersey_no")?;

    let mut diag = Diagnostics::default();
    let mut collector = JerseyCollector::new();
    for result in reader.records() {
        let record = result?;
        let line = record_line(&record);
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let raw_team = field(team_col);
        let code = parse_optional_int(raw_team, line, "team_id")?;
        let Some(team) = resolve_team_code(code, raw_team, config, &mut diag) else {
            continue;
        };
        if let Some(jersey) = parse_optional_jersey(field(jersey_col), line)? {
            collector.observe(team, jersey, optional_text(field(player_col)).as_deref());
        }
    }

    let sheets = collector.finish(Some(&team_id_strings(config)))?;
    Ok((sheets, diag))
}

/// Teamsheets for both teams from an open CSV (events or tracking), using
/// its `team_id`, `player_id` and `jersey_no` columns.
pub fn read_teamsheets_from_open_data_csv<P: AsRef<Path>>(path: P) -> Result<PerTeam<Teamsheet>> {
    let content = fs::read_to_string(path.as_ref())?;
    open_teamsheets_from_str(&content, &ParserConfig::default()).map(|(sheets, _)| sheets)
}

pub fn parse_open_event_data_csv(
    content: &str,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
    config: &ParserConfig,
) -> Result<EventData> {
    let mut diag = Diagnostics::default();
    let teamsheets = resolve_teamsheets(home_teamsheet, away_teamsheet, false, || {
        let (sheets, roster_diag) = open_teamsheets_from_str(content, config)?;
        diag.extend(roster_diag);
        Ok(sheets)
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut assembler = EventTableAssembler::new();
    for result in reader.records() {
        let record = result?;
        if is_event_header(&record) {
            continue;
        }
        let line = record_line(&record);
        let decoded = decode_open_event_record(&record, line)?;

        let code = parse_optional_int(&decoded.team_raw, line, "team_id")?;
        let team = resolve_team_code(code, &decoded.team_raw, config, &mut diag);
        assembler.push(decoded.segment, team, decoded.event);
    }

    Ok(EventData {
        events: assembler.finish(),
        pitch: None,
        teamsheets,
        warnings: diag.into_warnings(),
    })
}

/// Parse an open StatsPerform event CSV into per-team, per-segment event
/// tables. Events without a team are added to both teams.
pub fn read_open_event_data_csv<P: AsRef<Path>>(
    path: P,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
) -> Result<EventData> {
    read_open_event_data_csv_with_config(
        path,
        home_teamsheet,
        away_teamsheet,
        &ParserConfig::default(),
    )
}

pub fn read_open_event_data_csv_with_config<P: AsRef<Path>>(
    path: P,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
    config: &ParserConfig,
) -> Result<EventData> {
    let path = path.as_ref();
    log::info!("Reading open event CSV {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_open_event_data_csv(&content, home_teamsheet, away_teamsheet, config)
}

struct TrackingColumns {
    team: usize,
    player: usize,
    jersey: usize,
    frame: usize,
    x: usize,
    y: usize,
    possession: usize,
    pitch_length: usize,
    pitch_width: usize,
}

impl TrackingColumns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        Ok(Self {
            team: column(headers, "team_id")?,
            player: column(headers, "player_id")?,
            jersey: column(headers, "jersey_no")?,
            frame: column(headers, "frame_count")?,
            x: column(headers, "pos_x")?,
            y: column(headers, "pos_y")?,
            possession: column(headers, "possession")?,
            pitch_length: column(headers, "pitch_dimension_long_side")?,
            pitch_width: column(headers, "pitch_dimension_short_side")?,
        })
    }
}

/// One decoded row of the tracking CSV
#[derive(Debug, Clone, PartialEq)]
struct TrackingRow {
    line: usize,
    team_raw: String,
    team_code: Option<i64>,
    player_id: Option<String>,
    jersey: Option<u32>,
    frame: i64,
    x: Option<f64>,
    y: Option<f64>,
    possession: Option<i64>,
}

fn decode_tracking_row(
    record: &StringRecord,
    cols: &TrackingColumns,
    line: usize,
) -> Result<TrackingRow> {
    let field = |idx: usize| record.get(idx).unwrap_or("");
    let frame = parse_optional_int(field(cols.frame), line, "frame_count")?
        .ok_or_else(|| ParseError::malformed(line, "missing frame_count"))?;

    Ok(TrackingRow {
        line,
        team_raw: field(cols.team).trim().to_string(),
        team_code: parse_optional_int(field(cols.team), line, "team_id")?,
        player_id: optional_text(field(cols.player)),
        jersey: parse_optional_jersey(field(cols.jersey), line)?,
        frame,
        x: parse_optional_f64(field(cols.x), line, "pos_x")?,
        y: parse_optional_f64(field(cols.y), line, "pos_y")?,
        possession: parse_optional_int(field(cols.possession), line, "possession")?,
    })
}

pub fn parse_open_tracking_data_csv(
    content: &str,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
    config: &ParserConfig,
) -> Result<TrackingData> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    let cols = TrackingColumns::locate(&headers)?;

    let mut rows = Vec::new();
    let mut pitch = None;
    for result in reader.records() {
        let record = result?;
        let line = record_line(&record);
        if pitch.is_none() {
            let length = parse_required::<f64>(
                record.get(cols.pitch_length).unwrap_or(""),
                line,
                "pitch_dimension_long_side",
            )?;
            let width = parse_required::<f64>(
                record.get(cols.pitch_width).unwrap_or(""),
                line,
                "pitch_dimension_short_side",
            )?;
            pitch =
                Some(Pitch::from_template(PitchTemplate::StatsperformOpen, length, width, &config.sport));
        }
        rows.push(decode_tracking_row(&record, &cols, line)?);
    }

    // every row resolves its team once; unknown codes are reported here
    let mut diag = Diagnostics::default();
    let teams: Vec<Option<Team>> = rows
        .iter()
        .map(|row| resolve_team_code(row.team_code, &row.team_raw, config, &mut diag))
        .collect();

    let teamsheets = resolve_teamsheets(home_teamsheet, away_teamsheet, true, || {
        let mut collector = JerseyCollector::new();
        for (row, team) in rows.iter().zip(&teams) {
            if let (Some(team), Some(jersey)) = (team, row.jersey) {
                collector.observe(*team, jersey, row.player_id.as_deref());
            }
        }
        collector.finish(Some(&team_id_strings(config)))
    })?;

    let periods = periods_from_frame_jumps(rows.iter().map(|row| row.frame));
    let framerate = Some(config.open_framerate);
    let mut assembler = PositionAssembler::new(
        &teamsheets,
        periods.iter().map(|(segment, period)| (segment.clone(), period.frame_count())),
        framerate,
    );
    let mut possession: BTreeMap<SegmentKey, Vec<Option<i64>>> = periods
        .iter()
        .map(|(segment, period)| (segment.clone(), vec![None; period.frame_count()]))
        .collect();

    for (row, team) in rows.iter().zip(&teams) {
        let Some((segment, period)) = periods.iter().find(|(_, p)| p.contains(row.frame)) else {
            continue;
        };
        let offset = (row.frame - period.start) as usize;
        let position = (row.x.unwrap_or(MISSING), row.y.unwrap_or(MISSING));

        if let Some(team) = team {
            match row.jersey {
                Some(jersey) => assembler.place_player(segment, offset, *team, jersey, position),
                None => log::debug!("Line {}: player row without jersey_no", row.line),
            }
        } else if row.team_code == Some(config.open_codes.ball) {
            assembler.place_ball(segment, offset, position);
            if let Some(codes) = possession.get_mut(segment) {
                codes[offset] = row.possession;
            }
        }
    }

    let (xy, ball, placement_diag) = assembler.finish();
    diag.extend(placement_diag);

    let definitions: BTreeMap<i64, String> = Team::BOTH
        .iter()
        .map(|&team| (config.open_codes.code(team), team.name().to_string()))
        .collect();
    let possession = possession
        .into_iter()
        .map(|(segment, code)| {
            let code = Code {
                name: "possession".to_string(),
                code,
                definitions: definitions.clone(),
                framerate,
            };
            (segment, code)
        })
        .collect();

    log::debug!("Open tracking CSV: {} rows, {} segment(s)", rows.len(), periods.len());

    Ok(TrackingData {
        xy,
        ball,
        possession,
        periods,
        framerate,
        pitch,
        teamsheets,
        warnings: diag.into_warnings(),
    })
}

/// Parse an open StatsPerform tracking CSV into position buffers, ball
/// buffers, possession codes, pitch and teamsheets.
pub fn read_open_tracking_data_csv<P: AsRef<Path>>(
    path: P,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
) -> Result<TrackingData> {
    read_open_tracking_data_csv_with_config(
        path,
        home_teamsheet,
        away_teamsheet,
        &ParserConfig::default(),
    )
}

pub fn read_open_tracking_data_csv_with_config<P: AsRef<Path>>(
    path: P,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
    config: &ParserConfig,
) -> Result<TrackingData> {
    let path = path.as_ref();
    log::info!("Reading open tracking CSV {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_open_tracking_data_csv(&content, home_teamsheet, away_teamsheet, config)
}
