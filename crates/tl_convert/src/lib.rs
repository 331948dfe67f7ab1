//! tl_convert library
//!
//! Runs one of the tl_core readers on a file and condenses the result into a
//! JSON-friendly summary (segments, shapes, event counts, teamsheets,
//! warnings).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tl_core::io::statsperform::{
    read_event_data_xml_with_config, read_open_event_data_csv_with_config,
    read_open_tracking_data_csv_with_config, read_tracking_data_txt_with_config,
};
use tl_core::{EventData, ParserConfig, Pitch, Teamsheet, TrackingData};

/// Input format
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    OpenEvents,
    OpenTracking,
    EventsXml,
    TrackingTxt,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SourceKind::OpenEvents => "open-events",
            SourceKind::OpenTracking => "open-tracking",
            SourceKind::EventsXml => "events-xml",
            SourceKind::TrackingTxt => "tracking-txt",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub kind: SourceKind,
    pub input: PathBuf,
    pub home_teamsheet: Option<PathBuf>,
    pub away_teamsheet: Option<PathBuf>,
    /// Falls back to `TL_PARSER_CONFIG_PATH`, then defaults
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamsheetSummary {
    pub players: usize,
    pub jerseys: Vec<u32>,
}

impl TeamsheetSummary {
    fn of(sheet: &Teamsheet) -> Self {
        Self {
            players: sheet.len(),
            jerseys: sheet.entries().iter().map(|e| e.j_id).collect(),
        }
    }
}

/// Per segment figures. Tracking sources fill `frames` and the buffer
/// columns, event sources the event counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SegmentSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_ball_frames: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_events: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_events: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub source: SourceKind,
    pub input: String,
    pub framerate: Option<u32>,
    pub pitch: Option<Pitch>,
    pub segments: BTreeMap<String, SegmentSummary>,
    pub home: TeamsheetSummary,
    pub away: TeamsheetSummary,
    pub warnings: Vec<String>,
}

impl Summary {
    pub fn from_tracking(input: &Path, kind: SourceKind, data: &TrackingData) -> Self {
        let segments = data
            .segments()
            .map(|segment| {
                let ball = data.ball.get(segment);
                let summary = SegmentSummary {
                    frames: ball.map(|b| b.frames()),
                    home_columns: data.xy.home.get(segment).map(|xy| xy.shape().1),
                    away_columns: data.xy.away.get(segment).map(|xy| xy.shape().1),
                    missing_ball_frames: ball
                        .map(|b| (0..b.frames()).filter(|&f| b.get(f, 0).is_none()).count()),
                    ..Default::default()
                };
                (segment.to_string(), summary)
            })
            .collect();

        Self {
            source: kind,
            input: input.display().to_string(),
            framerate: data.framerate,
            pitch: data.pitch.clone(),
            segments,
            home: TeamsheetSummary::of(&data.teamsheets.home),
            away: TeamsheetSummary::of(&data.teamsheets.away),
            warnings: data.warnings.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn from_events(input: &Path, kind: SourceKind, data: &EventData) -> Self {
        let mut segments: BTreeMap<String, SegmentSummary> = BTreeMap::new();
        for (segment, events) in &data.events.home {
            segments.entry(segment.to_string()).or_default().home_events = Some(events.len());
        }
        for (segment, events) in &data.events.away {
            segments.entry(segment.to_string()).or_default().away_events = Some(events.len());
        }

        Self {
            source: kind,
            input: input.display().to_string(),
            framerate: None,
            pitch: data.pitch.clone(),
            segments,
            home: TeamsheetSummary::of(&data.teamsheets.home),
            away: TeamsheetSummary::of(&data.teamsheets.away),
            warnings: data.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Teamsheet from a JSON array of player entries
pub fn load_teamsheet(path: &Path) -> Result<Teamsheet> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read teamsheet: {}", path.display()))?;
    Teamsheet::from_json(&json)
        .with_context(|| format!("Invalid teamsheet: {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<ParserConfig> {
    match path {
        Some(path) => ParserConfig::load(path)
            .with_context(|| format!("Failed to load parser config: {}", path.display())),
        None => ParserConfig::from_env().context("Failed to load parser config from environment"),
    }
}

/// Parse the input file and summarise it
pub fn convert(request: &ConvertRequest) -> Result<Summary> {
    let config = load_config(request.config.as_deref())?;
    let home = request.home_teamsheet.as_deref().map(load_teamsheet).transpose()?;
    let away = request.away_teamsheet.as_deref().map(load_teamsheet).transpose()?;
    let input = request.input.as_path();

    log::info!("Converting {} ({})", input.display(), request.kind);
    let context = || format!("Failed to parse {} as {}", input.display(), request.kind);

    let summary = match request.kind {
        SourceKind::OpenEvents => {
            let data = read_open_event_data_csv_with_config(input, home.as_ref(), away.as_ref(), &config)
                .with_context(context)?;
            Summary::from_events(input, request.kind, &data)
        }
        SourceKind::EventsXml => {
            let data = read_event_data_xml_with_config(input, home.as_ref(), away.as_ref(), &config)
                .with_context(context)?;
            Summary::from_events(input, request.kind, &data)
        }
        SourceKind::OpenTracking => {
            let data =
                read_open_tracking_data_csv_with_config(input, home.as_ref(), away.as_ref(), &config)
                    .with_context(context)?;
            Summary::from_tracking(input, request.kind, &data)
        }
        SourceKind::TrackingTxt => {
            let data = read_tracking_data_txt_with_config(input, home.as_ref(), away.as_ref(), &config)
                .with_context(context)?;
            Summary::from_tracking(input, request.kind, &data)
        }
    };

    if !summary.warnings.is_empty() {
        log::warn!("{} warning(s) while parsing {}", summary.warnings.len(), input.display());
    }
    Ok(summary)
}

/// Write the summary as pretty JSON
pub fn write_summary(path: &Path, summary: &Summary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).with_context(|| format!("Failed to write summary: {}", path.display()))?;
    Ok(())
}
