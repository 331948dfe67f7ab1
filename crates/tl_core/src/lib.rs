//! # tl_core - StatsPerform tracking and event data ingestion
//!
//! Reads the StatsPerform vendor formats into one uniform data model:
//! per-team, per-segment position buffers (`XY`), event tables (`Events`),
//! teamsheets with stable column indices (xID), a `Pitch` and possession codes.
//!
//! ## Formats
//! - open event CSV and open tracking CSV
//! - tracking stream (.txt), framerate estimated from the gameclock
//! - event feed (.xml) including the match sheet
//!
//! Missing values are NaN in position buffers and `None` everywhere else.
//! Parsing is single-threaded and deterministic: the same file gives
//! bit-identical output.

// Per-team per-segment maps are spelled out on purpose
#![allow(clippy::type_complexity)]

pub mod config;
pub mod error;
pub mod io;
pub mod models;

pub use config::ParserConfig;
pub use error::{ParseError, ParseWarning, Result};
pub use io::statsperform::{
    read_event_data_xml, read_open_event_data_csv, read_open_tracking_data_csv,
    read_teamsheets_from_event_data_xml, read_teamsheets_from_open_data_csv,
    read_teamsheets_from_tracking_data_txt, read_tracking_data_txt,
};
pub use io::{EventData, Period, TrackingData};
pub use models::{
    Code, Event, Events, Outcome, PerTeam, Pitch, PitchTemplate, PlayerEntry, SegmentKey, Team,
    Teamsheet, MISSING, XY,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
