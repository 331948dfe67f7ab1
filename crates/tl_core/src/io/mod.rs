//! Vendor file readers and the shared parsing stages
//!
//! raw file → record decoder → {teamsheet builder, segment resolver}
//!          → position / event assembler → `TrackingData` / `EventData`

pub mod assembly;
pub mod segments;
pub mod statsperform;
pub mod teamsheet_builder;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::ParseWarning;
use crate::models::{Code, Events, PerTeam, Pitch, SegmentKey, Teamsheet, XY};

pub use assembly::{EventTableAssembler, PositionAssembler};
pub use segments::{framerate_from_delta, periods_from_frame_jumps, Period, PeriodTracker};
pub use teamsheet_builder::JerseyCollector;

/// Everything a tracking reader produces for one match
#[derive(Debug, Clone)]
pub struct TrackingData {
    /// Per team, per segment player positions
    pub xy: PerTeam<BTreeMap<SegmentKey, XY>>,
    pub ball: BTreeMap<SegmentKey, XY>,
    /// Ball possession per segment; empty when the source has none
    pub possession: BTreeMap<SegmentKey, Code>,
    pub periods: BTreeMap<SegmentKey, Period>,
    pub framerate: Option<u32>,
    pub pitch: Option<Pitch>,
    pub teamsheets: PerTeam<Teamsheet>,
    pub warnings: Vec<ParseWarning>,
}

impl TrackingData {
    pub fn segments(&self) -> impl Iterator<Item = &SegmentKey> {
        self.periods.keys()
    }
}

/// Everything an event reader produces for one match
#[derive(Debug, Clone, Serialize)]
pub struct EventData {
    /// Per team, per segment event tables
    pub events: PerTeam<BTreeMap<SegmentKey, Events>>,
    pub pitch: Option<Pitch>,
    pub teamsheets: PerTeam<Teamsheet>,
    #[serde(skip)]
    pub warnings: Vec<ParseWarning>,
}
