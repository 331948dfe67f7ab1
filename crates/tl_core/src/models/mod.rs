//! Data containers produced by the readers

pub mod code;
pub mod events;
pub mod pitch;
pub mod team;
pub mod teamsheet;
pub mod xy;

pub use code::Code;
pub use events::{Event, Events, Outcome};
pub use pitch::{Pitch, PitchTemplate};
pub use team::{PerTeam, SegmentKey, Team};
pub use teamsheet::{PlayerEntry, Teamsheet};
pub use xy::{MISSING, XY};
