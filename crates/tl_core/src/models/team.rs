use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Team {
    Home,
    Away,
}

impl Team {
    pub const BOTH: [Team; 2] = [Team::Home, Team::Away];

    pub fn name(self) -> &'static str {
        match self {
            Team::Home => "Home",
            Team::Away => "Away",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per team
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PerTeam<T> {
    pub home: T,
    pub away: T,
}

impl<T> PerTeam<T> {
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }

    pub fn get(&self, team: Team) -> &T {
        match team {
            Team::Home => &self.home,
            Team::Away => &self.away,
        }
    }

    pub fn get_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::Home => &mut self.home,
            Team::Away => &mut self.away,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Team, T) -> U) -> PerTeam<U> {
        PerTeam { home: f(Team::Home, self.home), away: f(Team::Away, self.away) }
    }
}

/// Key of one playing period. Tracking sources number their halves, the
/// event XML labels them (`HT1`, `HT2`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(untagged)]
pub enum SegmentKey {
    Index(u32),
    Label(String),
}

impl SegmentKey {
    /// Numeric keys stay numeric so that "1" and "2" order as halves.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<u32>() {
            Ok(idx) => SegmentKey::Index(idx),
            Err(_) => SegmentKey::Label(raw.to_string()),
        }
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SegmentKey::Index(idx) => write!(f, "{}", idx),
            SegmentKey::Label(label) => f.write_str(label),
        }
    }
}

impl From<u32> for SegmentKey {
    fn from(idx: u32) -> Self {
        SegmentKey::Index(idx)
    }
}

impl From<&str> for SegmentKey {
    fn from(label: &str) -> Self {
        SegmentKey::Label(label.to_string())
    }
}
