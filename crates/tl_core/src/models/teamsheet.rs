//! Teamsheet - roster of one team in one match
//!
//! The xID of a player is its column-pair index in the team's position
//! buffer. It is handed out in a separate step after the roster is final:
//! 1. collect the distinct jersey numbers
//! 2. sort ascending, xID = rank (0-based)
//!
//! Row order of the teamsheet therefore never influences the xID.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{ParseError, Result};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlayerEntry {
    /// Display name
    pub player: String,
    /// Jersey number
    #[serde(rename = "jID")]
    pub j_id: u32,
    #[serde(rename = "pID", default, skip_serializing_if = "Option::is_none")]
    pub p_id: Option<String>,
    #[serde(rename = "tID", default, skip_serializing_if = "Option::is_none")]
    pub t_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<bool>,
    #[serde(rename = "xID", default, skip_serializing_if = "Option::is_none")]
    pub x_id: Option<usize>,
}

impl PlayerEntry {
    pub fn new(player: impl Into<String>, j_id: u32) -> Self {
        Self {
            player: player.into(),
            j_id,
            p_id: None,
            t_id: None,
            team_name: None,
            position: None,
            started: None,
            x_id: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Teamsheet {
    entries: Vec<PlayerEntry>,
}

impl Teamsheet {
    /// Build a teamsheet, rejecting duplicate jersey numbers
    pub fn new(entries: Vec<PlayerEntry>) -> Result<Self> {
        let sheet = Self { entries };
        sheet.validate()?;
        Ok(sheet)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let sheet: Teamsheet = serde_json::from_str(json)?;
        sheet.validate()?;
        Ok(sheet)
    }

    /// Jersey numbers must be unique. xIDs, where present, must be unique and
    /// below the roster size, so that a complete sheet maps onto `0..len`.
    pub fn validate(&self) -> Result<()> {
        let mut jerseys = BTreeSet::new();
        let mut x_ids = BTreeSet::new();
        for entry in &self.entries {
            if !jerseys.insert(entry.j_id) {
                return Err(ParseError::InvalidTeamsheet(format!(
                    "jersey number {} appears more than once",
                    entry.j_id
                )));
            }
            let Some(x_id) = entry.x_id else {
                continue;
            };
            if x_id >= self.entries.len() {
                return Err(ParseError::InvalidTeamsheet(format!(
                    "xID {} of jersey {} is outside 0..{}",
                    x_id,
                    entry.j_id,
                    self.entries.len()
                )));
            }
            if !x_ids.insert(x_id) {
                return Err(ParseError::InvalidTeamsheet(format!(
                    "xID {} is assigned to more than one player",
                    x_id
                )));
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[PlayerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_x_ids(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| e.x_id.is_some())
    }

    /// Assign xIDs by ascending jersey number. xIDs already present are kept;
    /// the remaining players fill the unused indices in jersey order.
    pub fn add_x_ids(&mut self) {
        let used: BTreeSet<usize> = self.entries.iter().filter_map(|e| e.x_id).collect();
        let mut free = (0..).filter(|x_id| !used.contains(x_id));

        let mut pending: Vec<&mut PlayerEntry> =
            self.entries.iter_mut().filter(|e| e.x_id.is_none()).collect();
        pending.sort_by_key(|e| e.j_id);
        for entry in pending {
            entry.x_id = free.next();
        }
    }

    /// Number of player column pairs a position buffer needs
    pub fn slot_count(&self) -> usize {
        self.entries.iter().filter_map(|e| e.x_id).max().map_or(0, |max| max + 1)
    }

    /// jID → xID lookup. Entries without xID are skipped.
    pub fn jersey_to_x_id(&self) -> FxHashMap<u32, usize> {
        self.entries.iter().filter_map(|e| e.x_id.map(|x| (e.j_id, x))).collect()
    }

    /// pID → jID lookup. Entries without pID are skipped.
    pub fn player_id_to_jersey(&self) -> FxHashMap<String, u32> {
        self.entries.iter().filter_map(|e| e.p_id.clone().map(|p| (p, e.j_id))).collect()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| e.p_id.as_deref())
    }
}
