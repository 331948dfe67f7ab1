//! Parser configuration
//!
//! Vendor team codes and the fixed framerate of the open format. Defaults
//! match the published StatsPerform files; a JSON file can override them,
//! either passed explicitly or through `TL_PARSER_CONFIG_PATH`.

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

use crate::error::{ParseError, Result};
use crate::models::Team;

pub const PARSER_CONFIG_PATH_ENV: &str = "TL_PARSER_CONFIG_PATH";

/// Team codes of the open CSV format (`team_id` column)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OpenFormatCodes {
    pub home: i64,
    pub away: i64,
    pub ball: i64,
}

impl Default for OpenFormatCodes {
    fn default() -> Self {
        Self { home: 1, away: 2, ball: 4 }
    }
}

impl OpenFormatCodes {
    pub fn team(&self, code: i64) -> Option<Team> {
        if code == self.home {
            Some(Team::Home)
        } else if code == self.away {
            Some(Team::Away)
        } else {
            None
        }
    }

    pub fn code(&self, team: Team) -> i64 {
        match team {
            Team::Home => self.home,
            Team::Away => self.away,
        }
    }
}

/// Team codes of the txt tracking stream (first field of a player chunk)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TxtFormatCodes {
    pub home: Vec<String>,
    pub away: Vec<String>,
}

impl Default for TxtFormatCodes {
    fn default() -> Self {
        Self {
            home: vec!["0".to_string(), "3".to_string()],
            away: vec!["1".to_string(), "4".to_string()],
        }
    }
}

impl TxtFormatCodes {
    pub fn team(&self, raw: &str) -> Option<Team> {
        if self.home.iter().any(|c| c == raw) {
            Some(Team::Home)
        } else if self.away.iter().any(|c| c == raw) {
            Some(Team::Away)
        } else {
            None
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ParserConfig {
    pub open_codes: OpenFormatCodes,
    pub txt_codes: TxtFormatCodes,
    /// The open CSV carries no clock, its sampling rate is fixed
    pub open_framerate: u32,
    pub sport: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            open_codes: OpenFormatCodes::default(),
            txt_codes: TxtFormatCodes::default(),
            open_framerate: 10,
            sport: "football".to_string(),
        }
    }
}

impl ParserConfig {
    /// Load config from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse config from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ParserConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Config from the file named by `TL_PARSER_CONFIG_PATH`, defaults if unset
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(PARSER_CONFIG_PATH_ENV)
    }

    fn from_env_var(var: &str) -> Result<Self> {
        let Ok(path) = env::var(var) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        log::debug!("Loading parser config from {}='{}'", var, path);
        Self::load(path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.open_framerate == 0 {
            return Err(ParseError::InvalidConfig("open_framerate must be positive".into()));
        }

        let open = &self.open_codes;
        if open.home == open.away || open.home == open.ball || open.away == open.ball {
            return Err(ParseError::InvalidConfig(format!(
                "open format codes must be distinct, got home={} away={} ball={}",
                open.home, open.away, open.ball
            )));
        }

        let txt = &self.txt_codes;
        if txt.home.is_empty() || txt.away.is_empty() {
            return Err(ParseError::InvalidConfig("txt team codes must not be empty".into()));
        }
        if let Some(shared) = txt.home.iter().find(|c| txt.away.contains(c)) {
            return Err(ParseError::InvalidConfig(format!(
                "txt code '{}' is assigned to both teams",
                shared
            )));
        }

        Ok(())
    }
}
