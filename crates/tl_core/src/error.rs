use thiserror::Error;

use crate::models::Team;

/// Fatal parse failures. Any of these aborts the whole read; there is no
/// row-level skip-and-continue.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid teamsheet: {0}")]
    InvalidTeamsheet(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl ParseError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ParseError::MalformedRecord { line, reason: reason.into() }
    }

    /// Line number of the offending record, when the error is record-bound.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MalformedRecord { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Non-fatal findings. The parse degrades gracefully and keeps going; every
/// warning is logged once and handed back to the caller in the output object.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseWarning {
    /// A team code outside the known team codes and the ball sentinel.
    #[error("Team identifier '{raw}' matches neither a team nor the ball")]
    UnknownTeamIdentifier { raw: String },

    /// Two framerate estimates disagreed; `current` was adopted.
    #[error(
        "Framerate estimate changed from {previous} Hz to {current} Hz (possibly missing frames); \
         continuing with {current} Hz"
    )]
    FramerateAmbiguity { previous: u32, current: u32 },

    /// A tracked jersey that has no entry in the team's teamsheet.
    #[error("Jersey {jersey} of {team} is not on the teamsheet, positions dropped")]
    UnrosteredJersey { team: Team, jersey: u32 },

    /// A match-sheet player without a jersey number is left off the teamsheet.
    #[error("Player '{player}' of {team} has no jersey number, left off the teamsheet")]
    PlayerWithoutJersey { team: Team, player: String },
}

/// Collects warnings for one parse call. Identical warnings are reported once.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    warnings: Vec<ParseWarning>,
}

impl Diagnostics {
    pub(crate) fn warn(&mut self, warning: ParseWarning) {
        if self.warnings.contains(&warning) {
            return;
        }
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub(crate) fn extend(&mut self, other: Diagnostics) {
        for warning in other.warnings {
            self.warn(warning);
        }
    }

    pub(crate) fn into_warnings(self) -> Vec<ParseWarning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_warnings_reported_once() {
        let mut diag = Diagnostics::default();
        diag.warn(ParseWarning::UnknownTeamIdentifier { raw: "7".to_string() });
        diag.warn(ParseWarning::UnknownTeamIdentifier { raw: "7".to_string() });
        diag.warn(ParseWarning::FramerateAmbiguity { previous: 25, current: 12 });

        assert_eq!(diag.into_warnings().len(), 2);
    }

    #[test]
    fn test_warning_messages() {
        let ambiguity = ParseWarning::FramerateAmbiguity { previous: 25, current: 10 };
        assert_eq!(
            ambiguity.to_string(),
            "Framerate estimate changed from 25 Hz to 10 Hz (possibly missing frames); \
             continuing with 10 Hz"
        );
        let unrostered = ParseWarning::UnrosteredJersey { team: Team::Away, jersey: 14 };
        assert!(unrostered.to_string().starts_with("Jersey 14 of "));
        let err: &dyn std::error::Error = &unrostered;
        assert!(err.source().is_none());
    }

    #[test]
    fn test_malformed_record_carries_line() {
        let err = ParseError::malformed(12, "expected 5 fields, found 3");
        assert_eq!(err.line(), Some(12));
        assert_eq!(
            err.to_string(),
            "Malformed record at line 12: expected 5 fields, found 3"
        );
        assert_eq!(ParseError::MissingColumn("pos_x".into()).line(), None);
    }
}
