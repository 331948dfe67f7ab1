use serde::{Deserialize, Serialize};

/// Coordinate system template of a data source
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PitchTemplate {
    /// Open tracking/event CSV: origin in a corner, metres
    StatsperformOpen,
    /// Event XML: origin at the centre spot, metres
    StatsperformEvent,
}

/// Playing surface of one match. Derived once per file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Pitch {
    pub template: PitchTemplate,
    pub length: f64,
    pub width: f64,
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    pub unit: String,
    pub sport: String,
}

impl Pitch {
    pub fn from_template(template: PitchTemplate, length: f64, width: f64, sport: &str) -> Self {
        let (xlim, ylim) = match template {
            PitchTemplate::StatsperformOpen => ((0.0, length), (0.0, width)),
            PitchTemplate::StatsperformEvent => {
                ((-length / 2.0, length / 2.0), (-width / 2.0, width / 2.0))
            }
        };

        Self {
            template,
            length,
            width,
            xlim,
            ylim,
            unit: "m".to_string(),
            sport: sport.to_string(),
        }
    }

    /// Whether a point lies on the pitch (touch and goal lines inclusive)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xlim.0 && x <= self.xlim.1 && y >= self.ylim.0 && y <= self.ylim.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_template_is_centred() {
        let pitch = Pitch::from_template(PitchTemplate::StatsperformEvent, 105.0, 68.0, "football");
        assert_eq!(pitch.xlim, (-52.5, 52.5));
        assert_eq!(pitch.ylim, (-34.0, 34.0));
        assert!(pitch.contains(0.0, 0.0));
        assert!(!pitch.contains(60.0, 0.0));
    }

    #[test]
    fn test_open_template_starts_at_corner() {
        let pitch = Pitch::from_template(PitchTemplate::StatsperformOpen, 100.0, 70.0, "football");
        assert_eq!(pitch.xlim, (0.0, 100.0));
        assert!(!pitch.contains(-1.0, 10.0));
        assert_eq!(pitch.sport, "football");
    }
}
