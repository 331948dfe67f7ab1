use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Fail,
    #[default]
    Unknown,
}

/// One decoded event. Created once per source record and not mutated after
/// assembly.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Event {
    #[serde(rename = "eID")]
    pub e_id: String,
    /// Seconds since segment start
    pub gameclock: Option<f64>,
    pub frameclock: Option<f64>,
    #[serde(rename = "pID")]
    pub p_id: Option<String>,
    #[serde(rename = "tID")]
    pub t_id: Option<String>,
    pub outcome: Outcome,
    pub minute: Option<f64>,
    pub second: Option<f64>,
    pub at_x: Option<f64>,
    pub at_y: Option<f64>,
    pub to_x: Option<f64>,
    pub to_y: Option<f64>,
    pub qualifier: BTreeMap<String, String>,
}

impl Event {
    /// Set gameclock together with the derived minute and second
    pub fn with_gameclock(mut self, gameclock: f64) -> Self {
        let minute = (gameclock / 60.0).floor();
        self.gameclock = Some(gameclock);
        self.minute = Some(minute);
        self.second = Some((gameclock - minute * 60.0).floor());
        self
    }
}

/// Event table of one team in one segment, in source order
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Events {
    pub events: Vec<Event>,
}

impl Events {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Events whose eID matches
    pub fn select<'a>(&'a self, e_id: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.e_id == e_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_and_second_from_gameclock() {
        let event = Event::default().with_gameclock(125.7);
        assert_eq!(event.minute, Some(2.0));
        assert_eq!(event.second, Some(5.0));

        let kickoff = Event::default().with_gameclock(0.0);
        assert_eq!(kickoff.minute, Some(0.0));
        assert_eq!(kickoff.second, Some(0.0));
    }

    #[test]
    fn test_select_by_e_id() {
        let events = Events {
            events: vec![
                Event { e_id: "Pass".into(), ..Default::default() },
                Event { e_id: "Shot".into(), ..Default::default() },
                Event { e_id: "Pass".into(), ..Default::default() },
            ],
        };
        assert_eq!(events.select("Pass").count(), 2);
        assert_eq!(events.len(), 3);
    }
}
