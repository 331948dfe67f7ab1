//! Position and event assembly
//!
//! Both assemblers own their buffers until `finish` hands them out.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use crate::error::{Diagnostics, ParseWarning};
use crate::models::{Event, Events, PerTeam, SegmentKey, Team, Teamsheet, XY};

struct SegmentBuffers {
    teams: PerTeam<XY>,
    ball: XY,
}

/// Scatters decoded positions into pre-sized per-segment buffers.
///
/// Player columns come from the teamsheet's jID → xID links. Frames outside
/// a segment's buffer are dropped without notice; jerseys missing from the
/// teamsheet are dropped with one warning each.
pub struct PositionAssembler {
    links: PerTeam<FxHashMap<u32, usize>>,
    buffers: BTreeMap<SegmentKey, SegmentBuffers>,
    diag: Diagnostics,
}

impl PositionAssembler {
    /// `teamsheets` must already carry xIDs.
    pub fn new<I>(teamsheets: &PerTeam<Teamsheet>, frame_counts: I, framerate: Option<u32>) -> Self
    where
        I: IntoIterator<Item = (SegmentKey, usize)>,
    {
        let slots = PerTeam::new(teamsheets.home.slot_count(), teamsheets.away.slot_count());
        let buffers = frame_counts
            .into_iter()
            .map(|(segment, frames)| {
                let teams = PerTeam::new(
                    XY::missing(frames, slots.home, framerate),
                    XY::missing(frames, slots.away, framerate),
                );
                (segment, SegmentBuffers { teams, ball: XY::missing(frames, 1, framerate) })
            })
            .collect();

        Self {
            links: PerTeam::new(
                teamsheets.home.jersey_to_x_id(),
                teamsheets.away.jersey_to_x_id(),
            ),
            buffers,
            diag: Diagnostics::default(),
        }
    }

    pub fn place_player(
        &mut self,
        segment: &SegmentKey,
        frame: usize,
        team: Team,
        jersey: u32,
        position: (f64, f64),
    ) {
        let Some(&x_id) = self.links.get(team).get(&jersey) else {
            self.diag.warn(ParseWarning::UnrosteredJersey { team, jersey });
            return;
        };
        if let Some(buffers) = self.buffers.get_mut(segment) {
            buffers.teams.get_mut(team).set(frame, x_id, position);
        }
    }

    pub fn place_ball(&mut self, segment: &SegmentKey, frame: usize, position: (f64, f64)) {
        if let Some(buffers) = self.buffers.get_mut(segment) {
            buffers.ball.set(frame, 0, position);
        }
    }

    pub(crate) fn finish(
        self,
    ) -> (PerTeam<BTreeMap<SegmentKey, XY>>, BTreeMap<SegmentKey, XY>, Diagnostics) {
        let mut teams: PerTeam<BTreeMap<SegmentKey, XY>> = PerTeam::default();
        let mut ball = BTreeMap::new();

        for (segment, buffers) in self.buffers {
            let PerTeam { home, away } = buffers.teams;
            teams.home.insert(segment.clone(), home);
            teams.away.insert(segment.clone(), away);
            ball.insert(segment, buffers.ball);
        }

        (teams, ball, self.diag)
    }
}

/// Collects events per (segment, team) in source order.
///
/// An event without a resolvable team goes into both teams' tables. No
/// sorting happens; the table order is the file order.
#[derive(Debug, Default)]
pub struct EventTableAssembler {
    tables: BTreeMap<SegmentKey, PerTeam<Events>>,
}

impl EventTableAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure both teams have a (possibly empty) table for `segment`
    pub fn open_segment(&mut self, segment: SegmentKey) -> &mut PerTeam<Events> {
        self.tables.entry(segment).or_default()
    }

    pub fn push(&mut self, segment: SegmentKey, team: Option<Team>, event: Event) {
        let tables = self.open_segment(segment);
        match team {
            Some(team) => tables.get_mut(team).events.push(event),
            None => {
                tables.home.events.push(event.clone());
                tables.away.events.push(event);
            }
        }
    }

    pub fn finish(self) -> PerTeam<BTreeMap<SegmentKey, Events>> {
        let mut out: PerTeam<BTreeMap<SegmentKey, Events>> = PerTeam::default();
        for (segment, PerTeam { home, away }) in self.tables {
            out.home.insert(segment.clone(), home);
            out.away.insert(segment, away);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerEntry;

    fn sheets() -> PerTeam<Teamsheet> {
        let mut home = Teamsheet::new(vec![PlayerEntry::new("a", 4), PlayerEntry::new("b", 9)])
            .unwrap();
        let mut away = Teamsheet::new(vec![PlayerEntry::new("c", 1)]).unwrap();
        home.add_x_ids();
        away.add_x_ids();
        PerTeam::new(home, away)
    }

    #[test]
    fn test_buffers_are_pre_sized() {
        let seg = SegmentKey::Index(1);
        let assembler = PositionAssembler::new(&sheets(), [(seg.clone(), 5)], Some(25));
        let (teams, ball, _) = assembler.finish();

        assert_eq!(teams.home[&seg].shape(), (5, 4));
        assert_eq!(teams.away[&seg].shape(), (5, 2));
        assert_eq!(ball[&seg].shape(), (5, 2));
        assert_eq!(ball[&seg].missing_count(), 10);
        assert_eq!(teams.home[&seg].framerate, Some(25));
    }

    #[test]
    fn test_player_scatter_by_x_id() {
        let seg = SegmentKey::Index(1);
        let mut assembler = PositionAssembler::new(&sheets(), [(seg.clone(), 3)], None);
        assembler.place_player(&seg, 1, Team::Home, 9, (10.0, 20.0));
        assembler.place_player(&seg, 7, Team::Home, 4, (1.0, 1.0)); // out of range
        assembler.place_ball(&seg, 2, (0.5, -0.5));
        let (teams, ball, diag) = assembler.finish();

        let home = &teams.home[&seg];
        assert_eq!(home.get(1, 1), Some((10.0, 20.0)));
        assert_eq!(home.get(1, 0), None);
        assert_eq!(home.missing_count(), 10);
        assert_eq!(ball[&seg].get(2, 0), Some((0.5, -0.5)));
        assert!(diag.into_warnings().is_empty());
    }

    #[test]
    fn test_unrostered_jersey_warns_once() {
        let seg = SegmentKey::Index(1);
        let mut assembler = PositionAssembler::new(&sheets(), [(seg.clone(), 2)], None);
        assembler.place_player(&seg, 0, Team::Away, 77, (1.0, 1.0));
        assembler.place_player(&seg, 1, Team::Away, 77, (1.0, 1.0));
        let (teams, _, diag) = assembler.finish();

        assert_eq!(teams.away[&seg].missing_count(), 4);
        assert_eq!(
            diag.into_warnings(),
            vec![ParseWarning::UnrosteredJersey { team: Team::Away, jersey: 77 }]
        );
    }

    #[test]
    fn test_ambiguous_event_goes_to_both_tables() {
        let mut assembler = EventTableAssembler::new();
        let seg = SegmentKey::Index(1);
        let pass = Event { e_id: "Pass".into(), ..Default::default() };
        let whistle = Event { e_id: "Whistle".into(), ..Default::default() };

        assembler.push(seg.clone(), Some(Team::Home), pass.clone());
        assembler.push(seg.clone(), None, whistle.clone());
        let tables = assembler.finish();

        assert_eq!(tables.home[&seg].events, vec![pass, whistle.clone()]);
        assert_eq!(tables.away[&seg].events, vec![whistle]);
    }

    #[test]
    fn test_open_segment_creates_empty_tables() {
        let mut assembler = EventTableAssembler::new();
        assembler.open_segment(SegmentKey::from("HT2"));
        let tables = assembler.finish();

        assert!(tables.home[&SegmentKey::from("HT2")].is_empty());
        assert!(tables.away[&SegmentKey::from("HT2")].is_empty());
    }
}
