//! Teamsheet derivation from tracking sources
//!
//! Phase 1 collects distinct jerseys per team while the file is scanned.
//! Phase 2 (`finish`) sorts them, names the players and hands out xIDs.
//! Nothing in phase 1 depends on record order.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{PerTeam, PlayerEntry, Team, Teamsheet};

#[derive(Debug, Default)]
pub struct JerseyCollector {
    seen: PerTeam<BTreeMap<u32, Option<String>>>,
}

impl JerseyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a jersey. The first player id seen for a jersey is kept.
    pub fn observe(&mut self, team: Team, jersey: u32, player_id: Option<&str>) {
        let slot = self.seen.get_mut(team).entry(jersey).or_insert(None);
        if slot.is_none() {
            *slot = player_id.map(str::to_string);
        }
    }

    /// Build both teamsheets. Players without an id get `player {i}` names.
    pub fn finish(self, team_ids: Option<&PerTeam<String>>) -> Result<PerTeam<Teamsheet>> {
        let PerTeam { home, away } = self.seen;
        Ok(PerTeam {
            home: build_sheet(home, team_ids.map(|ids| ids.home.as_str()))?,
            away: build_sheet(away, team_ids.map(|ids| ids.away.as_str()))?,
        })
    }
}

fn build_sheet(jerseys: BTreeMap<u32, Option<String>>, team_id: Option<&str>) -> Result<Teamsheet> {
    let entries = jerseys
        .into_iter()
        .enumerate()
        .map(|(i, (jersey, player_id))| {
            let mut entry = PlayerEntry::new(
                player_id.clone().unwrap_or_else(|| format!("player {}", i)),
                jersey,
            );
            entry.p_id = player_id;
            entry.t_id = team_id.map(str::to_string);
            entry
        })
        .collect();

    let mut sheet = Teamsheet::new(entries)?;
    sheet.add_x_ids();
    Ok(sheet)
}

/// Combine caller-supplied teamsheets with derived ones.
///
/// A side given by the caller is validated and used as-is (cloned, so the
/// caller's value is untouched); a missing side comes from `derive`, which
/// only runs when needed. With `with_x_ids` both results carry xIDs.
pub(crate) fn resolve_teamsheets<F>(
    home: Option<&Teamsheet>,
    away: Option<&Teamsheet>,
    with_x_ids: bool,
    derive: F,
) -> Result<PerTeam<Teamsheet>>
where
    F: FnOnce() -> Result<PerTeam<Teamsheet>>,
{
    for sheet in [home, away].into_iter().flatten() {
        sheet.validate()?;
    }

    let mut sheets = match (home, away) {
        (Some(home), Some(away)) => PerTeam::new(home.clone(), away.clone()),
        _ => {
            log::debug!("Deriving missing teamsheet(s) from the source file");
            let derived = derive()?;
            PerTeam::new(
                home.cloned().unwrap_or(derived.home),
                away.cloned().unwrap_or(derived.away),
            )
        }
    };

    if with_x_ids {
        for team in Team::BOTH {
            sheets.get_mut(team).add_x_ids();
        }
    }

    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_is_order_independent() {
        let mut a = JerseyCollector::new();
        let mut b = JerseyCollector::new();
        for j in [10, 3, 7, 3] {
            a.observe(Team::Home, j, None);
        }
        for j in [7, 10, 3] {
            b.observe(Team::Home, j, None);
        }

        let a = a.finish(None).unwrap();
        let b = b.finish(None).unwrap();
        assert_eq!(a, b);

        let entries = a.home.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].player, "player 0");
        assert_eq!(entries[0].j_id, 3);
        assert_eq!(entries[2].j_id, 10);
        assert_eq!(entries[2].x_id, Some(2));
        assert!(a.away.is_empty());
    }

    #[test]
    fn test_collector_keeps_first_player_id() {
        let mut collector = JerseyCollector::new();
        collector.observe(Team::Away, 9, None);
        collector.observe(Team::Away, 9, Some("p9"));
        collector.observe(Team::Away, 9, Some("other"));

        let ids = PerTeam::new("1".to_string(), "2".to_string());
        let sheets = collector.finish(Some(&ids)).unwrap();
        let entry = &sheets.away.entries()[0];
        assert_eq!(entry.player, "p9");
        assert_eq!(entry.p_id.as_deref(), Some("p9"));
        assert_eq!(entry.t_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_supplied_side_is_kept_other_derived() {
        let supplied = Teamsheet::new(vec![PlayerEntry::new("Keeper", 1)]).unwrap();
        let sheets = resolve_teamsheets(Some(&supplied), None, true, || {
            let mut c = JerseyCollector::new();
            c.observe(Team::Home, 99, None);
            c.observe(Team::Away, 5, None);
            c.finish(None)
        })
        .unwrap();

        assert_eq!(sheets.home.entries()[0].player, "Keeper");
        assert_eq!(sheets.home.entries()[0].x_id, Some(0));
        assert_eq!(sheets.away.entries()[0].j_id, 5);
        // caller's copy has no xIDs
        assert!(!supplied.has_x_ids());
    }

    #[test]
    fn test_derive_skipped_when_both_supplied() {
        let home = Teamsheet::new(vec![PlayerEntry::new("A", 1)]).unwrap();
        let away = Teamsheet::new(vec![PlayerEntry::new("B", 2)]).unwrap();
        let sheets = resolve_teamsheets(Some(&home), Some(&away), false, || {
            panic!("derive must not run")
        })
        .unwrap();

        assert_eq!(sheets.home, home);
        assert_eq!(sheets.away, away);
    }

    #[test]
    fn test_supplied_sheet_with_shared_x_id_is_rejected() {
        let json = r#"[{"player": "A", "jID": 3, "xID": 0}, {"player": "B", "jID": 7, "xID": 0}]"#;
        let sheet: Teamsheet = serde_json::from_str(json).unwrap();

        let err = resolve_teamsheets(Some(&sheet), None, true, || {
            Ok(PerTeam::default())
        })
        .unwrap_err();
        assert!(matches!(err, crate::error::ParseError::InvalidTeamsheet(_)));
    }
}
