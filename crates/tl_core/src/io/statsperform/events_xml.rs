//! StatsPerform event feed (.xml)
//!
//! ```text
//! <Root FieldLength="10500" FieldWidth="6800">
//!   <MatchSheet>
//!     <Team Type="HomeTeam" IdTeam=".." Name="..">
//!       <Actor Occupation="Player" NickName=".." IdActor=".." JerseyNumber=".." .../>
//!   <Events>
//!     <EventsHalf IdHalf="1">
//!       <Event IdActor1=".." EventName=".." Time="ms" LocationX=".." .../>
//! ```
//!
//! Events are attributed to a team through the actor id. Coordinates are
//! centred on the kick-off spot; field dimensions are in centimetres.

use roxmltree::{Document, Node};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

use super::fields::{optional_text, parse_optional_f64, parse_required};
use crate::config::ParserConfig;
use crate::error::{Diagnostics, ParseError, ParseWarning, Result};
use crate::io::assembly::EventTableAssembler;
use crate::io::teamsheet_builder::resolve_teamsheets;
use crate::io::EventData;
use crate::models::{Event, PerTeam, Pitch, PitchTemplate, PlayerEntry, SegmentKey, Team, Teamsheet};

fn line_of(doc: &Document, node: Node) -> usize {
    doc.text_pos_at(node.range().start).row as usize
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| n.has_tag_name(name))
}

fn required_attr<'a>(doc: &Document, node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        ParseError::malformed(
            line_of(doc, node),
            format!("<{}> without {}", node.tag_name().name(), name),
        )
    })
}

fn optional_f64_attr(doc: &Document, node: Node, name: &str) -> Result<Option<f64>> {
    match node.attribute(name) {
        Some(raw) => parse_optional_f64(raw, line_of(doc, node), name),
        None => Ok(None),
    }
}

/// Lenient boolean: `true`/`1` (any case) are true, everything else false
fn parse_flag(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case("true") || raw == "1"
}

fn team_of_type(raw: &str) -> Option<Team> {
    match raw {
        "HomeTeam" => Some(Team::Home),
        "AwayTeam" => Some(Team::Away),
        _ => None,
    }
}

/// `None` when the actor carries no jersey number; such players cannot be
/// given a position column.
fn decode_actor(
    doc: &Document,
    actor: Node,
    t_id: &str,
    team_name: &str,
) -> Result<Option<PlayerEntry>> {
    let line = line_of(doc, actor);
    let Some(raw_jersey) = actor.attribute("JerseyNumber").filter(|raw| !raw.trim().is_empty())
    else {
        return Ok(None);
    };
    let jersey = parse_required(raw_jersey, line, "JerseyNumber")?;

    let mut entry = PlayerEntry::new(actor.attribute("NickName").unwrap_or_default(), jersey);
    entry.p_id = actor.attribute("IdActor").and_then(optional_text);
    entry.t_id = Some(t_id.to_string());
    entry.team_name = Some(team_name.to_string());
    entry.position = actor.attribute("Position").and_then(optional_text);
    entry.started = actor.attribute("IsStarter").map(parse_flag);
    Ok(Some(entry))
}

fn teamsheets_from_doc(doc: &Document, diag: &mut Diagnostics) -> Result<PerTeam<Teamsheet>> {
    let mut sheets: PerTeam<Teamsheet> = PerTeam::default();

    let match_sheets = child_elements(doc.root_element(), "MatchSheet");
    for team_node in match_sheets.flat_map(|m| child_elements(m, "Team")) {
        let kind = required_attr(doc, team_node, "Type")?;
        if kind == "Referees" {
            continue;
        }
        let Some(team) = team_of_type(kind) else {
            diag.warn(ParseWarning::UnknownTeamIdentifier { raw: kind.to_string() });
            continue;
        };

        let t_id = required_attr(doc, team_node, "IdTeam")?;
        let team_name = team_node.attribute("Name").unwrap_or_default();
        let mut players = Vec::new();
        let actors = child_elements(team_node, "Actor")
            .filter(|actor| actor.attribute("Occupation") == Some("Player"));
        for actor in actors {
            match decode_actor(doc, actor, t_id, team_name)? {
                Some(entry) => players.push(entry),
                None => diag.warn(ParseWarning::PlayerWithoutJersey {
                    team,
                    player: actor.attribute("NickName").unwrap_or_default().to_string(),
                }),
            }
        }

        *sheets.get_mut(team) = Teamsheet::new(players)?;
    }

    Ok(sheets)
}

fn pitch_from_doc(doc: &Document, sport: &str) -> Result<Option<Pitch>> {
    let root = doc.root_element();
    let length = optional_f64_attr(doc, root, "FieldLength")?;
    let width = optional_f64_attr(doc, root, "FieldWidth")?;

    Ok(match (length, width) {
        (Some(length), Some(width)) => Some(Pitch::from_template(
            PitchTemplate::StatsperformEvent,
            length / 100.0,
            width / 100.0,
            sport,
        )),
        _ => None,
    })
}

/// Actor id → team. An id listed for both teams maps to no team.
struct ActorLinks {
    teams: FxHashMap<String, Option<Team>>,
    team_ids: PerTeam<Option<String>>,
}

impl ActorLinks {
    fn new(teamsheets: &PerTeam<Teamsheet>) -> Self {
        let mut teams: FxHashMap<String, Option<Team>> = FxHashMap::default();
        for team in Team::BOTH {
            for p_id in teamsheets.get(team).player_ids() {
                teams
                    .entry(p_id.to_string())
                    .and_modify(|known| {
                        if *known != Some(team) {
                            *known = None;
                        }
                    })
                    .or_insert(Some(team));
            }
        }

        let team_ids = teamsheets
            .clone()
            .map(|_, sheet| sheet.entries().iter().find_map(|e| e.t_id.clone()));

        Self { teams, team_ids }
    }

    fn team(&self, actor: Option<&str>) -> Option<Team> {
        actor.and_then(|id| self.teams.get(id).copied().flatten())
    }
}

/// Decode one `<Event>` element
pub fn decode_event_node(doc: &Document, node: Node) -> Result<Event> {
    let line = line_of(doc, node);
    let time_ms: i64 = parse_required(required_attr(doc, node, "Time")?, line, "Time")?;

    Ok(Event {
        e_id: node.attribute("EventName").unwrap_or_default().to_string(),
        p_id: node.attribute("IdActor1").and_then(optional_text),
        at_x: optional_f64_attr(doc, node, "LocationX")?,
        at_y: optional_f64_attr(doc, node, "LocationY")?,
        to_x: optional_f64_attr(doc, node, "TargetX")?,
        to_y: optional_f64_attr(doc, node, "TargetY")?,
        qualifier: node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect(),
        ..Default::default()
    }
    .with_gameclock(time_ms as f64 / 1000.0))
}

/// Both teamsheets from the match sheet of an event XML. Player names,
/// positions and starter flags are taken verbatim; no xIDs are assigned.
pub fn read_teamsheets_from_event_data_xml<P: AsRef<Path>>(path: P) -> Result<PerTeam<Teamsheet>> {
    let content = fs::read_to_string(path.as_ref())?;
    let doc = Document::parse(&content)?;
    teamsheets_from_doc(&doc, &mut Diagnostics::default())
}

pub fn parse_event_data_xml(
    content: &str,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
    config: &ParserConfig,
) -> Result<EventData> {
    let doc = Document::parse(content)?;
    let mut diag = Diagnostics::default();

    let teamsheets = resolve_teamsheets(home_teamsheet, away_teamsheet, false, || {
        teamsheets_from_doc(&doc, &mut diag)
    })?;
    let links = ActorLinks::new(&teamsheets);

    let mut assembler = EventTableAssembler::new();
    let halves = child_elements(doc.root_element(), "Events")
        .flat_map(|events| child_elements(events, "EventsHalf"));
    for half in halves {
        let segment = SegmentKey::Label(format!("HT{}", required_attr(&doc, half, "IdHalf")?));
        assembler.open_segment(segment.clone());

        for node in child_elements(half, "Event") {
            let mut event = decode_event_node(&doc, node)?;
            let team = links.team(event.p_id.as_deref());
            if let Some(team) = team {
                event.t_id = links.team_ids.get(team).clone();
            }
            assembler.push(segment.clone(), team, event);
        }
    }

    let pitch = pitch_from_doc(&doc, &config.sport)?;
    let events = assembler.finish();
    log::debug!(
        "Event XML: {} segment(s), {} home / {} away events",
        events.home.len(),
        events.home.values().map(|e| e.len()).sum::<usize>(),
        events.away.values().map(|e| e.len()).sum::<usize>()
    );

    Ok(EventData { events, pitch, teamsheets, warnings: diag.into_warnings() })
}

/// Parse a StatsPerform event XML into per-team, per-segment event tables
/// (`HT1`, `HT2`, ...) plus pitch. Events whose actor is on neither (or both)
/// teamsheets are added to both teams.
pub fn read_event_data_xml<P: AsRef<Path>>(
    path: P,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
) -> Result<EventData> {
    read_event_data_xml_with_config(path, home_teamsheet, away_teamsheet, &ParserConfig::default())
}

pub fn read_event_data_xml_with_config<P: AsRef<Path>>(
    path: P,
    home_teamsheet: Option<&Teamsheet>,
    away_teamsheet: Option<&Teamsheet>,
    config: &ParserConfig,
) -> Result<EventData> {
    let path = path.as_ref();
    log::info!("Reading event XML {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_event_data_xml(&content, home_teamsheet, away_teamsheet, config)
}
