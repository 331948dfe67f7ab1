//! Reading StatsPerform files from disk through the public API

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use tl_core::io::statsperform::read_tracking_data_txt_with_config;
use tl_core::{
    read_event_data_xml, read_open_event_data_csv, read_open_tracking_data_csv,
    read_teamsheets_from_event_data_xml, read_teamsheets_from_open_data_csv,
    read_teamsheets_from_tracking_data_txt, read_tracking_data_txt, ParseError, ParserConfig,
    PitchTemplate, PlayerEntry, SegmentKey, Teamsheet,
};

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn tracking_txt() -> String {
    let mut lines = Vec::new();
    for segment in [1, 2] {
        for step in 0..5 {
            let clock = step * 40;
            lines.push(format!(
                "1000;{clock},{segment},0:0,11,3,{step}.0,10.0;1,21,8,-{step}.0,-10.0;4,22,6,1.0,1.0;:0.0,{step}.5,0.0;"
            ));
        }
    }
    lines.join("\n")
}

const OPEN_TRACKING: &str = "team_id,player_id,jersey_no,frame_count,pos_x,pos_y,possession,\
pitch_dimension_long_side,pitch_dimension_short_side
1,101,7,1,10.0,5.0,1,105,68
2,201,4,1,20.0,6.0,1,105,68
4,,,1,50.0,30.0,1,105,68
1,101,7,2,11.0,5.0,2,105,68
2,201,4,2,21.0,6.0,2,105,68
4,,,2,51.0,30.0,2,105,68
1,101,7,40,12.0,5.0,1,105,68
4,,,40,52.0,30.0,1,105,68
";

const OPEN_EVENTS: &str = "idx,event_id,frame_count,current_phase,match_time,description,\
event_type_id,sequencenumber,player_id,team_id,jersey_no,is_pass,is_cross,is_corner,\
is_free_kick,is_goal_kick,passtypeid,wintypeid,savetypeid,possessionnumber
0,1,1,1,0.1,Pass Won,1,1,101,1,7,1,0,0,0,0,0,0,0,1
1,2,2,1,0.2,Duel Lost,2,2,201,2,4,0,0,0,0,0,0,0,0,1
2,3,40,2,0.5,Goal Kick,3,1,,,,0,0,0,0,1,0,0,0,2
";

const EVENT_XML: &str = r#"<MatchEvents FieldLength="10000" FieldWidth="6400">
  <MatchSheet>
    <Team Type="HomeTeam" IdTeam="1" Name="Home FC">
      <Actor Occupation="Player" NickName="Alpha" IdActor="11" JerseyNumber="3" Position="DF" IsStarter="true"/>
    </Team>
    <Team Type="AwayTeam" IdTeam="2" Name="Away FC">
      <Actor Occupation="Player" NickName="Beta" IdActor="21" JerseyNumber="8" Position="MF" IsStarter="false"/>
    </Team>
  </MatchSheet>
  <Events>
    <EventsHalf IdHalf="1">
      <Event IdActor1="11" EventName="Pass" Time="1000" LocationX="0" LocationY="0"/>
      <Event IdActor1="21" EventName="Shot" Time="2500"/>
    </EventsHalf>
    <EventsHalf IdHalf="2">
      <Event IdActor1="11" EventName="Cross" Time="400"/>
    </EventsHalf>
  </Events>
</MatchEvents>
"#;

#[test]
fn test_tracking_txt_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "tracking.txt", &tracking_txt());

    let data = read_tracking_data_txt(&path, None, None).unwrap();

    assert_eq!(data.framerate, Some(25));
    assert_eq!(data.segments().count(), 2);
    for segment in [SegmentKey::Index(1), SegmentKey::Index(2)] {
        assert_eq!(data.xy.home[&segment].shape(), (5, 2));
        assert_eq!(data.xy.away[&segment].shape(), (5, 4));
        assert_eq!(data.ball[&segment].get(4, 0), Some((0.0, 4.5)));
    }
    assert_eq!(data.xy.home[&SegmentKey::Index(2)].get(2, 0), Some((2.0, 10.0)));
    // jersey 6 (xID 0) sorts before jersey 8 (xID 1)
    assert_eq!(data.xy.away[&SegmentKey::Index(1)].get(3, 1), Some((-3.0, -10.0)));
    assert_eq!(data.xy.away[&SegmentKey::Index(1)].get(3, 0), Some((1.0, 1.0)));

    let sheets = read_teamsheets_from_tracking_data_txt(&path).unwrap();
    assert_eq!(sheets.away.entries().iter().map(|e| e.j_id).collect::<Vec<_>>(), vec![6, 8]);
}

#[test]
fn test_parsing_twice_is_bit_identical() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "tracking.txt", &tracking_txt());

    let first = read_tracking_data_txt(&path, None, None).unwrap();
    let second = read_tracking_data_txt(&path, None, None).unwrap();

    for (segment, xy) in &first.xy.home {
        assert!(xy.same_as(&second.xy.home[segment]));
    }
    for (segment, xy) in &first.ball {
        assert!(xy.same_as(&second.ball[segment]));
    }
    assert_eq!(first.teamsheets, second.teamsheets);
    assert_eq!(first.periods, second.periods);
}

#[test]
fn test_open_tracking_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "tracking.csv", OPEN_TRACKING);

    let data = read_open_tracking_data_csv(&path, None, None).unwrap();

    assert_eq!(data.framerate, Some(10));
    assert_eq!(data.periods.len(), 2);
    let first = SegmentKey::Index(1);
    assert_eq!(data.xy.home[&first].get(1, 0), Some((11.0, 5.0)));
    assert_eq!(data.xy.away[&SegmentKey::Index(2)].get(0, 0), None);
    assert_eq!(data.ball[&first].get(0, 0), Some((50.0, 30.0)));

    let pitch = data.pitch.unwrap();
    assert_eq!(pitch.template, PitchTemplate::StatsperformOpen);
    assert_eq!(pitch.xlim, (0.0, 105.0));

    let possession = &data.possession[&first];
    assert_eq!(possession.code, vec![Some(1), Some(2)]);
}

#[test]
fn test_open_events_with_supplied_teamsheets() {
    let dir = TempDir::new().unwrap();
    let events = write(&dir, "events.csv", OPEN_EVENTS);
    let tracking = write(&dir, "tracking.csv", OPEN_TRACKING);

    let sheets = read_teamsheets_from_open_data_csv(&tracking).unwrap();
    assert_eq!(sheets.home.entries()[0].p_id.as_deref(), Some("101"));

    let before = sheets.clone();
    let data = read_open_event_data_csv(&events, Some(&sheets.home), Some(&sheets.away)).unwrap();

    assert_eq!(sheets, before);
    assert_eq!(data.events.home[&SegmentKey::Index(1)].len(), 1);
    assert_eq!(data.events.away[&SegmentKey::Index(1)].len(), 1);
    assert_eq!(data.events.home[&SegmentKey::Index(2)].len(), 1);
    assert_eq!(data.events.away[&SegmentKey::Index(2)].len(), 1);
}

#[test]
fn test_open_events_and_tracking_share_segment_keys() {
    let dir = TempDir::new().unwrap();
    let events = write(&dir, "events.csv", OPEN_EVENTS);
    let tracking = write(&dir, "tracking.csv", OPEN_TRACKING);

    let event_data = read_open_event_data_csv(&events, None, None).unwrap();
    let tracking_data = read_open_tracking_data_csv(&tracking, None, None).unwrap();

    let event_keys: Vec<&SegmentKey> = event_data.events.home.keys().collect();
    let tracking_keys: Vec<&SegmentKey> = tracking_data.segments().collect();
    assert_eq!(event_keys, tracking_keys);
    assert_eq!(tracking_keys, vec![&SegmentKey::Index(1), &SegmentKey::Index(2)]);
}

#[test]
fn test_event_xml_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "events.xml", EVENT_XML);

    let sheets = read_teamsheets_from_event_data_xml(&path).unwrap();
    assert_eq!(sheets.home.entries()[0].player, "Alpha");
    assert_eq!(sheets.away.entries()[0].started, Some(false));

    let data = read_event_data_xml(&path, None, None).unwrap();
    let ht1 = SegmentKey::from("HT1");
    let ht2 = SegmentKey::from("HT2");
    assert_eq!(data.events.home[&ht1].events[0].e_id, "Pass");
    assert_eq!(data.events.away[&ht1].events[0].e_id, "Shot");
    assert_eq!(data.events.home[&ht2].events[0].gameclock, Some(0.4));
    assert!(data.events.away[&ht2].is_empty());
    assert_eq!(data.pitch.unwrap().ylim, (-32.0, 32.0));
}

#[test]
fn test_custom_team_codes_from_config() {
    let dir = TempDir::new().unwrap();
    let content = "1;0,1,0:H,11,3,1.0,1.0;A,21,8,2.0,2.0;\n1;40,1,0:H,11,3,1.5,1.0;\n";
    let path = write(&dir, "tracking.txt", content);

    let config =
        ParserConfig::from_json(r#"{"txt_codes": {"home": ["H"], "away": ["A"]}}"#).unwrap();
    let data = read_tracking_data_txt_with_config(&path, None, None, &config).unwrap();

    assert!(data.warnings.is_empty());
    assert_eq!(data.xy.home[&SegmentKey::Index(1)].get(1, 0), Some((1.5, 1.0)));
    assert_eq!(data.xy.away[&SegmentKey::Index(1)].get(0, 0), Some((2.0, 2.0)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = read_tracking_data_txt(dir.path().join("absent.txt"), None, None).unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
}

#[test]
fn test_supplied_teamsheet_sets_column_order() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "tracking.txt", &tracking_txt());

    let home = Teamsheet::new(vec![PlayerEntry::new("Ten", 10), PlayerEntry::new("Three", 3)])
        .unwrap();
    let data = read_tracking_data_txt(&path, Some(&home), None).unwrap();

    let xy = &data.xy.home[&SegmentKey::Index(1)];
    assert_eq!(xy.shape(), (5, 4));
    assert_eq!(xy.get(1, 0), Some((1.0, 10.0)));
    assert_eq!(xy.get(1, 1), None);
    assert!(!home.has_x_ids());
}
