//! StatsPerform readers
//!
//! - `open_csv`: open-data event and tracking CSVs
//! - `tracking_txt`: the proprietary per-frame tracking stream
//! - `events_xml`: the proprietary event feed with its match sheet

mod fields;

pub mod events_xml;
pub mod open_csv;
pub mod tracking_txt;

pub use events_xml::{
    parse_event_data_xml, read_event_data_xml, read_event_data_xml_with_config,
    read_teamsheets_from_event_data_xml,
};
pub use open_csv::{
    parse_open_event_data_csv, parse_open_tracking_data_csv, read_open_event_data_csv,
    read_open_event_data_csv_with_config, read_open_tracking_data_csv,
    read_open_tracking_data_csv_with_config, read_teamsheets_from_open_data_csv,
};
pub use tracking_txt::{
    parse_tracking_data_txt, read_teamsheets_from_tracking_data_txt, read_tracking_data_txt,
    read_tracking_data_txt_with_config,
};
