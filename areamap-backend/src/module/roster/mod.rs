//! Personnel roster loading
//!
//! Fetches the personnel list export, decodes it into records and keeps
//! the current snapshot for queries.

pub mod parser;
pub mod source;
pub mod store;
pub mod types;
pub mod updater;

pub use parser::{parse_area_ids, parse_csv, parse_document, parse_json};
pub use source::{FileRosterSource, HttpRosterSource, RosterSource};
pub use store::RosterStore;
pub use types::{
    ParsedRoster, Roster, RosterColumns, RosterDocument, RosterError, RosterFormat,
    RosterLoadReport, RowError,
};
pub use updater::RosterUpdater;
