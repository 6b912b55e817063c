//! Roster data types

use areamap_common::PersonnelRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Immutable roster snapshot handed to queries.
#[derive(Debug, Clone)]
pub struct Roster {
    pub records: Vec<PersonnelRecord>,
    pub loaded_at: DateTime<Utc>,
    /// Where the records came from (path or URL)
    pub source: String,
}

impl Roster {
    pub fn new(records: Vec<PersonnelRecord>, source: impl Into<String>) -> Self {
        Self {
            records,
            loaded_at: Utc::now(),
            source: source.into(),
        }
    }

    /// Placeholder used before the first successful load.
    pub fn empty() -> Self {
        Self::new(Vec::new(), "")
    }

    pub fn records(&self) -> &[PersonnelRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Column names of the personnel list export.
///
/// Defaults are the list's internal field names; any of them can be
/// overridden in `[roster.columns]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    pub first_name: String,
    pub last_name: String,
    pub preferred_first_name: String,
    pub email: String,
    pub job_title: String,
    pub manager: String,
    pub region: String,
    pub notes: String,
    pub profile_picture: String,
    pub last_updated: String,
    pub pe_license: String,
    pub include_on_map: String,
    pub primary_areas: String,
    pub secondary_areas: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            first_name: "FirstName".to_string(),
            last_name: "LastName".to_string(),
            preferred_first_name: "PreferredFirstName".to_string(),
            email: "Email".to_string(),
            job_title: "JobTitle".to_string(),
            manager: "Manager".to_string(),
            region: "Region".to_string(),
            notes: "Notes".to_string(),
            profile_picture: "ProfilePicture".to_string(),
            last_updated: "LastUpdated".to_string(),
            pe_license: "PELicense".to_string(),
            include_on_map: "IncludeOnMap".to_string(),
            primary_areas: "PrimaryAreaIDs".to_string(),
            secondary_areas: "SecondaryAreaIDs".to_string(),
        }
    }
}

/// Encoding of a roster document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Json,
    Csv,
}

impl RosterFormat {
    /// Guess from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(RosterFormat::Json),
            "csv" => Some(RosterFormat::Csv),
            _ => None,
        }
    }
}

/// Raw roster document as fetched from a source.
#[derive(Debug, Clone)]
pub struct RosterDocument {
    pub format: RosterFormat,
    pub content: String,
}

/// Outcome of parsing one roster document.
#[derive(Debug, Clone, Default)]
pub struct ParsedRoster {
    pub records: Vec<PersonnelRecord>,
    /// Rows dropped because they were malformed or duplicated
    pub skipped: usize,
    /// Rows dropped because they are not shown on the map
    pub hidden: usize,
}

/// Summary of one roster reload.
#[derive(Debug, Clone)]
pub struct RosterLoadReport {
    pub source: String,
    pub loaded: usize,
    pub skipped: usize,
    pub hidden: usize,
    pub duration_seconds: f64,
}

impl std::fmt::Display for RosterLoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Source: {}, Loaded: {}, Skipped: {}, Hidden: {}, Took: {:.2}s",
            self.source, self.loaded, self.skipped, self.hidden, self.duration_seconds
        )
    }
}

/// Failures that abort a whole roster load.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid roster JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid roster CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster download failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP error {status} from {url}")]
    HttpStatus { status: u16, url: String },
    #[error("unsupported roster format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid roster document: {0}")]
    InvalidDocument(String),
}

/// Problems with a single row; the row is skipped and the load continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("missing required field '{0}'")]
    MissingField(String),
    #[error("invalid email '{0}'")]
    InvalidEmail(String),
    #[error("duplicate email '{0}'")]
    DuplicateEmail(String),
    #[error("row is not an object")]
    NotAnObject,
}
