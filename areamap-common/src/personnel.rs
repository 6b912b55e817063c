use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CoverageType, MatchedCoverage, Region};

/// One person's coverage assignment, as loaded from the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelRecord {
    /// Unique key
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub preferred_first_name: Option<String>,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Home region label from the roster (not used for matching)
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pe_license: bool,
    #[serde(default = "default_include_on_map")]
    pub include_on_map: bool,
    #[serde(default)]
    pub primary_area_ids: Vec<String>,
    #[serde(default)]
    pub secondary_area_ids: Vec<String>,
}

fn default_include_on_map() -> bool {
    true
}

impl PersonnelRecord {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            preferred_first_name: None,
            job_title: String::new(),
            manager: String::new(),
            notes: None,
            region: None,
            profile_picture: None,
            last_updated: None,
            pe_license: false,
            include_on_map: true,
            primary_area_ids: Vec::new(),
            secondary_area_ids: Vec::new(),
        }
    }

    /// Preferred first name when set, otherwise the legal first name.
    pub fn given_name(&self) -> &str {
        match self.preferred_first_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.first_name,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name(), self.last_name)
    }
}

/// Region/area/coverage selection coming from the map or the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageQuery {
    #[serde(default)]
    pub region: Option<Region>,
    /// Human-readable area name, spaces allowed ("Gulf Coast")
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub coverage_type: CoverageType,
}

impl CoverageQuery {
    pub fn new(region: Option<Region>, area: Option<&str>, coverage_type: CoverageType) -> Self {
        Self {
            region,
            area: area.map(str::to_string),
            coverage_type,
        }
    }

    /// Whole-region query with all coverage.
    pub fn region(region: Region) -> Self {
        Self::new(Some(region), None, CoverageType::All)
    }
}

/// A roster record that satisfied a query, tagged with the list that matched.
///
/// Borrows the record from the roster snapshot the query ran against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult<'a> {
    pub record: &'a PersonnelRecord,
    pub coverage_type: MatchedCoverage,
}
