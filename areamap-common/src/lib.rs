//! Shared data model for the area map directory.
//!
//! Everything here is plain data: regions, area identifiers, personnel
//! records, coverage queries and match results. Matching itself lives in
//! `areamap-backend`.

pub mod personnel;
pub mod types;

pub use personnel::{CoverageQuery, MatchResult, PersonnelRecord};
pub use types::{AreaId, CoverageType, MatchedCoverage, Region};
