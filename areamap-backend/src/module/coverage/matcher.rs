//! Area-coverage matcher
//!
//! Filters a roster snapshot by region, area and coverage type. Everything
//! here is pure: no I/O, no shared state, and malformed roster data only
//! ever degrades to "no match" for the offending element.

use areamap_common::{AreaId, CoverageQuery, CoverageType, MatchResult, MatchedCoverage, PersonnelRecord, Region};
use serde::{Deserialize, Serialize};

use super::collation::compare_names;

/// Behaviour when a query names an area but no region prefix resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnscopedArea {
    /// Area-based matching requires a region; nothing matches.
    #[default]
    NoMatch,
    /// Match the area name under any region prefix.
    AnyRegion,
}

/// Tunables for [`find_matches_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    #[serde(default)]
    pub unscoped_area: UnscopedArea,
}

/// Resolve free-text region input to its identifier prefix letter.
///
/// Unknown text and regions without a prefix yield `None`, which callers
/// treat as "no region filter".
pub fn resolve_region_prefix(region: &str) -> Option<char> {
    region.parse::<Region>().ok().and_then(|r| r.prefix())
}

/// Strip all whitespace and lower-case.
///
/// Applied to both the query area and the identifier name segment so that
/// "Gulf Coast" and "GulfCoast" compare equal.
pub fn normalize_area_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Test a single identifier against a prefix and an already-normalized area.
pub fn matches_area(identifier: &str, prefix: Option<char>, normalized_area: Option<&str>) -> bool {
    let Some(id) = AreaId::parse(identifier) else {
        return false;
    };

    if !id.has_prefix(prefix) {
        return false;
    }

    match normalized_area {
        Some(area) => normalize_area_name(id.name) == area,
        None => true,
    }
}

/// Find roster records covering the queried region/area.
pub fn find_matches<'a>(roster: &'a [PersonnelRecord], query: &CoverageQuery) -> Vec<MatchResult<'a>> {
    find_matches_with(roster, query, &MatchOptions::default())
}

/// [`find_matches`] with an explicit policy.
///
/// Results are ordered primary before secondary, then by last name, with
/// roster order breaking ties.
pub fn find_matches_with<'a>(
    roster: &'a [PersonnelRecord],
    query: &CoverageQuery,
    options: &MatchOptions,
) -> Vec<MatchResult<'a>> {
    let prefix = query.region.and_then(|r| r.prefix());
    let normalized_area = query
        .area
        .as_deref()
        .map(normalize_area_name)
        .filter(|a| !a.is_empty());

    if prefix.is_none() && normalized_area.is_some() && options.unscoped_area == UnscopedArea::NoMatch {
        tracing::debug!(
            "Area '{}' requested without a region prefix, no matches",
            query.area.as_deref().unwrap_or_default()
        );
        return Vec::new();
    }

    let area = normalized_area.as_deref();
    let covers = |ids: &[String]| ids.iter().any(|id| matches_area(id, prefix, area));

    let mut results: Vec<MatchResult<'a>> = roster
        .iter()
        .filter_map(|record| {
            let is_primary = covers(&record.primary_area_ids);
            let is_secondary = covers(&record.secondary_area_ids);

            let included = match query.coverage_type {
                CoverageType::All => is_primary || is_secondary,
                CoverageType::Primary => is_primary,
                CoverageType::Secondary => is_secondary,
            };
            if !included {
                return None;
            }

            // Under `All`, an area in both lists counts as primary
            let coverage_type = match query.coverage_type {
                CoverageType::Primary => MatchedCoverage::Primary,
                CoverageType::Secondary => MatchedCoverage::Secondary,
                CoverageType::All if is_primary => MatchedCoverage::Primary,
                CoverageType::All => MatchedCoverage::Secondary,
            };
            Some(MatchResult { record, coverage_type })
        })
        .collect();

    // sort_by is stable, roster order survives within equal keys
    results.sort_by(|a, b| {
        a.coverage_type
            .cmp(&b.coverage_type)
            .then_with(|| compare_names(&a.record.last_name, &b.record.last_name))
    });

    tracing::debug!(
        "Coverage query region={:?} area={:?} coverage={} matched {} of {}",
        query.region,
        query.area,
        query.coverage_type,
        results.len(),
        roster.len()
    );

    results
}
