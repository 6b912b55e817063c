//! Area catalog derived from the roster
//!
//! The map and the search form only know about areas somebody is assigned
//! to, so the option lists are built from the identifiers in the roster.

use std::collections::BTreeMap;

use areamap_common::{AreaId, PersonnelRecord, Region};
use serde::Serialize;

use super::format::area_label;
use super::matcher::normalize_area_name;

/// One entry of the area drop-down for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaOption {
    /// Name segment as stored, e.g. "GulfCoast"
    pub name: String,
    /// Display label, e.g. "Gulf Coast"
    pub label: String,
    /// Code part of the first identifier seen, e.g. "A06"
    pub code: String,
}

fn all_identifiers(record: &PersonnelRecord) -> impl Iterator<Item = &String> {
    record
        .primary_area_ids
        .iter()
        .chain(record.secondary_area_ids.iter())
}

/// Distinct areas referenced in `region`, sorted by name.
///
/// Names are deduplicated after normalization; the first spelling wins.
pub fn area_options(roster: &[PersonnelRecord], region: Region) -> Vec<AreaOption> {
    let Some(prefix) = region.prefix() else {
        return Vec::new();
    };

    let mut seen: BTreeMap<String, AreaOption> = BTreeMap::new();
    for id in roster.iter().flat_map(|r| all_identifiers(r)) {
        let Some(area) = AreaId::parse(id) else {
            continue;
        };
        if !area.has_prefix(Some(prefix)) {
            continue;
        }
        seen.entry(normalize_area_name(area.name)).or_insert_with(|| AreaOption {
            name: area.name.to_string(),
            label: area_label(id).unwrap_or_else(|| area.name.to_string()),
            code: area.code.to_string(),
        });
    }

    let mut options: Vec<AreaOption> = seen.into_values().collect();
    options.sort_by(|a, b| a.name.cmp(&b.name));
    options
}

/// Number of people assigned (primary or secondary) to a map area.
///
/// `area_code` may be a bare code ("A06") or a full identifier.
pub fn assigned_count(roster: &[PersonnelRecord], area_code: &str) -> usize {
    let wanted = area_code.trim();
    if wanted.is_empty() {
        return 0;
    }
    let wanted_code = AreaId::parse(wanted).map(|id| id.code).unwrap_or(wanted);

    roster
        .iter()
        .filter(|record| {
            all_identifiers(record).any(|id| {
                AreaId::parse(id).is_some_and(|area| area.code.eq_ignore_ascii_case(wanted_code))
            })
        })
        .count()
}

/// Region owning a map area code, by its prefix letter.
pub fn region_for_area_code(code: &str) -> Option<Region> {
    code.trim().chars().next().and_then(Region::from_prefix)
}
