//! Display helpers for area identifiers and result headings

use areamap_common::{AreaId, CoverageQuery};

/// Turn a camel-case name segment into words: "GulfCoast" -> "Gulf Coast".
fn split_camel_case(name: &str) -> String {
    let mut words = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_uppercase() && !words.ends_with(' ') {
            words.push(' ');
        }
        words.push(c);
    }
    words
}

/// Human-readable label for one identifier, `None` if it does not parse.
pub fn area_label(identifier: &str) -> Option<String> {
    AreaId::parse(identifier).map(|id| split_camel_case(id.name))
}

/// Comma-separated labels for a list of identifiers.
///
/// Identifiers that fail to parse are left out.
pub fn format_area_list<S: AsRef<str>>(identifiers: &[S]) -> String {
    identifiers
        .iter()
        .filter_map(|id| area_label(id.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Heading for a result list: the area, else the region, else "All Areas".
pub fn results_title(query: &CoverageQuery) -> String {
    if let Some(area) = query.area.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        return area.to_string();
    }
    match query.region {
        Some(region) => region.to_string(),
        None => "All Areas".to_string(),
    }
}

pub fn results_subtitle(count: usize) -> String {
    format!("{} personnel found", count)
}
