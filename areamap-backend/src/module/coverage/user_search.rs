//! Free-text user lookup for the "search by person" form

use areamap_common::PersonnelRecord;

/// Default cap on user search results.
pub const DEFAULT_USER_SEARCH_LIMIT: usize = 20;

/// Terms shorter than this return the whole roster.
const MIN_TERM_LEN: usize = 2;

/// Case-insensitive substring search over name, job title and email.
///
/// Short terms list the whole roster without a cap; otherwise at most
/// `limit` records are returned in roster order.
pub fn search_users<'a>(roster: &'a [PersonnelRecord], term: &str, limit: usize) -> Vec<&'a PersonnelRecord> {
    let term = term.trim();
    if term.chars().count() < MIN_TERM_LEN {
        return roster.iter().collect();
    }

    let needle = term.to_lowercase();
    roster
        .iter()
        .filter(|person| {
            let fields = [
                Some(person.first_name.as_str()),
                Some(person.last_name.as_str()),
                person.preferred_first_name.as_deref(),
                Some(person.job_title.as_str()),
                Some(person.email.as_str()),
            ];
            fields
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .take(limit)
        .collect()
}

/// Exact, case-insensitive email lookup.
pub fn find_by_email<'a>(roster: &'a [PersonnelRecord], email: &str) -> Option<&'a PersonnelRecord> {
    let email = email.trim();
    roster.iter().find(|p| p.email.eq_ignore_ascii_case(email))
}
