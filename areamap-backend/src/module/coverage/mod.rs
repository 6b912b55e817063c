//! Area coverage queries
//!
//! - `matcher`: region/area/coverage filtering of a roster snapshot
//! - `collation`: display ordering of last names
//! - `format`: display labels for identifiers and result headings
//! - `catalog`: per-region area lists and per-area head counts
//! - `user_search`: person lookup by name, title or email

mod catalog;
mod collation;
mod format;
mod matcher;
mod user_search;

pub use catalog::{AreaOption, area_options, assigned_count, region_for_area_code};
pub use collation::compare_names;
pub use format::{area_label, format_area_list, results_subtitle, results_title};
pub use matcher::{
    MatchOptions, UnscopedArea, find_matches, find_matches_with, matches_area,
    normalize_area_name, resolve_region_prefix,
};
pub use user_search::{DEFAULT_USER_SEARCH_LIMIT, find_by_email, search_users};
