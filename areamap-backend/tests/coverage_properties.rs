use areamap_backend::module::coverage::{
    MatchOptions, UnscopedArea, find_matches, find_matches_with, format_area_list,
};
use areamap_common::{CoverageQuery, CoverageType, MatchedCoverage, PersonnelRecord, Region};

fn person(email: &str, last: &str, primary: &[&str], secondary: &[&str]) -> PersonnelRecord {
    let mut record = PersonnelRecord::new(email, "Test", last);
    record.primary_area_ids = primary.iter().map(|s| s.to_string()).collect();
    record.secondary_area_ids = secondary.iter().map(|s| s.to_string()).collect();
    record
}

fn mixed_roster() -> Vec<PersonnelRecord> {
    vec![
        person("a@example.com", "Young", &["A06_GulfCoast"], &["B01_Chicago"]),
        person("b@example.com", "Adams", &["a06_gulfcoast"], &[]),
        person("c@example.com", "Baker", &[], &["A06_GulfCoast", "garbage"]),
        person("d@example.com", "Clark", &["C05_NorthernCalifornia"], &["A01_Maine"]),
        person("e@example.com", "Evans", &["garbage", "_", "A_"], &[]),
    ]
}

fn all_queries() -> Vec<CoverageQuery> {
    let mut queries = Vec::new();
    let regions = [None, Some(Region::East), Some(Region::Central), Some(Region::West), Some(Region::AllInside)];
    let areas = [None, Some("Gulf Coast"), Some("gulfcoast"), Some("Chicago"), Some("Nowhere")];
    let coverages = [CoverageType::All, CoverageType::Primary, CoverageType::Secondary];
    for region in regions {
        for area in areas {
            for coverage in coverages {
                queries.push(CoverageQuery::new(region, area, coverage));
            }
        }
    }
    queries
}

#[test]
fn results_come_from_roster_and_respect_filters() {
    let roster = mixed_roster();
    for query in all_queries() {
        let results = find_matches(&roster, &query);

        for result in &results {
            assert!(roster.iter().any(|r| std::ptr::eq(r, result.record)));
        }
        match query.coverage_type {
            CoverageType::Primary => assert!(results.iter().all(|r| r.coverage_type == MatchedCoverage::Primary)),
            CoverageType::Secondary => assert!(results.iter().all(|r| r.coverage_type == MatchedCoverage::Secondary)),
            CoverageType::All => {}
        }

        // Primary-tagged results come before secondary-tagged ones
        let first_secondary = results
            .iter()
            .position(|r| r.coverage_type == MatchedCoverage::Secondary)
            .unwrap_or(results.len());
        assert!(results[first_secondary..].iter().all(|r| r.coverage_type == MatchedCoverage::Secondary));

        assert_eq!(results, find_matches(&roster, &query));
    }
}

#[test]
fn area_match_ignores_case_and_spaces() {
    let roster = mixed_roster();
    let spaced = find_matches(&roster, &CoverageQuery::new(Some(Region::East), Some("Gulf Coast"), CoverageType::All));
    let squashed = find_matches(&roster, &CoverageQuery::new(Some(Region::East), Some("GULFCOAST"), CoverageType::All));

    assert_eq!(spaced, squashed);
    let emails: Vec<&str> = spaced.iter().map(|r| r.record.email.as_str()).collect();
    assert_eq!(emails, vec!["b@example.com", "a@example.com", "c@example.com"]);
}

#[test]
fn garbage_identifiers_never_match() {
    let roster = vec![person("e@example.com", "Evans", &["garbage"], &["garbage"])];
    for query in all_queries() {
        assert!(find_matches(&roster, &query).is_empty());
    }
}

#[test]
fn single_primary_match() {
    let roster = vec![person("r@example.com", "Reed", &["A06_GulfCoast"], &[])];

    let results = find_matches(&roster, &CoverageQuery::new(Some(Region::East), Some("Gulf Coast"), CoverageType::All));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].coverage_type, MatchedCoverage::Primary);

    let results = find_matches(&roster, &CoverageQuery::new(Some(Region::East), Some("Gulf Coast"), CoverageType::Secondary));
    assert!(results.is_empty());
}

#[test]
fn primary_before_secondary_for_same_area() {
    let roster = vec![
        person("s@example.com", "Allen", &[], &["B01_Chicago"]),
        person("p@example.com", "Zimmer", &["B01_Chicago"], &[]),
    ];
    let results = find_matches(&roster, &CoverageQuery::new(Some(Region::Central), Some("Chicago"), CoverageType::All));

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].record.email, "p@example.com");
    assert_eq!(results[0].coverage_type, MatchedCoverage::Primary);
    assert_eq!(results[1].coverage_type, MatchedCoverage::Secondary);
}

#[test]
fn area_list_formatting() {
    assert_eq!(format_area_list(&["C05_NorthernCalifornia"]), "Northern California");
    assert_eq!(format_area_list(&["A06_GulfCoast", "bad", "B01_Chicago"]), "Gulf Coast, Chicago");
}

#[test]
fn unscoped_area_policy() {
    let roster = mixed_roster();
    let query = CoverageQuery::new(None, Some("Gulf Coast"), CoverageType::All);

    assert!(find_matches(&roster, &query).is_empty());

    let any_region = MatchOptions { unscoped_area: UnscopedArea::AnyRegion };
    assert_eq!(find_matches_with(&roster, &query, &any_region).len(), 3);
}
