//! Roster document parser
//!
//! Decodes personnel list exports (JSON or CSV) into `PersonnelRecord`s.
//! Column names come from `RosterColumns`. Bad rows are logged and
//! skipped; only an unreadable document fails the whole parse.

use std::collections::HashSet;
use std::sync::LazyLock;

use areamap_common::{PersonnelRecord, Region};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};

use super::types::{ParsedRoster, RosterColumns, RosterDocument, RosterError, RosterFormat, RowError};

/// Separators seen in multi-value text columns
static AREA_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;,|\r\n]+").expect("valid separator regex"));

type Row = Map<String, Value>;

/// Parse a fetched document according to its format.
pub fn parse_document(
    document: &RosterDocument,
    columns: &RosterColumns,
    include_hidden: bool,
) -> Result<ParsedRoster, RosterError> {
    match document.format {
        RosterFormat::Json => parse_json(&document.content, columns, include_hidden),
        RosterFormat::Csv => parse_csv(&document.content, columns, include_hidden),
    }
}

/// Parse a JSON export: an array of row objects, or an object wrapping the
/// array under `value` or `items`.
pub fn parse_json(
    content: &str,
    columns: &RosterColumns,
    include_hidden: bool,
) -> Result<ParsedRoster, RosterError> {
    let document: Value = serde_json::from_str(content)?;

    let rows = match document {
        Value::Array(rows) => rows,
        Value::Object(mut envelope) => match envelope.remove("value").or_else(|| envelope.remove("items")) {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(RosterError::InvalidDocument(
                    "expected an array of rows or a 'value'/'items' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(RosterError::InvalidDocument(
                "expected an array of rows".to_string(),
            ))
        }
    };

    let rows = rows.into_iter().map(|value| match value {
        Value::Object(row) => Ok(row),
        _ => Err(RowError::NotAnObject),
    });

    Ok(collect_records(rows, columns, include_hidden))
}

/// Parse a CSV export with a header row.
pub fn parse_csv(
    content: &str,
    columns: &RosterColumns,
    include_hidden: bool,
) -> Result<ParsedRoster, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let mut rows: Vec<Result<Row, RowError>> = Vec::new();
    let mut unreadable = 0;

    for (index, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let row: Row = headers
                    .iter()
                    .zip(record.iter())
                    .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
                    .collect();
                rows.push(Ok(row));
            }
            Err(e) => {
                unreadable += 1;
                tracing::warn!("Error parsing roster CSV row {}: {}", index + 1, e);
            }
        }
    }

    let mut parsed = collect_records(rows.into_iter(), columns, include_hidden);
    parsed.skipped += unreadable;
    Ok(parsed)
}

fn collect_records(
    rows: impl Iterator<Item = Result<Row, RowError>>,
    columns: &RosterColumns,
    include_hidden: bool,
) -> ParsedRoster {
    let mut parsed = ParsedRoster::default();
    let mut emails: HashSet<String> = HashSet::new();

    for (index, row) in rows.enumerate() {
        let record = match row.and_then(|row| record_from_row(&row, columns)) {
            Ok(record) => record,
            Err(e) => {
                parsed.skipped += 1;
                tracing::warn!("Skipping roster row {}: {}", index + 1, e);
                continue;
            }
        };

        // Hidden rows never claim an email, a visible row for the same person still loads
        if !record.include_on_map && !include_hidden {
            parsed.hidden += 1;
            continue;
        }

        if emails.insert(record.email.to_lowercase()) {
            parsed.records.push(record);
        } else {
            parsed.skipped += 1;
            tracing::warn!(
                "Skipping roster row {}: {}",
                index + 1,
                RowError::DuplicateEmail(record.email)
            );
        }
    }

    tracing::debug!(
        "Parsed roster: {} records, {} skipped, {} hidden",
        parsed.records.len(),
        parsed.skipped,
        parsed.hidden
    );

    parsed
}

/// Build one record from a row using the configured column names.
pub fn record_from_row(row: &Row, columns: &RosterColumns) -> Result<PersonnelRecord, RowError> {
    let email = text(row, &columns.email).ok_or_else(|| RowError::MissingField(columns.email.clone()))?;
    if !email.contains('@') {
        return Err(RowError::InvalidEmail(email));
    }

    let mut record = PersonnelRecord::new(
        email,
        text(row, &columns.first_name).unwrap_or_default(),
        text(row, &columns.last_name).unwrap_or_default(),
    );
    record.preferred_first_name = text(row, &columns.preferred_first_name);
    record.job_title = text(row, &columns.job_title).unwrap_or_default();
    record.manager = text(row, &columns.manager).unwrap_or_default();
    record.notes = text(row, &columns.notes);
    record.region = text(row, &columns.region).and_then(|r| r.parse::<Region>().ok());
    record.profile_picture = url(row, &columns.profile_picture);
    record.last_updated = text(row, &columns.last_updated).and_then(|t| parse_timestamp(&t));
    record.pe_license = flag(row, &columns.pe_license).unwrap_or(false);
    record.include_on_map = flag(row, &columns.include_on_map).unwrap_or(true);
    record.primary_area_ids = row.get(&columns.primary_areas).map(parse_area_ids).unwrap_or_default();
    record.secondary_area_ids = row.get(&columns.secondary_areas).map(parse_area_ids).unwrap_or_default();

    Ok(record)
}

/// Decode a multi-value area column.
///
/// Accepts a JSON array, a string holding a JSON array, or a delimited
/// string. Blank entries are dropped; identifiers are not validated here.
pub fn parse_area_ids(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') {
                if let Ok(inner) = serde_json::from_str::<Value>(trimmed) {
                    if inner.is_array() {
                        return parse_area_ids(&inner);
                    }
                }
                tracing::debug!("Area column looks like JSON but does not parse: {}", trimmed);
            }
            AREA_SEPARATORS
                .split(trimmed)
                .map(|part| part.trim().trim_matches(|c| c == '[' || c == ']' || c == '"'))
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Non-empty text value. People-picker objects yield their display title.
fn text(row: &Row, column: &str) -> Option<String> {
    let value = match row.get(column)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(person) => ["Title", "title", "EMail", "Email", "email"]
            .iter()
            .find_map(|key| person.get(*key).and_then(Value::as_str))
            .map(|s| s.trim().to_string())?,
        _ => return None,
    };
    if value.is_empty() { None } else { Some(value) }
}

/// Link columns come either as a plain string or as `{ "Url": ... }`.
fn url(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Object(link) => link
            .get("Url")
            .or_else(|| link.get("url"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => text(row, column),
    }
}

fn flag(row: &Row, column: &str) -> Option<bool> {
    match row.get(column)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE_JSON: &str = r#"[
        {
            "FirstName": "Ann",
            "LastName": "Bell",
            "Email": "ann.bell@example.com",
            "JobTitle": "Field Engineer",
            "Manager": { "Title": "Dana Fox", "EMail": "dana.fox@example.com" },
            "Region": "East",
            "ProfilePicture": { "Url": "https://example.com/ann.png" },
            "LastUpdated": "2024-05-01T12:00:00Z",
            "PELicense": true,
            "IncludeOnMap": true,
            "PrimaryAreaIDs": "[\"A06_GulfCoast\",\"A01_BaltimoreCoast\"]",
            "SecondaryAreaIDs": ["B01_Chicago"]
        },
        {
            "FirstName": "Hidden",
            "LastName": "Person",
            "Email": "hidden@example.com",
            "IncludeOnMap": false,
            "PrimaryAreaIDs": "C01_Seattle"
        },
        {
            "FirstName": "No",
            "LastName": "Email",
            "PrimaryAreaIDs": "A06_GulfCoast"
        },
        {
            "FirstName": "Ann",
            "LastName": "Duplicate",
            "Email": "ANN.BELL@example.com"
        },
        "not a row"
    ]"#;

    const SAMPLE_CSV: &str = "FirstName,LastName,PreferredFirstName,Email,JobTitle,Region,IncludeOnMap,PrimaryAreaIDs,SecondaryAreaIDs
Robert,Cho,Bobby,robert.cho@example.com,Account Manager,Central,yes,B01_Chicago;B02_Detroit,
Cara,Diaz,,cara.diaz@example.com,Field Engineer,West,,C05_NorthernCalifornia,\"A06_GulfCoast, B01_Chicago\"
Bad,Row,,not-an-email,Engineer,West,yes,C01_Seattle,
";

    #[test]
    fn test_parse_json_rows() {
        let parsed = parse_json(SAMPLE_JSON, &RosterColumns::default(), false).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.hidden, 1);
        assert_eq!(parsed.skipped, 3);

        let ann = &parsed.records[0];
        assert_eq!(ann.email, "ann.bell@example.com");
        assert_eq!(ann.manager, "Dana Fox");
        assert_eq!(ann.region, Some(Region::East));
        assert_eq!(ann.profile_picture.as_deref(), Some("https://example.com/ann.png"));
        assert!(ann.pe_license);
        assert!(ann.last_updated.is_some());
        assert_eq!(ann.primary_area_ids, vec!["A06_GulfCoast", "A01_BaltimoreCoast"]);
        assert_eq!(ann.secondary_area_ids, vec!["B01_Chicago"]);
    }

    #[test]
    fn test_parse_json_include_hidden() {
        let parsed = parse_json(SAMPLE_JSON, &RosterColumns::default(), true).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.hidden, 0);
        assert!(!parsed.records[1].include_on_map);
    }

    #[test]
    fn test_hidden_row_does_not_shadow_visible_row() {
        let content = r#"[
            { "Email": "x@example.com", "LastName": "Old", "IncludeOnMap": false },
            { "Email": "X@example.com", "LastName": "Current", "PrimaryAreaIDs": "A06_GulfCoast" }
        ]"#;

        let parsed = parse_json(content, &RosterColumns::default(), false).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.hidden, 1);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.records[0].last_name, "Current");

        // With hidden rows kept, the first row wins as usual
        let parsed = parse_json(content, &RosterColumns::default(), true).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records[0].last_name, "Old");
    }

    #[test]
    fn test_parse_json_envelope() {
        let content = r#"{ "value": [ { "Email": "a@example.com", "LastName": "A" } ] }"#;
        let parsed = parse_json(content, &RosterColumns::default(), false).unwrap();
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn test_parse_json_invalid_document() {
        assert!(matches!(
            parse_json("42", &RosterColumns::default(), false),
            Err(RosterError::InvalidDocument(_))
        ));
        assert!(matches!(
            parse_json("{ nope", &RosterColumns::default(), false),
            Err(RosterError::Json(_))
        ));
    }

    #[test]
    fn test_parse_csv_rows() {
        let parsed = parse_csv(SAMPLE_CSV, &RosterColumns::default(), false).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);

        let bob = &parsed.records[0];
        assert_eq!(bob.display_name(), "Bobby Cho");
        assert_eq!(bob.region, Some(Region::Central));
        assert_eq!(bob.primary_area_ids, vec!["B01_Chicago", "B02_Detroit"]);
        assert!(bob.secondary_area_ids.is_empty());

        let cara = &parsed.records[1];
        assert!(cara.preferred_first_name.is_none());
        assert!(cara.include_on_map);
        assert_eq!(cara.secondary_area_ids, vec!["A06_GulfCoast", "B01_Chicago"]);
    }

    #[test]
    fn test_custom_columns() {
        let columns = RosterColumns {
            email: "Mail".to_string(),
            primary_areas: "Areas".to_string(),
            ..RosterColumns::default()
        };
        let content = r#"[ { "Mail": "x@example.com", "Areas": "A06_GulfCoast" } ]"#;
        let parsed = parse_json(content, &columns, false).unwrap();
        assert_eq!(parsed.records[0].primary_area_ids, vec!["A06_GulfCoast"]);
    }

    #[test]
    fn test_parse_area_ids_encodings() {
        assert_eq!(parse_area_ids(&json!(["A06_GulfCoast", " ", "B01_Chicago"])), vec!["A06_GulfCoast", "B01_Chicago"]);
        assert_eq!(parse_area_ids(&json!("[\"A06_GulfCoast\"]")), vec!["A06_GulfCoast"]);
        assert_eq!(parse_area_ids(&json!("A06_GulfCoast; B01_Chicago\nC05_NorthernCalifornia")).len(), 3);
        assert_eq!(parse_area_ids(&json!("A06_GulfCoast|B01_Chicago")).len(), 2);
        assert!(parse_area_ids(&json!("")).is_empty());
        assert!(parse_area_ids(&json!(null)).is_empty());
        assert!(parse_area_ids(&json!(12)).is_empty());
    }

    #[test]
    fn test_record_from_row_missing_email() {
        let row = json!({ "FirstName": "A" });
        let row = row.as_object().unwrap();
        assert_eq!(
            record_from_row(row, &RosterColumns::default()),
            Err(RowError::MissingField("Email".to_string()))
        );
    }
}
