//! Analytics event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of user interaction being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    MapClick,
    Search,
    PersonnelView,
    FilterChange,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::MapClick => "map_click",
            EventType::Search => "search",
            EventType::PersonnelView => "personnel_view",
            EventType::FilterChange => "filter_change",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub event_type: EventType,
    /// Login of the viewer, when the client knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_value: Option<String>,
    /// Email of the person whose card was opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personnel_viewed: Option<String>,
}

impl AnalyticsEvent {
    pub fn new(event_type: EventType, session_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id: session_id.into(),
            event_type,
            user_id: None,
            user_email: None,
            area_code: None,
            area_name: None,
            region: None,
            search_term: None,
            filter_type: None,
            filter_value: None,
            personnel_viewed: None,
        }
    }

    pub fn with_user(mut self, id: Option<&str>, email: Option<&str>) -> Self {
        let clean = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
        self.user_id = clean(id);
        self.user_email = clean(email);
        self
    }

    pub fn with_area(mut self, code: Option<&str>, name: Option<&str>) -> Self {
        self.area_code = code.map(str::to_string);
        self.area_name = name.map(str::to_string);
        self
    }

    pub fn with_region(mut self, region: Option<&str>) -> Self {
        self.region = region.map(str::to_string);
        self
    }

    pub fn with_search(mut self, term: Option<&str>) -> Self {
        self.search_term = term.map(str::to_string);
        self
    }

    pub fn with_filter(mut self, filter_type: &str, filter_value: &str) -> Self {
        self.filter_type = Some(filter_type.to_string());
        self.filter_value = Some(filter_value.to_string());
        self
    }

    pub fn with_personnel(mut self, email: &str) -> Self {
        self.personnel_viewed = Some(email.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = AnalyticsEvent::new(EventType::Search, "session_1")
            .with_region(Some("East"))
            .with_search(Some("Gulf Coast"))
            .with_filter("coverage", "primary");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eventType"], "search");
        assert_eq!(json["sessionId"], "session_1");
        assert_eq!(json["filterValue"], "primary");
        assert!(json.get("personnelViewed").is_none());
        assert!(json.get("userEmail").is_none());
    }

    #[test]
    fn test_event_user_fields() {
        let event = AnalyticsEvent::new(EventType::MapClick, "session_1")
            .with_user(Some("i:0#.f|membership|kim@example.com"), Some(" kim@example.com "));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["userId"], "i:0#.f|membership|kim@example.com");
        assert_eq!(json["userEmail"], "kim@example.com");

        let blank = AnalyticsEvent::new(EventType::Search, "session_1").with_user(None, Some(""));
        assert_eq!(blank.user_email, None);
    }

    #[test]
    fn test_event_type_names() {
        assert_eq!(EventType::MapClick.to_string(), "map_click");
        let parsed: EventType = serde_json::from_str("\"personnel_view\"").unwrap();
        assert_eq!(parsed, EventType::PersonnelView);
    }
}
