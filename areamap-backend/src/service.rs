//! HTTP API
//!
//! Every handler takes one roster snapshot from the store and runs its query
//! against it, so a reload in flight never changes a response half way.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use areamap_common::{AreaId, CoverageQuery, CoverageType, MatchedCoverage, PersonnelRecord, Region};

use crate::module::analytics::{AnalyticsEvent, AnalyticsLog, EventType, new_session_id};
use crate::module::coverage::{
    AreaOption, MatchOptions, area_label, area_options, assigned_count, find_by_email,
    find_matches_with, format_area_list, region_for_area_code, results_subtitle, results_title,
    search_users,
};
use crate::module::roster::RosterStore;

const ANONYMOUS_SESSION: &str = "anonymous";
const DEFAULT_RECENT_EVENTS: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub store: RosterStore,
    pub analytics: Arc<AnalyticsLog>,
    pub options: MatchOptions,
    pub user_search_limit: usize,
}

/// One person as shown in a result list or a detail card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelCard {
    pub display_name: String,
    pub email: String,
    pub job_title: String,
    pub manager: String,
    pub region: Option<Region>,
    pub notes: Option<String>,
    pub profile_picture: Option<String>,
    pub pe_license: bool,
    /// Set only when the card comes from a coverage search
    pub matched_coverage: Option<MatchedCoverage>,
    pub primary_areas: String,
    pub secondary_areas: String,
}

impl PersonnelCard {
    fn from_record(record: &PersonnelRecord, matched_coverage: Option<MatchedCoverage>) -> Self {
        Self {
            display_name: record.display_name(),
            email: record.email.clone(),
            job_title: record.job_title.clone(),
            manager: record.manager.clone(),
            region: record.region,
            notes: record.notes.clone(),
            profile_picture: record.profile_picture.clone(),
            pe_license: record.pe_license,
            matched_coverage,
            primary_areas: format_area_list(&record.primary_area_ids),
            secondary_areas: format_area_list(&record.secondary_area_ids),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub title: String,
    pub subtitle: String,
    pub count: usize,
    pub results: Vec<PersonnelCard>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub region: Option<String>,
    pub area: Option<String>,
    pub coverage: Option<String>,
    pub session: Option<String>,
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
    #[serde(alias = "userEmail")]
    pub user_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MapClickParams {
    pub session: Option<String>,
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
    #[serde(alias = "userEmail")]
    pub user_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserSearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentParams {
    pub limit: Option<usize>,
}

/// Interaction reported by the browser.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEvent {
    pub session_id: Option<String>,
    pub event_type: EventType,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub area_code: Option<String>,
    pub area_name: Option<String>,
    pub region: Option<String>,
    pub filter_type: Option<String>,
    pub filter_value: Option<String>,
    pub personnel_viewed: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn session_or_anonymous(session: Option<&str>) -> &str {
    session.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(ANONYMOUS_SESSION)
}

fn run_search(state: &AppState, records: &[PersonnelRecord], query: &CoverageQuery) -> SearchResponse {
    let results: Vec<PersonnelCard> = find_matches_with(records, query, &state.options)
        .into_iter()
        .map(|m| PersonnelCard::from_record(m.record, Some(m.coverage_type)))
        .collect();

    SearchResponse {
        title: results_title(query),
        subtitle: results_subtitle(results.len()),
        count: results.len(),
        results,
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let roster = state.store.snapshot().await;
    Json(json!({
        "status": "running",
        "service": "areamap-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "rosterSize": roster.len(),
        "rosterSource": roster.source,
        "loadedAt": roster.loaded_at,
        "analyticsEnabled": state.analytics.is_enabled(),
    }))
}

async fn new_session() -> impl IntoResponse {
    Json(json!({ "sessionId": new_session_id() }))
}

/// Search form: free-text region/area/coverage. Unknown region text means
/// no region, unknown coverage text means all.
async fn search_personnel(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let region = params.region.as_deref().and_then(|r| r.parse::<Region>().ok());
    let area = params.area.as_deref().map(str::trim).filter(|a| !a.is_empty());
    let coverage = params
        .coverage
        .as_deref()
        .map(CoverageType::from_string)
        .unwrap_or_default();
    let query = CoverageQuery::new(region, area, coverage);

    let roster = state.store.snapshot().await;
    let response = run_search(&state, roster.records(), &query);

    let event = AnalyticsEvent::new(EventType::Search, session_or_anonymous(params.session.as_deref()))
        .with_region(region.map(|r| r.as_str()))
        .with_search(area)
        .with_filter("coverage", coverage.as_str())
        .with_user(params.user_id.as_deref(), params.user_email.as_deref());
    state.analytics.record(event).await;

    Json(response)
}

/// Map click on one area shape, identified by its area id ("A06_GulfCoast").
async fn map_area_click(
    State(state): State<AppState>,
    Path(area_id): Path<String>,
    Query(params): Query<MapClickParams>,
) -> impl IntoResponse {
    let roster = state.store.snapshot().await;
    let parsed = AreaId::parse(&area_id);

    let response = match parsed {
        Some(id) => {
            let query = CoverageQuery::new(id.region(), Some(id.name), CoverageType::All);
            let mut response = run_search(&state, roster.records(), &query);
            if let Some(label) = area_label(&area_id) {
                response.title = label;
            }
            response
        }
        None => {
            tracing::debug!("Unparsable area id from map: {}", area_id);
            SearchResponse {
                title: area_id.clone(),
                subtitle: results_subtitle(0),
                count: 0,
                results: Vec::new(),
            }
        }
    };

    let event = AnalyticsEvent::new(EventType::MapClick, session_or_anonymous(params.session.as_deref()))
        .with_area(Some(area_id.as_str()), parsed.map(|id| id.name))
        .with_region(parsed.and_then(|id| id.region()).map(|r| r.as_str()))
        .with_user(params.user_id.as_deref(), params.user_email.as_deref());
    state.analytics.record(event).await;

    Json(response)
}

async fn region_areas(State(state): State<AppState>, Path(region): Path<String>) -> Response {
    let region = match region.parse::<Region>() {
        Ok(region) => region,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let roster = state.store.snapshot().await;
    let options: Vec<AreaOption> = area_options(roster.records(), region);
    Json(options).into_response()
}

async fn area_count(State(state): State<AppState>, Path(code): Path<String>) -> impl IntoResponse {
    let roster = state.store.snapshot().await;
    let count = assigned_count(roster.records(), &code);
    Json(json!({
        "code": code,
        "region": region_for_area_code(&code),
        "count": count,
    }))
}

async fn search_user_cards(
    State(state): State<AppState>,
    Query(params): Query<UserSearchParams>,
) -> impl IntoResponse {
    let roster = state.store.snapshot().await;
    let cards: Vec<PersonnelCard> = search_users(roster.records(), &params.q, state.user_search_limit)
        .into_iter()
        .map(|record| PersonnelCard::from_record(record, None))
        .collect();
    Json(cards)
}

async fn user_card(State(state): State<AppState>, Path(email): Path<String>) -> Response {
    let roster = state.store.snapshot().await;
    match find_by_email(roster.records(), &email) {
        Some(record) => Json(PersonnelCard::from_record(record, None)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("No personnel with email {}", email)),
    }
}

/// Only client-side interactions are accepted here; searches and map clicks
/// are recorded by their own endpoints.
async fn record_event(State(state): State<AppState>, Json(client): Json<ClientEvent>) -> Response {
    let event = match client.event_type {
        EventType::PersonnelView => {
            let Some(email) = client.personnel_viewed.as_deref() else {
                return error_response(StatusCode::BAD_REQUEST, "personnelViewed is required");
            };
            AnalyticsEvent::new(EventType::PersonnelView, session_or_anonymous(client.session_id.as_deref()))
                .with_personnel(email)
        }
        EventType::FilterChange => {
            let (Some(filter_type), Some(filter_value)) =
                (client.filter_type.as_deref(), client.filter_value.as_deref())
            else {
                return error_response(StatusCode::BAD_REQUEST, "filterType and filterValue are required");
            };
            AnalyticsEvent::new(EventType::FilterChange, session_or_anonymous(client.session_id.as_deref()))
                .with_filter(filter_type, filter_value)
        }
        other => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("{} events are recorded by the server", other),
            );
        }
    }
    .with_area(client.area_code.as_deref(), client.area_name.as_deref())
    .with_region(client.region.as_deref())
    .with_user(client.user_id.as_deref(), client.user_email.as_deref());

    state.analytics.record(event).await;
    StatusCode::ACCEPTED.into_response()
}

async fn recent_events(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_EVENTS);
    Json(state.analytics.recent(limit).await)
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(stats))
        .route("/api/session", get(new_session))
        .route("/api/personnel/search", get(search_personnel))
        .route("/api/map/areas/{area_id}", get(map_area_click))
        .route("/api/regions/{region}/areas", get(region_areas))
        .route("/api/areas/{code}/count", get(area_count))
        .route("/api/users", get(search_user_cards))
        .route("/api/users/{email}", get(user_card))
        .route("/api/analytics", post(record_event))
        .route("/api/analytics/recent", get(recent_events))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
