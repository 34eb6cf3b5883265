//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::calendar::CalendarError;
use crate::conditions::{ConditionError, RouteConditions};
use crate::domain::TripId;
use crate::planner::{Planner, SearchError, SearchRequest};
use crate::scorer::line_coverage;
use crate::timetable::{ConnectionFilter, TimetableError, TripChain, build_trip_station_chains};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routes/search", post(search_routes))
        .route("/trips/:trip_id", get(trip_chain))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search for routes satisfying the posted conditions.
async fn search_routes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SearchRoutesResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: SearchRoutesRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid search request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let requirements = req.line_requirements();
    let conditions = RouteConditions::new(req.conditions)?;
    let mut request = SearchRequest::new(conditions);
    if let Some(requirements) = requirements {
        request = request.with_requirements(requirements);
    }

    let response = tokio::task::spawn_blocking(move || run_search(&state, &request))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Search task failed: {e}"),
        })??;

    Ok(Json(response))
}

/// Run one search and attach coverage to each route.
fn run_search(state: &AppState, request: &SearchRequest) -> Result<SearchRoutesResponse, AppError> {
    let planner = Planner::new(state.source.as_ref(), &state.config);
    let outcome = planner.find_all_routes(request)?;

    let coverage = outcome
        .routes
        .iter()
        .map(|route| line_coverage(route, &state.config, request.requirements.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(routes = outcome.routes.len(), "search request served");
    Ok(SearchRoutesResponse::from_outcome(outcome, &coverage))
}

/// Station chain of one trip.
async fn trip_chain(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<TripChain>, AppError> {
    let trip = TripId::new(trip_id);
    let connections = tokio::task::spawn_blocking(move || state.source.load(&ConnectionFilter::all()))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Timetable task failed: {e}"),
        })??;

    build_trip_station_chains(connections.iter())
        .remove(&trip)
        .map(Json)
        .ok_or_else(|| AppError::NotFound {
            message: format!("Trip {trip} not found"),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ConditionError> for AppError {
    fn from(e: ConditionError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<TimetableError> for AppError {
    fn from(e: TimetableError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<CalendarError> for AppError {
    fn from(e: CalendarError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            // dates named in the conditions lie outside the horizon
            SearchError::Calendar(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            SearchError::Timetable(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockTime, Connection, ConnectionId, LineId, StationId};
    use crate::planner::SearchConfig;
    use crate::timetable::InMemoryTimetable;

    fn time(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn conn(id: u64, from: u32, to: u32, dep: &str, arr: &str, order: u32) -> Connection {
        Connection::new(
            ConnectionId(id),
            StationId::new(from),
            StationId::new(to),
            time(dep),
            time(arr),
        )
        .unwrap()
        .with_trip(TripId::new("T1"))
        .with_line(LineId::new("S1"))
        .with_station_order(order)
    }

    fn state() -> AppState {
        let timetable = InMemoryTimetable::new(vec![
            conn(1, 1001, 1002, "08:00", "08:20", 1),
            conn(2, 1002, 1003, "08:22", "08:40", 2),
        ]);
        AppState::new(timetable, SearchConfig::default())
    }

    const SEARCH: &str = r#"{
        "conditions": [
            {"kind": "StartAndEndStations", "start": 1001, "end": 1003},
            {"kind": "StartTimeAndDuration", "start": "08:00", "latest_arrival_in": 60}
        ],
        "requirements": [
            {"line_id": "S1", "time_window": "morning", "weekday_group": "weekdays", "count": 1}
        ]
    }"#;

    #[tokio::test]
    async fn health_check() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn search_finds_route_with_coverage() {
        let Json(response) = search_routes(State(state()), Bytes::from_static(SEARCH.as_bytes()))
            .await
            .unwrap();

        assert_eq!(response.routes.len(), 1);
        let route = &response.routes[0];
        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.line_changes, 0);
        assert_eq!(route.coverage.len(), 1);
        assert_eq!(route.coverage[0].line_id, LineId::new("S1"));
        assert_eq!(response.aborted, None);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let result = search_routes(State(state()), Bytes::from_static(b"{not json")).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn missing_mandatory_condition_is_bad_request() {
        let body = r#"{"conditions": [{"kind": "TraceSearch"}]}"#;
        let result = search_routes(State(state()), Bytes::from_static(body.as_bytes())).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn trip_chain_lookup() {
        let Json(chain) = trip_chain(State(state()), Path("T1".to_string()))
            .await
            .unwrap();
        assert_eq!(chain.len(), 3);

        let missing = trip_chain(State(state()), Path("T9".to_string())).await;
        assert!(matches!(missing, Err(AppError::NotFound { .. })));
    }

    #[test]
    fn error_status_codes() {
        let response = AppError::NotFound {
            message: "gone".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::from(ConditionError::StationCountTooSmall { count: 1 }).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
