// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use relief::ApplyPolicy;
use relief_api::{
    ApiError, ApplyRequest, AssignmentInfo, Attribution, AuditEventInfo, AuditTimelineResponse,
    AvailabilityResponse, CreateRequestRequest, ListOpenRequestsResponse, ListRequestsResponse,
    ListVolunteersResponse, RegisterVolunteerRequest, RejectRequest, RequestDetailResponse,
    RequestInfo, RequestOperationResponse, SetAvailabilityRequest, TransitionResponse,
    VolunteerAssignmentsResponse, VolunteerInfo,
};
use relief_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Relief Server - HTTP server for the relief assignment coordinator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "RELIEF_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "RELIEF_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, env = "RELIEF_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// How applications enter the lifecycle: `dispatched` or `self-service`
    #[arg(long, env = "RELIEF_APPLY_POLICY", default_value_t = ApplyPolicy::Dispatched)]
    apply_policy: ApplyPolicy,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex. Every operation holds the
/// lock for exactly one store transaction.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
}

/// A request body carrying attribution alongside its payload.
#[derive(Debug, Deserialize)]
struct Attributed<T> {
    /// Who is acting and why.
    #[serde(flatten)]
    attribution: Attribution,
    /// The operation payload.
    #[serde(flatten)]
    body: T,
}

/// Optional status filter for list endpoints.
#[derive(Debug, Deserialize)]
struct StatusFilter {
    /// The status to filter by.
    status: Option<String>,
}

/// Query parameters for the request audit timeline.
#[derive(Debug, Deserialize)]
struct TimelineQuery {
    /// The request whose events are listed.
    request_id: i64,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error kind: `not_found`, `invalid_state`, `conflict`, `invalid_input`, or `internal`.
    kind: String,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error kind.
    kind: &'static str,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidState { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %err, "Request failed");
        } else {
            warn!(kind = err.kind(), error = %err, "Request rejected");
        }

        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Volunteers
// ============================================================================

/// Handler for POST `/volunteers` endpoint.
async fn handle_register_volunteer(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterVolunteerRequest>,
) -> Result<Json<VolunteerInfo>, HttpError> {
    info!(member_count = ?req.member_count, "Handling register_volunteer request");

    let mut persistence = app_state.persistence.lock().await;
    let volunteer: VolunteerInfo = relief_api::register_volunteer(&mut persistence, req)?;
    drop(persistence);

    Ok(Json(volunteer))
}

/// Handler for GET `/volunteers` endpoint.
async fn handle_list_volunteers(
    AxumState(app_state): AxumState<AppState>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<ListVolunteersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListVolunteersResponse =
        relief_api::list_volunteers(&mut persistence, filter.status.as_deref())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/volunteers/{volunteer_id}` endpoint.
async fn handle_get_volunteer(
    AxumState(app_state): AxumState<AppState>,
    Path(volunteer_id): Path<i64>,
) -> Result<Json<VolunteerInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let volunteer: VolunteerInfo = relief_api::get_volunteer(&mut persistence, volunteer_id)?;
    drop(persistence);

    Ok(Json(volunteer))
}

/// Handler for GET `/volunteers/{volunteer_id}/assignments` endpoint.
async fn handle_list_volunteer_assignments(
    AxumState(app_state): AxumState<AppState>,
    Path(volunteer_id): Path<i64>,
) -> Result<Json<VolunteerAssignmentsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: VolunteerAssignmentsResponse =
        relief_api::list_volunteer_assignments(&mut persistence, volunteer_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/volunteers/{volunteer_id}/timeline` endpoint.
async fn handle_get_volunteer_timeline(
    AxumState(app_state): AxumState<AppState>,
    Path(volunteer_id): Path<i64>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AuditTimelineResponse =
        relief_api::get_volunteer_timeline(&mut persistence, volunteer_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/volunteers/{volunteer_id}/availability` endpoint.
async fn handle_set_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(volunteer_id): Path<i64>,
    Json(req): Json<Attributed<SetAvailabilityRequest>>,
) -> Result<Json<AvailabilityResponse>, HttpError> {
    info!(
        actor_id = %req.attribution.actor_id,
        volunteer_id,
        status = %req.body.status,
        "Handling set_availability request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AvailabilityResponse = relief_api::set_availability(
        &mut persistence,
        volunteer_id,
        &req.body,
        req.attribution,
    )?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Requests
// ============================================================================

/// Handler for POST `/requests` endpoint.
async fn handle_create_request(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateRequestRequest>,
) -> Result<Json<RequestInfo>, HttpError> {
    info!(
        required_volunteers = req.required_volunteers,
        "Handling create_request request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let request: RequestInfo = relief_api::create_request(&mut persistence, req)?;
    drop(persistence);

    Ok(Json(request))
}

/// Handler for GET `/requests` endpoint.
async fn handle_list_requests(
    AxumState(app_state): AxumState<AppState>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<ListRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListRequestsResponse =
        relief_api::list_requests(&mut persistence, filter.status.as_deref())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/requests/open` endpoint.
///
/// Lists requests that still accept applicants.
async fn handle_list_open_requests(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListOpenRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListOpenRequestsResponse = relief_api::list_open_requests(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/requests/{request_id}` endpoint.
async fn handle_get_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
) -> Result<Json<RequestDetailResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RequestDetailResponse = relief_api::get_request(&mut persistence, request_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/requests/{request_id}/withdraw` endpoint.
async fn handle_withdraw_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
    Json(attribution): Json<Attribution>,
) -> Result<Json<RequestOperationResponse>, HttpError> {
    info!(
        actor_id = %attribution.actor_id,
        request_id,
        "Handling withdraw_request request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: RequestOperationResponse =
        relief_api::withdraw_request(&mut persistence, request_id, attribution)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/requests/{request_id}/reevaluate` endpoint.
///
/// Re-runs the closure rule. Safe to call repeatedly.
async fn handle_reevaluate_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
    Json(attribution): Json<Attribution>,
) -> Result<Json<RequestOperationResponse>, HttpError> {
    info!(
        actor_id = %attribution.actor_id,
        request_id,
        "Handling reevaluate_request request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: RequestOperationResponse =
        relief_api::reevaluate_request(&mut persistence, request_id, attribution)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Assignments
// ============================================================================

/// Handler for POST `/assignments` endpoint.
///
/// Applies a volunteer to a request.
async fn handle_apply(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<Attributed<ApplyRequest>>,
) -> Result<Json<TransitionResponse>, HttpError> {
    info!(
        actor_id = %req.attribution.actor_id,
        volunteer_id = req.body.volunteer_id,
        request_id = req.body.request_id,
        "Handling apply request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: TransitionResponse =
        relief_api::apply_assignment(&mut persistence, req.body, req.attribution)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/assignments/{assignment_id}` endpoint.
async fn handle_get_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<AssignmentInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let assignment: AssignmentInfo = relief_api::get_assignment(&mut persistence, assignment_id)?;
    drop(persistence);

    Ok(Json(assignment))
}

/// Handler for POST `/assignments/{assignment_id}/confirm` endpoint.
async fn handle_confirm(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(attribution): Json<Attribution>,
) -> Result<Json<TransitionResponse>, HttpError> {
    info!(
        actor_id = %attribution.actor_id,
        assignment_id,
        "Handling confirm request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: TransitionResponse =
        relief_api::confirm_assignment(&mut persistence, assignment_id, attribution)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/assignments/{assignment_id}/reject` endpoint.
async fn handle_reject(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<Attributed<RejectRequest>>,
) -> Result<Json<TransitionResponse>, HttpError> {
    info!(
        actor_id = %req.attribution.actor_id,
        assignment_id,
        "Handling reject request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: TransitionResponse = relief_api::reject_assignment(
        &mut persistence,
        assignment_id,
        req.body,
        req.attribution,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/assignments/{assignment_id}/complete` endpoint.
async fn handle_complete(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(attribution): Json<Attribution>,
) -> Result<Json<TransitionResponse>, HttpError> {
    info!(
        actor_id = %attribution.actor_id,
        assignment_id,
        "Handling complete request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: TransitionResponse =
        relief_api::complete_assignment(&mut persistence, assignment_id, attribution)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/assignments/{assignment_id}/cancel` endpoint.
async fn handle_cancel(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(attribution): Json<Attribution>,
) -> Result<Json<TransitionResponse>, HttpError> {
    info!(
        actor_id = %attribution.actor_id,
        assignment_id,
        "Handling cancel request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: TransitionResponse =
        relief_api::cancel_assignment(&mut persistence, assignment_id, attribution)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Audit
// ============================================================================

/// Handler for GET `/audit/timeline` endpoint.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AuditTimelineResponse =
        relief_api::get_audit_timeline(&mut persistence, query.request_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/audit/event/{event_id}` endpoint.
async fn handle_get_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<AuditEventInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let event: AuditEventInfo = relief_api::get_audit_event(&mut persistence, event_id)?;
    drop(persistence);

    Ok(Json(event))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/volunteers",
            post(handle_register_volunteer).get(handle_list_volunteers),
        )
        .route("/volunteers/{volunteer_id}", get(handle_get_volunteer))
        .route(
            "/volunteers/{volunteer_id}/assignments",
            get(handle_list_volunteer_assignments),
        )
        .route(
            "/volunteers/{volunteer_id}/timeline",
            get(handle_get_volunteer_timeline),
        )
        .route(
            "/volunteers/{volunteer_id}/availability",
            post(handle_set_availability),
        )
        .route(
            "/requests",
            post(handle_create_request).get(handle_list_requests),
        )
        .route("/requests/open", get(handle_list_open_requests))
        .route("/requests/{request_id}", get(handle_get_request))
        .route(
            "/requests/{request_id}/withdraw",
            post(handle_withdraw_request),
        )
        .route(
            "/requests/{request_id}/reevaluate",
            post(handle_reevaluate_request),
        )
        .route("/assignments", post(handle_apply))
        .route("/assignments/{assignment_id}", get(handle_get_assignment))
        .route("/assignments/{assignment_id}/confirm", post(handle_confirm))
        .route("/assignments/{assignment_id}/reject", post(handle_reject))
        .route(
            "/assignments/{assignment_id}/complete",
            post(handle_complete),
        )
        .route("/assignments/{assignment_id}/cancel", post(handle_cancel))
        .route("/audit/timeline", get(handle_get_audit_timeline))
        .route("/audit/event/{event_id}", get(handle_get_audit_event))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(apply_policy = %args.apply_policy, "Initializing Relief Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    persistence.set_apply_policy(args.apply_policy);

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
