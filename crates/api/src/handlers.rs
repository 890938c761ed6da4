// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler parses its request, runs exactly one persistence operation,
//! and shapes the result for the wire. Mutating handlers take an
//! [`Attribution`] and record it in the audit trail.

use relief::{RequestState, RequestTransition, TransitionResult, VolunteerTransition};
use relief_audit::{Actor, AuditEvent, Cause};
use relief_domain::{
    Assignment, CapacityReport, DisasterRequest, NewDisasterRequest, NewVolunteer, RequestStatus,
    Volunteer, VolunteerStatus, evaluate_capacity,
};
use relief_persistence::{OpenRequest, Persistence};
use tracing::info;

use crate::attribution::Attribution;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    ApplyRequest, AssignmentInfo, AuditEventInfo, AuditTimelineResponse, AvailabilityResponse,
    CapacityInfo, CreateRequestRequest, ListOpenRequestsResponse, ListRequestsResponse,
    ListVolunteersResponse, OpenRequestInfo, RegisterVolunteerRequest, RejectRequest,
    RequestDetailResponse, RequestInfo, RequestOperationResponse, SetAvailabilityRequest,
    TransitionResponse, VolunteerAssignmentsResponse, VolunteerInfo,
};

/// Parses an optional status filter.
fn parse_filter<T>(status: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr<Err = relief_domain::DomainError>,
{
    status
        .map(str::parse::<T>)
        .transpose()
        .map_err(translate_domain_error)
}

// ============================================================================
// Volunteers
// ============================================================================

/// Registers a volunteer or volunteer group.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The registration request
///
/// # Errors
///
/// Returns `InvalidInput` for a malformed field or status, and `Conflict`
/// if the phone is already registered.
pub fn register_volunteer(
    persistence: &mut Persistence,
    request: RegisterVolunteerRequest,
) -> Result<VolunteerInfo, ApiError> {
    let status: VolunteerStatus =
        parse_filter::<VolunteerStatus>(request.status.as_deref())?.unwrap_or_default();
    let new_volunteer: NewVolunteer = NewVolunteer {
        status,
        ..NewVolunteer::new(request.name, request.phone, request.member_count)
    };

    let volunteer: Volunteer = persistence
        .register_volunteer(new_volunteer)
        .map_err(translate_persistence_error)?;

    Ok(VolunteerInfo::from(&volunteer))
}

/// Retrieves a volunteer.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the volunteer does not exist.
pub fn get_volunteer(
    persistence: &mut Persistence,
    volunteer_id: i64,
) -> Result<VolunteerInfo, ApiError> {
    let volunteer: Volunteer = persistence
        .get_volunteer(volunteer_id)
        .map_err(translate_persistence_error)?;
    Ok(VolunteerInfo::from(&volunteer))
}

/// Lists volunteers, optionally filtered by status.
///
/// # Errors
///
/// Returns `InvalidInput` if the status filter is not a volunteer status.
pub fn list_volunteers(
    persistence: &mut Persistence,
    status: Option<&str>,
) -> Result<ListVolunteersResponse, ApiError> {
    let filter: Option<VolunteerStatus> = parse_filter(status)?;
    let volunteers: Vec<Volunteer> = persistence
        .list_volunteers(filter)
        .map_err(translate_persistence_error)?;

    Ok(ListVolunteersResponse {
        volunteers: volunteers.iter().map(VolunteerInfo::from).collect(),
    })
}

/// Lists a volunteer's assignment history.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the volunteer does not exist.
pub fn list_volunteer_assignments(
    persistence: &mut Persistence,
    volunteer_id: i64,
) -> Result<VolunteerAssignmentsResponse, ApiError> {
    let assignments: Vec<Assignment> = persistence
        .list_volunteer_assignments(volunteer_id)
        .map_err(translate_persistence_error)?;

    Ok(VolunteerAssignmentsResponse {
        volunteer_id,
        assignments: assignments.iter().map(AssignmentInfo::from).collect(),
    })
}

/// Switches a volunteer between `off` and `available`.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown status or bad attribution,
/// `ResourceNotFound` if the volunteer does not exist, and `InvalidState`
/// if the volunteer is committed or the target is not `off`/`available`.
pub fn set_availability(
    persistence: &mut Persistence,
    volunteer_id: i64,
    request: &SetAvailabilityRequest,
    attribution: Attribution,
) -> Result<AvailabilityResponse, ApiError> {
    let (actor, cause): (Actor, Cause) = attribution.into_audit()?;
    let status: VolunteerStatus = request
        .status
        .parse::<VolunteerStatus>()
        .map_err(translate_domain_error)?;

    let result: VolunteerTransition = persistence
        .set_availability(volunteer_id, status, actor, cause)
        .map_err(translate_persistence_error)?;

    Ok(AvailabilityResponse::from_transition(&result))
}

// ============================================================================
// Requests
// ============================================================================

/// Creates a disaster request.
///
/// # Errors
///
/// Returns `InvalidInput` if a field is malformed.
pub fn create_request(
    persistence: &mut Persistence,
    request: CreateRequestRequest,
) -> Result<RequestInfo, ApiError> {
    let new_request: NewDisasterRequest = NewDisasterRequest {
        location: request.location,
        description: request.description,
        contact_name: request.contact_name,
        contact_phone: request.contact_phone,
        required_volunteers: request.required_volunteers,
    };

    let stored: DisasterRequest = persistence
        .create_request(new_request)
        .map_err(translate_persistence_error)?;

    Ok(RequestInfo::from(&stored))
}

/// Retrieves a request with its assignments and capacity.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the request does not exist.
pub fn get_request(
    persistence: &mut Persistence,
    request_id: i64,
) -> Result<RequestDetailResponse, ApiError> {
    let state: RequestState = persistence
        .get_request_with_assignments(request_id)
        .map_err(translate_persistence_error)?;
    let capacity: CapacityReport = evaluate_capacity(&state.request, &state.assignments);

    Ok(RequestDetailResponse {
        request: RequestInfo::from(&state.request),
        capacity: CapacityInfo::from(&capacity),
        assignments: state.assignments.iter().map(AssignmentInfo::from).collect(),
    })
}

/// Lists requests, optionally filtered by status.
///
/// # Errors
///
/// Returns `InvalidInput` if the status filter is not a request status.
pub fn list_requests(
    persistence: &mut Persistence,
    status: Option<&str>,
) -> Result<ListRequestsResponse, ApiError> {
    let filter: Option<RequestStatus> = parse_filter(status)?;
    let requests: Vec<DisasterRequest> = persistence
        .list_requests(filter)
        .map_err(translate_persistence_error)?;

    Ok(ListRequestsResponse {
        requests: requests.iter().map(RequestInfo::from).collect(),
    })
}

/// Lists requests that still accept applicants.
///
/// # Errors
///
/// Returns `Internal` if the store cannot be read.
pub fn list_open_requests(
    persistence: &mut Persistence,
) -> Result<ListOpenRequestsResponse, ApiError> {
    let open: Vec<OpenRequest> = persistence
        .list_open_requests()
        .map_err(translate_persistence_error)?;

    Ok(ListOpenRequestsResponse {
        requests: open.iter().map(OpenRequestInfo::from).collect(),
    })
}

/// Withdraws a request that has no active assignments.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the request does not exist, and `Conflict`
/// if it is closed or still has active assignments.
pub fn withdraw_request(
    persistence: &mut Persistence,
    request_id: i64,
    attribution: Attribution,
) -> Result<RequestOperationResponse, ApiError> {
    let (actor, cause): (Actor, Cause) = attribution.into_audit()?;
    let result: RequestTransition = persistence
        .withdraw_request(request_id, actor, cause)
        .map_err(translate_persistence_error)?;

    info!(request_id, "Request withdrawn via API");
    Ok(RequestOperationResponse::from_transition(
        &result,
        format!("Request {request_id} withdrawn"),
    ))
}

/// Re-runs the closure rule for a request.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the request does not exist.
pub fn reevaluate_request(
    persistence: &mut Persistence,
    request_id: i64,
    attribution: Attribution,
) -> Result<RequestOperationResponse, ApiError> {
    let (actor, cause): (Actor, Cause) = attribution.into_audit()?;
    let result: RequestTransition = persistence
        .reevaluate_request(request_id, actor, cause)
        .map_err(translate_persistence_error)?;

    let message: String = format!("Request {request_id} is {}", result.request.status);
    Ok(RequestOperationResponse::from_transition(&result, message))
}

// ============================================================================
// Assignments
// ============================================================================

/// Applies a volunteer to a request.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing volunteer or request, and
/// `Conflict` if the volunteer is off or committed, or the request is
/// closed or full.
pub fn apply_assignment(
    persistence: &mut Persistence,
    request: ApplyRequest,
    attribution: Attribution,
) -> Result<TransitionResponse, ApiError> {
    let (actor, cause): (Actor, Cause) = attribution.into_audit()?;
    let result: TransitionResult = persistence
        .apply_assignment(request.volunteer_id, request.request_id, actor, cause)
        .map_err(translate_persistence_error)?;

    Ok(TransitionResponse::from_transition(&result))
}

/// Retrieves an assignment.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the assignment does not exist.
pub fn get_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
) -> Result<AssignmentInfo, ApiError> {
    let assignment: Assignment = persistence
        .get_assignment(assignment_id)
        .map_err(translate_persistence_error)?;
    Ok(AssignmentInfo::from(&assignment))
}

/// Confirms a pending assignment.
///
/// # Errors
///
/// Returns `InvalidState` if the assignment is not pending, and `Conflict`
/// if its request has filled or closed since the application.
pub fn confirm_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
    attribution: Attribution,
) -> Result<TransitionResponse, ApiError> {
    let (actor, cause): (Actor, Cause) = attribution.into_audit()?;
    let result: TransitionResult = persistence
        .confirm_assignment(assignment_id, actor, cause)
        .map_err(translate_persistence_error)?;

    Ok(TransitionResponse::from_transition(&result))
}

/// Rejects a pending assignment.
///
/// # Errors
///
/// Returns `InvalidState` if the assignment is not pending.
pub fn reject_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
    request: RejectRequest,
    attribution: Attribution,
) -> Result<TransitionResponse, ApiError> {
    let (actor, cause): (Actor, Cause) = attribution.into_audit()?;
    let result: TransitionResult = persistence
        .reject_assignment(assignment_id, request.reason, actor, cause)
        .map_err(translate_persistence_error)?;

    Ok(TransitionResponse::from_transition(&result))
}

/// Completes a confirmed assignment.
///
/// # Errors
///
/// Returns `InvalidState` if the assignment is not confirmed.
pub fn complete_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
    attribution: Attribution,
) -> Result<TransitionResponse, ApiError> {
    let (actor, cause): (Actor, Cause) = attribution.into_audit()?;
    let result: TransitionResult = persistence
        .complete_assignment(assignment_id, actor, cause)
        .map_err(translate_persistence_error)?;

    if result.closure.closed() {
        info!(
            request_id = result.request.request_id,
            "Request closed via API"
        );
    }
    Ok(TransitionResponse::from_transition(&result))
}

/// Cancels a pending or confirmed assignment.
///
/// # Errors
///
/// Returns `InvalidState` if the assignment is already terminal.
pub fn cancel_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
    attribution: Attribution,
) -> Result<TransitionResponse, ApiError> {
    let (actor, cause): (Actor, Cause) = attribution.into_audit()?;
    let result: TransitionResult = persistence
        .cancel_assignment(assignment_id, actor, cause)
        .map_err(translate_persistence_error)?;

    Ok(TransitionResponse::from_transition(&result))
}

// ============================================================================
// Audit
// ============================================================================

/// Retrieves the audit timeline of a request.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the request does not exist.
pub fn get_audit_timeline(
    persistence: &mut Persistence,
    request_id: i64,
) -> Result<AuditTimelineResponse, ApiError> {
    let events: Vec<AuditEvent> = persistence
        .get_audit_timeline(request_id)
        .map_err(translate_persistence_error)?;
    Ok(AuditTimelineResponse {
        events: events.iter().map(AuditEventInfo::from).collect(),
    })
}

/// Retrieves every audit event touching a volunteer.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the volunteer does not exist.
pub fn get_volunteer_timeline(
    persistence: &mut Persistence,
    volunteer_id: i64,
) -> Result<AuditTimelineResponse, ApiError> {
    let events: Vec<AuditEvent> = persistence
        .get_volunteer_timeline(volunteer_id)
        .map_err(translate_persistence_error)?;
    Ok(AuditTimelineResponse {
        events: events.iter().map(AuditEventInfo::from).collect(),
    })
}

/// Retrieves a single audit event.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the event does not exist.
pub fn get_audit_event(
    persistence: &mut Persistence,
    event_id: i64,
) -> Result<AuditEventInfo, ApiError> {
    let event: AuditEvent = persistence
        .get_audit_event(event_id)
        .map_err(translate_persistence_error)?;
    Ok(AuditEventInfo::from(&event))
}
