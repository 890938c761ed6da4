// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Statuses travel as their lowercase wire strings. Timestamps are RFC 3339
//! strings exactly as stored.

use relief::{ClosureOutcome, RequestTransition, TransitionResult, VolunteerTransition};
use relief_audit::AuditEvent;
use relief_domain::{Assignment, CapacityReport, DisasterRequest, Volunteer};
use relief_persistence::OpenRequest;

// ============================================================================
// Volunteers
// ============================================================================

/// API request to register a volunteer or volunteer group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct RegisterVolunteerRequest {
    /// Display name.
    pub name: String,
    /// Contact phone, normalized before storage.
    pub phone: String,
    /// Group size. Absent means an individual.
    #[serde(default)]
    pub member_count: Option<u32>,
    /// Initial status, `available` or `off`. Defaults to `available`.
    #[serde(default)]
    pub status: Option<String>,
}

/// API request to switch a volunteer between `off` and `available`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SetAvailabilityRequest {
    /// The target status.
    pub status: String,
}

/// A volunteer as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VolunteerInfo {
    /// The volunteer's id.
    pub volunteer_id: i64,
    /// Display name.
    pub name: String,
    /// Normalized phone.
    pub phone: String,
    /// Group size, if registered as a group.
    pub member_count: Option<u32>,
    /// The headcount a new assignment would snapshot.
    pub headcount: u32,
    /// Current status.
    pub status: String,
}

impl From<&Volunteer> for VolunteerInfo {
    fn from(volunteer: &Volunteer) -> Self {
        Self {
            volunteer_id: volunteer.volunteer_id,
            name: volunteer.name.clone(),
            phone: volunteer.phone.clone(),
            member_count: volunteer.member_count,
            headcount: volunteer.headcount(),
            status: volunteer.status.to_string(),
        }
    }
}

/// API response listing volunteers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListVolunteersResponse {
    /// The volunteers, ordered by id.
    pub volunteers: Vec<VolunteerInfo>,
}

/// API response for an availability change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AvailabilityResponse {
    /// The volunteer after the change.
    pub volunteer: VolunteerInfo,
    /// The audit event recording the change.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

impl AvailabilityResponse {
    pub(crate) fn from_transition(result: &VolunteerTransition) -> Self {
        Self {
            volunteer: VolunteerInfo::from(&result.volunteer),
            event_id: result.audit_event.event_id.unwrap_or_default(),
            message: format!(
                "Volunteer {} is now {}",
                result.volunteer.volunteer_id, result.volunteer.status
            ),
        }
    }
}

/// API response listing a volunteer's assignment history.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VolunteerAssignmentsResponse {
    /// The volunteer.
    pub volunteer_id: i64,
    /// Every assignment the volunteer has held, oldest first.
    pub assignments: Vec<AssignmentInfo>,
}

// ============================================================================
// Requests
// ============================================================================

/// API request to create a disaster request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CreateRequestRequest {
    /// Where help is needed.
    pub location: String,
    /// Free-text description of the work.
    #[serde(default)]
    pub description: Option<String>,
    /// Person to contact on site.
    pub contact_name: String,
    /// Phone of the on-site contact.
    pub contact_phone: String,
    /// Headcount needed.
    pub required_volunteers: u32,
}

/// A disaster request as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestInfo {
    /// The request's id.
    pub request_id: i64,
    /// Where help is needed.
    pub location: String,
    /// Free-text description of the work.
    pub description: Option<String>,
    /// Person to contact on site.
    pub contact_name: String,
    /// Phone of the on-site contact.
    pub contact_phone: String,
    /// Headcount needed.
    pub required_volunteers: u32,
    /// Current status.
    pub status: String,
    /// When the request was created.
    pub created_at: String,
}

impl From<&DisasterRequest> for RequestInfo {
    fn from(request: &DisasterRequest) -> Self {
        Self {
            request_id: request.request_id,
            location: request.location.clone(),
            description: request.description.clone(),
            contact_name: request.contact_name.clone(),
            contact_phone: request.contact_phone.clone(),
            required_volunteers: request.required_volunteers,
            status: request.status.to_string(),
            created_at: request.created_at.clone(),
        }
    }
}

/// Headcount figures for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CapacityInfo {
    /// Headcount needed.
    pub required: u32,
    /// Headcount held by confirmed and completed assignments.
    pub committed: u32,
    /// Headcount held by completed assignments.
    pub completed: u32,
    /// Headcount still needed, never negative.
    pub remaining: u32,
    /// Whether committed headcount meets the target.
    pub is_full: bool,
    /// Pending and confirmed assignment count.
    pub active_assignments: usize,
}

impl From<&CapacityReport> for CapacityInfo {
    fn from(report: &CapacityReport) -> Self {
        Self {
            required: report.required,
            committed: report.committed,
            completed: report.completed,
            remaining: report.remaining,
            is_full: report.is_full,
            active_assignments: report.active_assignments,
        }
    }
}

/// API response for a single request with its assignments.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestDetailResponse {
    /// The request.
    pub request: RequestInfo,
    /// Current headcount figures.
    pub capacity: CapacityInfo,
    /// Every assignment on the request, oldest first.
    pub assignments: Vec<AssignmentInfo>,
}

/// API response listing requests.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListRequestsResponse {
    /// The requests, ordered by id.
    pub requests: Vec<RequestInfo>,
}

/// An open request with its remaining capacity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OpenRequestInfo {
    /// The request.
    pub request: RequestInfo,
    /// Current headcount figures.
    pub capacity: CapacityInfo,
}

impl From<&OpenRequest> for OpenRequestInfo {
    fn from(open: &OpenRequest) -> Self {
        Self {
            request: RequestInfo::from(&open.request),
            capacity: CapacityInfo::from(&open.capacity),
        }
    }
}

/// API response listing requests that still accept applicants.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListOpenRequestsResponse {
    /// Open, not-full requests, ordered by id.
    pub requests: Vec<OpenRequestInfo>,
}

/// API response for a request-level operation (withdraw or reevaluate).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestOperationResponse {
    /// The request after the operation.
    pub request: RequestInfo,
    /// Status before the operation.
    pub previous_status: String,
    /// Whether the status moved.
    pub status_changed: bool,
    /// The audit event recording the operation.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

impl RequestOperationResponse {
    pub(crate) fn from_transition(result: &RequestTransition, message: String) -> Self {
        Self {
            request: RequestInfo::from(&result.request),
            previous_status: result.closure.previous.to_string(),
            status_changed: result.closure.changed(),
            event_id: result.audit_event.event_id.unwrap_or_default(),
            message,
        }
    }
}

// ============================================================================
// Assignments
// ============================================================================

/// API request for a volunteer to apply to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct ApplyRequest {
    /// The applying volunteer.
    pub volunteer_id: i64,
    /// The request applied to.
    pub request_id: i64,
}

/// API request to reject a pending assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize)]
pub struct RejectRequest {
    /// Why the assignment was rejected.
    #[serde(default)]
    pub reason: Option<String>,
}

/// An assignment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignmentInfo {
    /// The assignment's id.
    pub assignment_id: i64,
    /// The assigned volunteer.
    pub volunteer_id: i64,
    /// The request worked.
    pub request_id: i64,
    /// Headcount snapshotted at apply time.
    pub headcount: u32,
    /// Current status.
    pub status: String,
    /// When the volunteer applied.
    pub assigned_at: String,
    /// When the assignment was confirmed.
    pub confirmed_at: Option<String>,
    /// When the work was completed.
    pub completed_at: Option<String>,
    /// When the assignment was rejected or cancelled.
    pub cancelled_at: Option<String>,
    /// Reason given on rejection.
    pub rejection_reason: Option<String>,
}

impl From<&Assignment> for AssignmentInfo {
    fn from(assignment: &Assignment) -> Self {
        Self {
            assignment_id: assignment.id_or_default(),
            volunteer_id: assignment.volunteer_id,
            request_id: assignment.request_id,
            headcount: assignment.headcount,
            status: assignment.status.to_string(),
            assigned_at: assignment.assigned_at.clone(),
            confirmed_at: assignment.confirmed_at.clone(),
            completed_at: assignment.completed_at.clone(),
            cancelled_at: assignment.cancelled_at.clone(),
            rejection_reason: assignment.rejection_reason.clone(),
        }
    }
}

/// API response for an assignment transition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionResponse {
    /// The assignment after the transition.
    pub assignment: AssignmentInfo,
    /// The volunteer's status after the transition.
    pub volunteer_status: String,
    /// The request's status after the transition.
    pub request_status: String,
    /// Whether this transition closed the request.
    pub request_completed: bool,
    /// The audit event recording the transition.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

impl TransitionResponse {
    pub(crate) fn from_transition(result: &TransitionResult) -> Self {
        let closure: &ClosureOutcome = &result.closure;
        Self {
            assignment: AssignmentInfo::from(&result.assignment),
            volunteer_status: result.volunteer.status.to_string(),
            request_status: result.request.status.to_string(),
            request_completed: closure.closed(),
            event_id: result.audit_event.event_id.unwrap_or_default(),
            message: format!(
                "Assignment {} is now {}",
                result.assignment.id_or_default(),
                result.assignment.status
            ),
        }
    }
}

// ============================================================================
// Audit
// ============================================================================

/// An audit event as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventInfo {
    /// The event's id.
    pub event_id: i64,
    /// Who performed the action.
    pub actor_id: String,
    /// The actor's type.
    pub actor_type: String,
    /// What triggered the action.
    pub cause_id: String,
    /// Description of the trigger.
    pub cause_description: String,
    /// The action name.
    pub action: String,
    /// Optional action details.
    pub details: Option<String>,
    /// Serialized state before the transition.
    pub before_snapshot: String,
    /// Serialized state after the transition.
    pub after_snapshot: String,
    /// The request touched, if any.
    pub request_id: Option<i64>,
    /// The volunteer touched, if any.
    pub volunteer_id: Option<i64>,
    /// The assignment touched, if any.
    pub assignment_id: Option<i64>,
    /// When the transition happened.
    pub recorded_at: String,
}

impl From<&AuditEvent> for AuditEventInfo {
    fn from(event: &AuditEvent) -> Self {
        Self {
            event_id: event.event_id.unwrap_or_default(),
            actor_id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
            cause_id: event.cause.id.clone(),
            cause_description: event.cause.description.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            before_snapshot: event.before.data.clone(),
            after_snapshot: event.after.data.clone(),
            request_id: event.scope.request_id,
            volunteer_id: event.scope.volunteer_id,
            assignment_id: event.scope.assignment_id,
            recorded_at: event.recorded_at.clone(),
        }
    }
}

/// API response for an audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditTimelineResponse {
    /// Events oldest first.
    pub events: Vec<AuditEventInfo>,
}
