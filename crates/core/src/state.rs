// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use relief_audit::{AuditEvent, StateSnapshot};
use relief_domain::{
    Assignment, AssignmentStatus, DisasterRequest, RequestStatus, Volunteer, VolunteerStatus,
    committed_headcount,
};
use serde::Serialize;

use crate::closure::ClosureOutcome;
use crate::error::CoreError;

/// The slice of the store an assignment transition reads.
///
/// State is scoped to one volunteer and one request: the request with
/// every assignment it has ever had, and the volunteer with every
/// active assignment it holds anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// The volunteer involved.
    pub volunteer: Volunteer,
    /// The request involved.
    pub request: DisasterRequest,
    /// All assignments on the request, in any status.
    pub request_assignments: Vec<Assignment>,
    /// The volunteer's active assignments across all requests.
    pub volunteer_assignments: Vec<Assignment>,
}

impl State {
    /// Creates a new state.
    ///
    /// # Arguments
    ///
    /// * `volunteer` - The volunteer involved
    /// * `request` - The request involved
    /// * `request_assignments` - All assignments on the request
    /// * `volunteer_assignments` - The volunteer's active assignments
    #[must_use]
    pub const fn new(
        volunteer: Volunteer,
        request: DisasterRequest,
        request_assignments: Vec<Assignment>,
        volunteer_assignments: Vec<Assignment>,
    ) -> Self {
        Self {
            volunteer,
            request,
            request_assignments,
            volunteer_assignments,
        }
    }

    /// Looks up an assignment on the request by id.
    #[must_use]
    pub fn find_assignment(&self, assignment_id: i64) -> Option<&Assignment> {
        self.request_assignments
            .iter()
            .find(|a| a.assignment_id == Some(assignment_id))
    }

    /// Converts the state to a snapshot for audit purposes.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Internal` if the snapshot cannot be serialized.
    pub fn to_snapshot(&self, assignment: Option<&Assignment>) -> Result<StateSnapshot, CoreError> {
        let view: SnapshotView = SnapshotView {
            volunteer_id: Some(self.volunteer.volunteer_id),
            volunteer_status: Some(self.volunteer.status),
            request_id: self.request.request_id,
            request_status: self.request.status,
            committed: committed_headcount(&self.request, &self.request_assignments),
            required: self.request.required_volunteers,
            assignment_id: assignment.and_then(|a| a.assignment_id),
            assignment_status: assignment.map(|a| a.status),
        };
        view.to_snapshot()
    }
}

/// The slice of the store a request-level operation reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestState {
    /// The request.
    pub request: DisasterRequest,
    /// All assignments on the request, in any status.
    pub assignments: Vec<Assignment>,
}

impl RequestState {
    /// Creates a new request state.
    #[must_use]
    pub const fn new(request: DisasterRequest, assignments: Vec<Assignment>) -> Self {
        Self {
            request,
            assignments,
        }
    }

    /// Converts the state to a snapshot for audit purposes.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Internal` if the snapshot cannot be serialized.
    pub fn to_snapshot(&self) -> Result<StateSnapshot, CoreError> {
        SnapshotView {
            volunteer_id: None,
            volunteer_status: None,
            request_id: self.request.request_id,
            request_status: self.request.status,
            committed: committed_headcount(&self.request, &self.assignments),
            required: self.request.required_volunteers,
            assignment_id: None,
            assignment_status: None,
        }
        .to_snapshot()
    }
}

/// The fields recorded in an audit snapshot.
#[derive(Serialize)]
struct SnapshotView {
    volunteer_id: Option<i64>,
    volunteer_status: Option<VolunteerStatus>,
    request_id: i64,
    request_status: RequestStatus,
    committed: u32,
    required: u32,
    assignment_id: Option<i64>,
    assignment_status: Option<AssignmentStatus>,
}

impl SnapshotView {
    fn to_snapshot(&self) -> Result<StateSnapshot, CoreError> {
        serde_json::to_string(self)
            .map(StateSnapshot::new)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize snapshot: {e}")))
    }
}

/// The result of a successful assignment transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The assignment after the transition. Its id is `None` for a fresh `Apply`.
    pub assignment: Assignment,
    /// The volunteer after the transition.
    pub volunteer: Volunteer,
    /// The request after the transition, with its status re-derived.
    pub request: DisasterRequest,
    /// How the request status moved.
    pub closure: ClosureOutcome,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The result of a request-level operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTransition {
    /// The request after the operation.
    pub request: DisasterRequest,
    /// How the request status moved.
    pub closure: ClosureOutcome,
    /// The audit event recording this operation.
    pub audit_event: AuditEvent,
}

/// The result of a volunteer availability change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerTransition {
    /// The volunteer after the change.
    pub volunteer: Volunteer,
    /// The audit event recording this change.
    pub audit_event: AuditEvent,
}
