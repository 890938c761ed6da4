// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writing transition results.
//!
//! Each function here writes every row a transition changed plus its
//! audit event. They must run inside the caller's transaction; a failure
//! part way through leaves the rollback to the caller.

use diesel::SqliteConnection;
use relief::{RequestTransition, TransitionResult, VolunteerTransition};

use crate::error::PersistenceError;
use crate::mutations::assignments::{insert_assignment, update_assignment};
use crate::mutations::audit::persist_audit_event;
use crate::mutations::entities::{update_request_status, update_volunteer_status};

/// Persists an assignment transition.
///
/// A fresh assignment (no id yet) is inserted and its id copied into the
/// returned assignment and the audit scope.
///
/// # Returns
///
/// The transition with the assignment id and audit event id filled in.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: TransitionResult,
) -> Result<TransitionResult, PersistenceError> {
    let mut result: TransitionResult = result;

    match result.assignment.assignment_id {
        Some(assignment_id) => update_assignment(conn, assignment_id, &result.assignment)?,
        None => {
            let assignment_id: i64 = insert_assignment(conn, &result.assignment)?;
            result.assignment.assignment_id = Some(assignment_id);
            result.audit_event = result.audit_event.with_assignment_id(assignment_id);
        }
    }

    update_volunteer_status(conn, result.volunteer.volunteer_id, result.volunteer.status)?;

    if result.closure.changed() {
        update_request_status(conn, result.request.request_id, result.request.status)?;
    }

    let event_id: i64 = persist_audit_event(conn, &result.audit_event)?;
    result.audit_event.event_id = Some(event_id);

    Ok(result)
}

/// Persists a request-level operation (reevaluation or withdrawal).
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn persist_request_transition(
    conn: &mut SqliteConnection,
    result: RequestTransition,
) -> Result<RequestTransition, PersistenceError> {
    let mut result: RequestTransition = result;

    if result.closure.changed() {
        update_request_status(conn, result.request.request_id, result.request.status)?;
    }

    let event_id: i64 = persist_audit_event(conn, &result.audit_event)?;
    result.audit_event.event_id = Some(event_id);

    Ok(result)
}

/// Persists a volunteer availability change.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn persist_volunteer_transition(
    conn: &mut SqliteConnection,
    result: VolunteerTransition,
) -> Result<VolunteerTransition, PersistenceError> {
    let mut result: VolunteerTransition = result;

    update_volunteer_status(conn, result.volunteer.volunteer_id, result.volunteer.status)?;

    let event_id: i64 = persist_audit_event(conn, &result.audit_event)?;
    result.audit_event.event_id = Some(event_id);

    Ok(result)
}
