// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loading the state a transition reads.
//!
//! These run inside the operation's write transaction, so the rows they
//! return cannot change before the transition's writes land.

use diesel::SqliteConnection;
use relief::{Command, RequestState, State};
use relief_domain::{Assignment, DisasterRequest, Volunteer};

use crate::error::PersistenceError;
use crate::queries::assignments::{
    active_assignments_for_volunteer, assignments_for_request, get_assignment,
};
use crate::queries::requests::get_request;
use crate::queries::volunteers::get_volunteer;

/// Loads the volunteer, request, and assignment rows a command touches.
///
/// For `Apply` the ids come from the command. For every other command
/// they come from the target assignment row.
///
/// # Errors
///
/// Returns a wrapped not-found domain error if the volunteer, request, or
/// assignment does not exist, or a database error.
pub fn load_command_state(
    conn: &mut SqliteConnection,
    command: &Command,
) -> Result<State, PersistenceError> {
    let (volunteer_id, request_id): (i64, i64) = match command {
        Command::Apply {
            volunteer_id,
            request_id,
        } => (*volunteer_id, *request_id),
        Command::Confirm { assignment_id }
        | Command::Reject { assignment_id, .. }
        | Command::Complete { assignment_id }
        | Command::Cancel { assignment_id } => {
            let assignment: Assignment = get_assignment(conn, *assignment_id)?;
            (assignment.volunteer_id, assignment.request_id)
        }
    };

    let volunteer: Volunteer = get_volunteer(conn, volunteer_id)?;
    let request: DisasterRequest = get_request(conn, request_id)?;
    let request_assignments: Vec<Assignment> = assignments_for_request(conn, request_id)?;
    let volunteer_assignments: Vec<Assignment> =
        active_assignments_for_volunteer(conn, volunteer_id)?;

    Ok(State::new(
        volunteer,
        request,
        request_assignments,
        volunteer_assignments,
    ))
}

/// Loads a request and all of its assignments.
///
/// # Errors
///
/// Returns a wrapped `RequestNotFound` if the request does not exist, or a
/// database error.
pub fn load_request_state(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<RequestState, PersistenceError> {
    let request: DisasterRequest = get_request(conn, request_id)?;
    let assignments: Vec<Assignment> = assignments_for_request(conn, request_id)?;
    Ok(RequestState::new(request, assignments))
}
