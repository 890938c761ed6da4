// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use relief_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use relief_domain::{
    Assignment, AssignmentStatus, DisasterRequest, DomainError, RequestStatus, Volunteer,
    VolunteerStatus, committed_headcount, is_full,
};

use crate::closure::{ClosureOutcome, derive_volunteer_status, evaluate_closure};
use crate::command::Command;
use crate::error::CoreError;
use crate::policy::ApplyPolicy;
use crate::state::{
    RequestState, RequestTransition, State, TransitionResult, VolunteerTransition,
};

/// Applies an assignment command to the current state, producing the
/// updated entities and an audit event.
///
/// The request status is re-derived after every command, so the closure
/// rule runs after `Complete`, `Reject`, and `Cancel` alike.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `policy` - How `Apply` enters the state machine
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - RFC 3339 timestamp stamped on the assignment and audit event
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new entities and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The assignment is not on the loaded request
/// - The assignment status does not permit the transition
/// - The volunteer is off or already committed (`Apply`)
/// - The request is closed or full (`Apply`, `Confirm`)
/// - The loaded state does not belong to the command
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &State,
    command: Command,
    policy: ApplyPolicy,
    actor: Actor,
    cause: Cause,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    let action_name: &'static str = command.action_name();

    let (before, assignment, details): (StateSnapshot, Assignment, String) = match command {
        Command::Apply {
            volunteer_id,
            request_id,
        } => {
            check_apply_scope(state, volunteer_id, request_id)?;
            let before: StateSnapshot = state.to_snapshot(None)?;
            let assignment: Assignment = apply_new(state, policy, now)?;
            let details: String = format!(
                "Volunteer {volunteer_id} applied to request {request_id} with headcount {} ({policy})",
                assignment.headcount
            );
            (before, assignment, details)
        }
        Command::Confirm { assignment_id } => {
            let current: &Assignment = target_assignment(state, assignment_id)?;
            let before: StateSnapshot = state.to_snapshot(Some(current))?;
            current.validate_transition(AssignmentStatus::Confirmed)?;
            check_request_accepts(&state.request, &state.request_assignments)?;

            let mut assignment: Assignment = current.clone();
            assignment.status = AssignmentStatus::Confirmed;
            assignment.confirmed_at = Some(now.to_string());
            (before, assignment, format!("Confirmed assignment {assignment_id}"))
        }
        Command::Reject {
            assignment_id,
            reason,
        } => {
            let current: &Assignment = target_assignment(state, assignment_id)?;
            let before: StateSnapshot = state.to_snapshot(Some(current))?;
            current.validate_transition(AssignmentStatus::Rejected)?;

            let reason: Option<String> = reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty());
            let details: String = reason.as_ref().map_or_else(
                || format!("Rejected assignment {assignment_id}"),
                |r| format!("Rejected assignment {assignment_id}: {r}"),
            );

            let mut assignment: Assignment = current.clone();
            assignment.status = AssignmentStatus::Rejected;
            assignment.rejection_reason = reason;
            (before, assignment, details)
        }
        Command::Complete { assignment_id } => {
            let current: &Assignment = target_assignment(state, assignment_id)?;
            let before: StateSnapshot = state.to_snapshot(Some(current))?;
            current.validate_transition(AssignmentStatus::Completed)?;

            let mut assignment: Assignment = current.clone();
            assignment.status = AssignmentStatus::Completed;
            assignment.completed_at = Some(now.to_string());
            (before, assignment, format!("Completed assignment {assignment_id}"))
        }
        Command::Cancel { assignment_id } => {
            let current: &Assignment = target_assignment(state, assignment_id)?;
            let before: StateSnapshot = state.to_snapshot(Some(current))?;
            current.validate_transition(AssignmentStatus::Cancelled)?;

            let mut assignment: Assignment = current.clone();
            assignment.status = AssignmentStatus::Cancelled;
            assignment.cancelled_at = Some(now.to_string());
            (before, assignment, format!("Cancelled assignment {assignment_id}"))
        }
    };

    let request_assignments: Vec<Assignment> =
        replace_or_push(&state.request_assignments, &assignment);
    let volunteer_assignments: Vec<Assignment> =
        replace_or_push(&state.volunteer_assignments, &assignment);

    let closure: ClosureOutcome = evaluate_closure(&state.request, &request_assignments);
    let mut request: DisasterRequest = state.request.clone();
    request.status = closure.current;

    let mut volunteer: Volunteer = state.volunteer.clone();
    volunteer.status = derive_volunteer_status(state.volunteer.status, &volunteer_assignments);

    let details: String = if closure.closed() {
        format!("{details}; request {} completed", request.request_id)
    } else {
        details
    };

    let new_state: State = State::new(
        volunteer.clone(),
        request.clone(),
        request_assignments,
        volunteer_assignments
            .into_iter()
            .filter(Assignment::is_active)
            .collect(),
    );
    let after: StateSnapshot = new_state.to_snapshot(Some(&assignment))?;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(action_name), Some(details)),
        before,
        after,
        AuditScope::assignment(
            request.request_id,
            volunteer.volunteer_id,
            assignment.assignment_id,
        ),
        now.to_string(),
    );

    Ok(TransitionResult {
        assignment,
        volunteer,
        request,
        closure,
        audit_event,
    })
}

/// Re-runs the closure rule for a request on its own.
///
/// Always succeeds for an existing request and always records an audit
/// event, so a retried trigger leaves a trace even when nothing moved.
///
/// # Errors
///
/// Returns `CoreError::Internal` if the audit snapshot cannot be built.
pub fn reevaluate(
    state: &RequestState,
    actor: Actor,
    cause: Cause,
    now: &str,
) -> Result<RequestTransition, CoreError> {
    let before: StateSnapshot = state.to_snapshot()?;
    let closure: ClosureOutcome = evaluate_closure(&state.request, &state.assignments);

    let mut request: DisasterRequest = state.request.clone();
    request.status = closure.current;

    let details: String = if closure.changed() {
        format!(
            "Request {} moved from '{}' to '{}'",
            request.request_id, closure.previous, closure.current
        )
    } else {
        format!(
            "Request {} unchanged at '{}'",
            request.request_id, closure.current
        )
    };

    let after: StateSnapshot =
        RequestState::new(request.clone(), state.assignments.clone()).to_snapshot()?;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from("ReevaluateRequest"), Some(details)),
        before,
        after,
        AuditScope::request(request.request_id),
        now.to_string(),
    );

    Ok(RequestTransition {
        request,
        closure,
        audit_event,
    })
}

/// Withdraws an open request that has no active assignments.
///
/// # Errors
///
/// Returns an error if:
/// - The request is already completed or cancelled
/// - The request still has pending or confirmed assignments
pub fn withdraw(
    state: &RequestState,
    actor: Actor,
    cause: Cause,
    now: &str,
) -> Result<RequestTransition, CoreError> {
    state.request.validate_withdrawal()?;

    let active: usize = state
        .assignments
        .iter()
        .filter(|a| a.request_id == state.request.request_id && a.is_active())
        .count();
    if active > 0 {
        return Err(CoreError::DomainViolation(
            DomainError::RequestHasActiveAssignments {
                request_id: state.request.request_id,
                active,
            },
        ));
    }

    let before: StateSnapshot = state.to_snapshot()?;

    let mut request: DisasterRequest = state.request.clone();
    request.status = RequestStatus::Cancelled;
    let closure: ClosureOutcome = ClosureOutcome {
        request_id: request.request_id,
        previous: state.request.status,
        current: RequestStatus::Cancelled,
    };

    let after: StateSnapshot =
        RequestState::new(request.clone(), state.assignments.clone()).to_snapshot()?;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("WithdrawRequest"),
            Some(format!("Withdrew request {}", request.request_id)),
        ),
        before,
        after,
        AuditScope::request(request.request_id),
        now.to_string(),
    );

    Ok(RequestTransition {
        request,
        closure,
        audit_event,
    })
}

/// Switches an uncommitted volunteer between `off` and `available`.
///
/// # Errors
///
/// Returns an error if the volunteer is committed or the target is not
/// `off`/`available`.
pub fn set_availability(
    volunteer: &Volunteer,
    target: VolunteerStatus,
    actor: Actor,
    cause: Cause,
    now: &str,
) -> Result<VolunteerTransition, CoreError> {
    volunteer.validate_availability_change(target)?;

    let before: StateSnapshot = volunteer_snapshot(volunteer)?;
    let mut updated: Volunteer = volunteer.clone();
    updated.status = target;
    let after: StateSnapshot = volunteer_snapshot(&updated)?;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("SetAvailability"),
            Some(format!(
                "Volunteer {} moved from '{}' to '{target}'",
                volunteer.volunteer_id, volunteer.status
            )),
        ),
        before,
        after,
        AuditScope::volunteer(volunteer.volunteer_id),
        now.to_string(),
    );

    Ok(VolunteerTransition {
        volunteer: updated,
        audit_event,
    })
}

fn volunteer_snapshot(volunteer: &Volunteer) -> Result<StateSnapshot, CoreError> {
    serde_json::to_string(volunteer)
        .map(StateSnapshot::new)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize snapshot: {e}")))
}

fn check_apply_scope(state: &State, volunteer_id: i64, request_id: i64) -> Result<(), CoreError> {
    if state.volunteer.volunteer_id != volunteer_id || state.request.request_id != request_id {
        return Err(CoreError::Internal(format!(
            "State for volunteer {} and request {} does not match apply for volunteer {volunteer_id} and request {request_id}",
            state.volunteer.volunteer_id, state.request.request_id
        )));
    }
    Ok(())
}

fn target_assignment(state: &State, assignment_id: i64) -> Result<&Assignment, CoreError> {
    let assignment: &Assignment = state
        .find_assignment(assignment_id)
        .ok_or(DomainError::AssignmentNotFound(assignment_id))?;

    if assignment.volunteer_id != state.volunteer.volunteer_id {
        return Err(CoreError::Internal(format!(
            "Assignment {assignment_id} belongs to volunteer {}, not {}",
            assignment.volunteer_id, state.volunteer.volunteer_id
        )));
    }

    Ok(assignment)
}

/// Checks that a request can take on more committed headcount.
fn check_request_accepts(
    request: &DisasterRequest,
    assignments: &[Assignment],
) -> Result<(), DomainError> {
    if !request.is_open() {
        return Err(DomainError::RequestClosed {
            request_id: request.request_id,
            status: request.status,
        });
    }

    if is_full(request, assignments) {
        return Err(DomainError::RequestFull {
            request_id: request.request_id,
            committed: committed_headcount(request, assignments),
            required: request.required_volunteers,
        });
    }

    Ok(())
}

fn apply_new(state: &State, policy: ApplyPolicy, now: &str) -> Result<Assignment, DomainError> {
    let volunteer: &Volunteer = &state.volunteer;

    if let Some(active) = state.volunteer_assignments.iter().find(|a| a.is_active()) {
        return Err(DomainError::VolunteerAlreadyCommitted {
            volunteer_id: volunteer.volunteer_id,
            assignment_id: active.id_or_default(),
        });
    }

    if volunteer.status != VolunteerStatus::Available {
        return Err(DomainError::VolunteerUnavailable {
            volunteer_id: volunteer.volunteer_id,
            status: volunteer.status,
        });
    }

    check_request_accepts(&state.request, &state.request_assignments)?;

    let status: AssignmentStatus = policy.initial_assignment_status();
    let mut assignment: Assignment = Assignment::new(
        volunteer.volunteer_id,
        state.request.request_id,
        volunteer.headcount(),
        status,
        now.to_string(),
    );
    if status == AssignmentStatus::Confirmed {
        assignment.confirmed_at = Some(now.to_string());
    }

    Ok(assignment)
}

/// Returns `rows` with `assignment` substituted by id, or appended when new.
fn replace_or_push(rows: &[Assignment], assignment: &Assignment) -> Vec<Assignment> {
    let mut updated: Vec<Assignment> = rows.to_vec();
    match assignment.assignment_id {
        Some(id) => {
            if let Some(slot) = updated.iter_mut().find(|a| a.assignment_id == Some(id)) {
                *slot = assignment.clone();
            } else {
                updated.push(assignment.clone());
            }
        }
        None => updated.push(assignment.clone()),
    }
    updated
}
