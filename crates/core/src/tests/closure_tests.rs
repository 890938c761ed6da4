// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_assignment, create_test_request};
use crate::{ClosureOutcome, derive_request_status, derive_volunteer_status, evaluate_closure};
use relief_domain::{AssignmentStatus, DisasterRequest, RequestStatus, VolunteerStatus};

#[test]
fn test_request_without_assignments_stays_pending() {
    let request: DisasterRequest = create_test_request(1, 2);

    assert_eq!(derive_request_status(&request, &[]), RequestStatus::Pending);
}

#[test]
fn test_completed_headcount_at_target_closes_request() {
    let mut request: DisasterRequest = create_test_request(1, 3);
    request.status = RequestStatus::InProgress;
    let assignments = vec![
        create_test_assignment(1, 1, 1, 2, AssignmentStatus::Completed),
        create_test_assignment(2, 2, 1, 1, AssignmentStatus::Completed),
        create_test_assignment(3, 3, 1, 4, AssignmentStatus::Rejected),
    ];

    let outcome: ClosureOutcome = evaluate_closure(&request, &assignments);

    assert_eq!(outcome.current, RequestStatus::Completed);
    assert!(outcome.closed());
    assert!(outcome.changed());
}

#[test]
fn test_active_assignment_blocks_closure() {
    let mut request: DisasterRequest = create_test_request(1, 1);
    request.status = RequestStatus::InProgress;
    let assignments = vec![
        create_test_assignment(1, 1, 1, 1, AssignmentStatus::Completed),
        create_test_assignment(2, 2, 1, 1, AssignmentStatus::Pending),
    ];

    assert_eq!(
        derive_request_status(&request, &assignments),
        RequestStatus::InProgress
    );
}

#[test]
fn test_confirmed_headcount_does_not_close() {
    let mut request: DisasterRequest = create_test_request(1, 1);
    request.status = RequestStatus::InProgress;
    let assignments = vec![create_test_assignment(
        1,
        1,
        1,
        1,
        AssignmentStatus::Confirmed,
    )];

    assert_eq!(
        derive_request_status(&request, &assignments),
        RequestStatus::InProgress
    );
}

#[test]
fn test_partial_completion_stays_in_progress() {
    let mut request: DisasterRequest = create_test_request(1, 3);
    request.status = RequestStatus::InProgress;
    let assignments = vec![create_test_assignment(
        1,
        1,
        1,
        1,
        AssignmentStatus::Completed,
    )];

    assert_eq!(
        derive_request_status(&request, &assignments),
        RequestStatus::InProgress
    );
}

#[test]
fn test_only_terminal_failures_return_to_pending() {
    let mut request: DisasterRequest = create_test_request(1, 2);
    request.status = RequestStatus::InProgress;
    let assignments = vec![
        create_test_assignment(1, 1, 1, 1, AssignmentStatus::Cancelled),
        create_test_assignment(2, 2, 1, 1, AssignmentStatus::Rejected),
    ];

    assert_eq!(
        derive_request_status(&request, &assignments),
        RequestStatus::Pending
    );
}

#[test]
fn test_completed_never_regresses() {
    let mut request: DisasterRequest = create_test_request(1, 2);
    request.status = RequestStatus::Completed;
    let assignments = vec![create_test_assignment(
        1,
        1,
        1,
        1,
        AssignmentStatus::Cancelled,
    )];

    let outcome: ClosureOutcome = evaluate_closure(&request, &assignments);

    assert_eq!(outcome.current, RequestStatus::Completed);
    assert!(!outcome.changed());
    assert!(!outcome.closed());
}

#[test]
fn test_cancelled_is_never_touched() {
    let mut request: DisasterRequest = create_test_request(1, 1);
    request.status = RequestStatus::Cancelled;
    let assignments = vec![create_test_assignment(
        1,
        1,
        1,
        1,
        AssignmentStatus::Completed,
    )];

    assert_eq!(
        derive_request_status(&request, &assignments),
        RequestStatus::Cancelled
    );
}

#[test]
fn test_closure_is_idempotent() {
    let mut request: DisasterRequest = create_test_request(1, 1);
    request.status = RequestStatus::InProgress;
    let assignments = vec![create_test_assignment(
        1,
        1,
        1,
        1,
        AssignmentStatus::Completed,
    )];

    let first: ClosureOutcome = evaluate_closure(&request, &assignments);
    request.status = first.current;
    let second: ClosureOutcome = evaluate_closure(&request, &assignments);

    assert_eq!(first.current, RequestStatus::Completed);
    assert_eq!(second.current, RequestStatus::Completed);
    assert!(!second.changed());
}

#[test]
fn test_rows_for_other_requests_are_ignored() {
    let request: DisasterRequest = create_test_request(1, 1);
    let assignments = vec![create_test_assignment(
        1,
        1,
        2,
        1,
        AssignmentStatus::Completed,
    )];

    assert_eq!(
        derive_request_status(&request, &assignments),
        RequestStatus::Pending
    );
}

#[test]
fn test_volunteer_status_follows_active_assignments() {
    let pending = create_test_assignment(1, 1, 1, 1, AssignmentStatus::Pending);
    let confirmed = create_test_assignment(2, 1, 1, 1, AssignmentStatus::Confirmed);
    let done = create_test_assignment(3, 1, 1, 1, AssignmentStatus::Completed);

    assert_eq!(
        derive_volunteer_status(VolunteerStatus::Available, &[pending]),
        VolunteerStatus::Assigning
    );
    assert_eq!(
        derive_volunteer_status(VolunteerStatus::Assigning, &[confirmed]),
        VolunteerStatus::Assigned
    );
    assert_eq!(
        derive_volunteer_status(VolunteerStatus::Assigned, &[done.clone()]),
        VolunteerStatus::Available
    );
    assert_eq!(
        derive_volunteer_status(VolunteerStatus::Off, &[done]),
        VolunteerStatus::Off
    );
}

#[test]
fn test_outcome_changed_compares_statuses() {
    let same: ClosureOutcome = ClosureOutcome {
        request_id: 1,
        previous: RequestStatus::InProgress,
        current: RequestStatus::InProgress,
    };
    assert!(!same.changed());
    assert!(!same.closed());

    let moved: ClosureOutcome = ClosureOutcome {
        request_id: 1,
        previous: RequestStatus::Pending,
        current: RequestStatus::InProgress,
    };
    assert!(moved.changed());
    assert!(!moved.closed());
}
