// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    NOW, create_test_actor, create_test_assignment, create_test_cause, create_test_request,
    create_test_volunteer,
};
use crate::{
    CoreError, RequestState, RequestTransition, VolunteerTransition, reevaluate,
    set_availability, withdraw,
};
use relief_domain::{AssignmentStatus, DomainError, RequestStatus, Volunteer, VolunteerStatus};

#[test]
fn test_reevaluate_closes_satisfied_request() {
    let mut request = create_test_request(1, 1);
    request.status = RequestStatus::InProgress;
    let state: RequestState = RequestState::new(
        request,
        vec![create_test_assignment(
            1,
            1,
            1,
            1,
            AssignmentStatus::Completed,
        )],
    );

    let result: RequestTransition =
        reevaluate(&state, create_test_actor(), create_test_cause(), NOW).unwrap();

    assert_eq!(result.request.status, RequestStatus::Completed);
    assert!(result.closure.closed());
    assert_eq!(result.audit_event.action.name, "ReevaluateRequest");
    assert_eq!(result.audit_event.scope.request_id, Some(1));
    assert_eq!(result.audit_event.scope.volunteer_id, None);
}

#[test]
fn test_reevaluate_without_change_still_records_event() {
    let state: RequestState = RequestState::new(create_test_request(1, 2), Vec::new());

    let result: RequestTransition =
        reevaluate(&state, create_test_actor(), create_test_cause(), NOW).unwrap();

    assert!(!result.closure.changed());
    assert!(
        result
            .audit_event
            .action
            .details
            .unwrap()
            .contains("unchanged")
    );
}

#[test]
fn test_withdraw_open_request() {
    let state: RequestState = RequestState::new(
        create_test_request(1, 2),
        vec![create_test_assignment(
            1,
            1,
            1,
            1,
            AssignmentStatus::Rejected,
        )],
    );

    let result: RequestTransition =
        withdraw(&state, create_test_actor(), create_test_cause(), NOW).unwrap();

    assert_eq!(result.request.status, RequestStatus::Cancelled);
    assert_eq!(result.closure.previous, RequestStatus::Pending);
    assert_eq!(result.audit_event.action.name, "WithdrawRequest");
}

#[test]
fn test_withdraw_with_active_assignments_conflicts() {
    let state: RequestState = RequestState::new(
        create_test_request(1, 2),
        vec![
            create_test_assignment(1, 1, 1, 1, AssignmentStatus::Pending),
            create_test_assignment(2, 2, 1, 1, AssignmentStatus::Confirmed),
        ],
    );

    let result: Result<RequestTransition, CoreError> =
        withdraw(&state, create_test_actor(), create_test_cause(), NOW);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::RequestHasActiveAssignments {
                request_id: 1,
                active: 2,
            }
        ))
    );
}

#[test]
fn test_withdraw_completed_request_is_invalid_state() {
    let mut request = create_test_request(1, 1);
    request.status = RequestStatus::Completed;
    let state: RequestState = RequestState::new(request, Vec::new());

    let result: Result<RequestTransition, CoreError> =
        withdraw(&state, create_test_actor(), create_test_cause(), NOW);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidRequestTransition { .. }
        ))
    ));
}

#[test]
fn test_set_availability_toggles_uncommitted_volunteer() {
    let volunteer: Volunteer = create_test_volunteer(4, None);

    let result: VolunteerTransition = set_availability(
        &volunteer,
        VolunteerStatus::Off,
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    assert_eq!(result.volunteer.status, VolunteerStatus::Off);
    assert_eq!(result.audit_event.action.name, "SetAvailability");
    assert_eq!(result.audit_event.scope.volunteer_id, Some(4));
    assert_eq!(result.audit_event.scope.request_id, None);
}

#[test]
fn test_set_availability_rejected_while_committed() {
    let mut volunteer: Volunteer = create_test_volunteer(4, None);
    volunteer.status = VolunteerStatus::Assigning;

    let result: Result<VolunteerTransition, CoreError> = set_availability(
        &volunteer,
        VolunteerStatus::Off,
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidVolunteerTransition { .. }
        ))
    ));
}
