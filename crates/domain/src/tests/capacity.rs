// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AssignmentStatus, CapacityReport, all_terminal, committed_headcount, completed_headcount,
    evaluate_capacity, is_full,
};

use super::helpers::{create_test_assignment, create_test_request};

#[test]
fn test_committed_counts_confirmed_and_completed_only() {
    let request = create_test_request(1, 10);
    let assignments = vec![
        create_test_assignment(1, 1, 1, 1, AssignmentStatus::Pending),
        create_test_assignment(2, 2, 1, 2, AssignmentStatus::Confirmed),
        create_test_assignment(3, 3, 1, 3, AssignmentStatus::Completed),
        create_test_assignment(4, 4, 1, 4, AssignmentStatus::Rejected),
        create_test_assignment(5, 5, 1, 5, AssignmentStatus::Cancelled),
    ];

    assert_eq!(committed_headcount(&request, &assignments), 5);
    assert_eq!(completed_headcount(&request, &assignments), 3);
}

#[test]
fn test_assignments_for_other_requests_are_ignored() {
    let request = create_test_request(1, 2);
    let assignments = vec![
        create_test_assignment(1, 1, 1, 1, AssignmentStatus::Confirmed),
        create_test_assignment(2, 2, 99, 5, AssignmentStatus::Confirmed),
    ];

    assert_eq!(committed_headcount(&request, &assignments), 1);
    assert!(!is_full(&request, &assignments));
}

#[test]
fn test_group_volunteer_fills_request_alone() {
    let request = create_test_request(1, 4);
    let assignments = vec![create_test_assignment(
        1,
        1,
        1,
        4,
        AssignmentStatus::Confirmed,
    )];

    assert!(is_full(&request, &assignments));
}

#[test]
fn test_zero_required_is_always_full() {
    let request = create_test_request(1, 0);

    assert!(is_full(&request, &[]));
}

#[test]
fn test_all_terminal_is_vacuous_for_no_assignments() {
    let request = create_test_request(1, 1);

    assert!(all_terminal(&request, &[]));
}

#[test]
fn test_all_terminal_false_with_active_assignment() {
    let request = create_test_request(1, 1);
    let assignments = vec![
        create_test_assignment(1, 1, 1, 1, AssignmentStatus::Completed),
        create_test_assignment(2, 2, 1, 1, AssignmentStatus::Pending),
    ];

    assert!(!all_terminal(&request, &assignments));
}

#[test]
fn test_evaluate_capacity_report() {
    let request = create_test_request(7, 5);
    let assignments = vec![
        create_test_assignment(1, 1, 7, 2, AssignmentStatus::Completed),
        create_test_assignment(2, 2, 7, 1, AssignmentStatus::Confirmed),
        create_test_assignment(3, 3, 7, 1, AssignmentStatus::Pending),
    ];

    let report: CapacityReport = evaluate_capacity(&request, &assignments);

    assert_eq!(
        report,
        CapacityReport {
            required: 5,
            committed: 3,
            completed: 2,
            active_assignments: 2,
            is_full: false,
            remaining: 2,
        }
    );
}

#[test]
fn test_remaining_saturates_when_overcommitted() {
    let request = create_test_request(1, 2);
    let assignments = vec![create_test_assignment(
        1,
        1,
        1,
        5,
        AssignmentStatus::Confirmed,
    )];

    let report = evaluate_capacity(&request, &assignments);

    assert!(report.is_full);
    assert_eq!(report.remaining, 0);
}
