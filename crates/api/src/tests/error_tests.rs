// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use relief::CoreError;
use relief_domain::{AssignmentStatus, DomainError, RequestStatus};
use relief_persistence::PersistenceError;

use crate::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};

#[test]
fn test_error_kinds_follow_domain_classification() {
    let cases: Vec<DomainError> = vec![
        DomainError::VolunteerNotFound(1),
        DomainError::InvalidAssignmentTransition {
            assignment_id: 1,
            from: AssignmentStatus::Completed,
            to: AssignmentStatus::Cancelled,
        },
        DomainError::RequestFull {
            request_id: 1,
            committed: 3,
            required: 3,
        },
        DomainError::RequestClosed {
            request_id: 1,
            status: RequestStatus::Completed,
        },
        DomainError::InvalidPhone(String::from("Phone cannot be empty")),
        DomainError::DuplicatePhone(String::from("5550100001")),
    ];

    for err in cases {
        let expected: &str = err.kind().as_str();
        assert_eq!(translate_domain_error(err).kind(), expected);
    }
}

#[test]
fn test_request_full_message_names_headcount() {
    let err: ApiError = translate_domain_error(DomainError::RequestFull {
        request_id: 2,
        committed: 4,
        required: 3,
    });

    let ApiError::Conflict { rule, message } = err else {
        panic!("expected a conflict");
    };
    assert_eq!(rule, "request_capacity");
    assert!(message.contains('4'));
    assert!(message.contains('3'));
}

#[test]
fn test_invalid_status_maps_to_status_field() {
    let err: ApiError = translate_domain_error(DomainError::InvalidStatus {
        entity: "request",
        value: String::from("open"),
    });

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "status"));
}

#[test]
fn test_core_internal_error_is_internal() {
    let err: ApiError = translate_core_error(CoreError::Internal(String::from("bad state")));

    assert_eq!(err.kind(), "internal");
}

#[test]
fn test_rejected_transition_surfaces_domain_error() {
    let err: ApiError =
        translate_persistence_error(PersistenceError::domain(DomainError::RequestNotFound(8)));

    assert!(matches!(
        err,
        ApiError::ResourceNotFound { ref resource_type, .. } if resource_type == "Request"
    ));
}

#[test]
fn test_storage_failure_hides_detail() {
    let err: ApiError = translate_persistence_error(PersistenceError::DatabaseError(
        String::from("disk I/O error"),
    ));

    assert_eq!(err.kind(), "internal");
    assert!(!err.to_string().contains("disk"));
}
