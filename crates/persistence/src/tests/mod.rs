// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;

use relief::TransitionResult;
use relief_audit::{Actor, Cause};
use relief_domain::{DisasterRequest, DomainError, NewDisasterRequest, NewVolunteer, Volunteer};

use crate::{Persistence, PersistenceError};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// Registers a volunteer with a phone derived from `n`.
pub fn register(persistence: &mut Persistence, n: u32, member_count: Option<u32>) -> Volunteer {
    persistence
        .register_volunteer(NewVolunteer::new(
            format!("Volunteer {n}"),
            format!("555-010-{n:04}"),
            member_count,
        ))
        .expect("volunteer registers")
}

pub fn create_test_request(required_volunteers: u32) -> NewDisasterRequest {
    NewDisasterRequest {
        location: String::from("Riverside shelter"),
        description: Some(String::from("Sandbagging along the levee")),
        contact_name: String::from("Pat"),
        contact_phone: String::from("555-123-4567"),
        required_volunteers,
    }
}

pub fn create_request(persistence: &mut Persistence, required_volunteers: u32) -> DisasterRequest {
    persistence
        .create_request(create_test_request(required_volunteers))
        .expect("request is created")
}

pub fn apply(persistence: &mut Persistence, volunteer_id: i64, request_id: i64) -> TransitionResult {
    persistence
        .apply_assignment(
            volunteer_id,
            request_id,
            create_test_actor(),
            create_test_cause(),
        )
        .expect("apply succeeds")
}

pub fn confirm(persistence: &mut Persistence, assignment_id: i64) -> TransitionResult {
    persistence
        .confirm_assignment(assignment_id, create_test_actor(), create_test_cause())
        .expect("confirm succeeds")
}

pub fn complete(persistence: &mut Persistence, assignment_id: i64) -> TransitionResult {
    persistence
        .complete_assignment(assignment_id, create_test_actor(), create_test_cause())
        .expect("complete succeeds")
}

pub fn cancel(persistence: &mut Persistence, assignment_id: i64) -> TransitionResult {
    persistence
        .cancel_assignment(assignment_id, create_test_actor(), create_test_cause())
        .expect("cancel succeeds")
}

/// Applies and confirms in one step, returning the assignment id.
pub fn apply_confirmed(persistence: &mut Persistence, volunteer_id: i64, request_id: i64) -> i64 {
    let applied: TransitionResult = apply(persistence, volunteer_id, request_id);
    let assignment_id: i64 = applied.assignment.assignment_id.expect("assignment id");
    confirm(persistence, assignment_id);
    assignment_id
}

/// Unwraps the domain error behind a rejected operation.
pub fn domain_error<T: std::fmt::Debug>(result: Result<T, PersistenceError>) -> DomainError {
    result
        .expect_err("operation should be rejected")
        .domain_error()
        .cloned()
        .expect("rejection carries a domain error")
}
