// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use relief_persistence::Persistence;

use crate::{
    ApplyRequest, Attribution, CreateRequestRequest, RegisterVolunteerRequest, RequestInfo,
    TransitionResponse, VolunteerInfo, apply_assignment, confirm_assignment, create_request,
    register_volunteer,
};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn dispatcher() -> Attribution {
    Attribution::new(
        String::from("dispatch-1"),
        String::from("dispatcher"),
        String::from("api-req-1"),
        String::from("API request"),
    )
}

pub fn volunteer_actor(volunteer_id: i64) -> Attribution {
    Attribution::new(
        format!("volunteer-{volunteer_id}"),
        String::from("volunteer"),
        String::from("api-req-2"),
        String::from("Volunteer self-service"),
    )
}

pub fn registration(n: u32, member_count: Option<u32>) -> RegisterVolunteerRequest {
    RegisterVolunteerRequest {
        name: format!("Volunteer {n}"),
        phone: format!("(555) 020-{n:04}"),
        member_count,
        status: None,
    }
}

pub fn register(persistence: &mut Persistence, n: u32, member_count: Option<u32>) -> VolunteerInfo {
    register_volunteer(persistence, registration(n, member_count))
        .expect("Failed to register volunteer")
}

pub fn request_body(required_volunteers: u32) -> CreateRequestRequest {
    CreateRequestRequest {
        location: String::from("12 Levee Road"),
        description: Some(String::from("Sandbagging")),
        contact_name: String::from("Pat Rivera"),
        contact_phone: String::from("555.030.0001"),
        required_volunteers,
    }
}

pub fn create(persistence: &mut Persistence, required_volunteers: u32) -> RequestInfo {
    create_request(persistence, request_body(required_volunteers))
        .expect("Failed to create request")
}

pub fn apply(
    persistence: &mut Persistence,
    volunteer_id: i64,
    request_id: i64,
) -> TransitionResponse {
    apply_assignment(
        persistence,
        ApplyRequest {
            volunteer_id,
            request_id,
        },
        volunteer_actor(volunteer_id),
    )
    .expect("Failed to apply")
}

pub fn apply_confirmed(persistence: &mut Persistence, volunteer_id: i64, request_id: i64) -> i64 {
    let applied: TransitionResponse = apply(persistence, volunteer_id, request_id);
    confirm_assignment(persistence, applied.assignment.assignment_id, dispatcher())
        .expect("Failed to confirm");
    applied.assignment.assignment_id
}
