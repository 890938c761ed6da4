// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Assignment, AssignmentStatus, DisasterRequest, RequestStatus};

pub fn create_test_request(request_id: i64, required_volunteers: u32) -> DisasterRequest {
    DisasterRequest {
        request_id,
        location: String::from("Riverside shelter"),
        description: Some(String::from("Sandbagging")),
        contact_name: String::from("Site Lead"),
        contact_phone: String::from("+15551234567"),
        required_volunteers,
        status: RequestStatus::Pending,
        created_at: String::from("2026-01-01T00:00:00Z"),
    }
}

pub fn create_test_assignment(
    assignment_id: i64,
    volunteer_id: i64,
    request_id: i64,
    headcount: u32,
    status: AssignmentStatus,
) -> Assignment {
    let mut assignment: Assignment = Assignment::new(
        volunteer_id,
        request_id,
        headcount,
        status,
        String::from("2026-01-01T00:00:00Z"),
    );
    assignment.assignment_id = Some(assignment_id);
    assignment
}
