// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApplyPolicy, Command, CoreError, State, TransitionResult, apply};
use relief_audit::{Actor, Cause};
use relief_domain::{
    Assignment, AssignmentStatus, DisasterRequest, RequestStatus, Volunteer, VolunteerStatus,
};

pub const NOW: &str = "2026-03-01T12:00:00Z";

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Dispatcher request"))
}

pub fn create_test_volunteer(volunteer_id: i64, member_count: Option<u32>) -> Volunteer {
    Volunteer {
        volunteer_id,
        name: format!("Volunteer {volunteer_id}"),
        phone: format!("+1555000{volunteer_id:04}"),
        member_count,
        status: VolunteerStatus::Available,
    }
}

pub fn create_test_request(request_id: i64, required_volunteers: u32) -> DisasterRequest {
    DisasterRequest {
        request_id,
        location: String::from("Riverside shelter"),
        description: Some(String::from("Sandbagging")),
        contact_name: String::from("Pat"),
        contact_phone: String::from("+15551234567"),
        required_volunteers,
        status: RequestStatus::Pending,
        created_at: String::from("2026-02-28T08:00:00Z"),
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
        String::from("2026-03-01T09:00:00Z"),
    );
    assignment.assignment_id = Some(assignment_id);
    assignment
}

/// Applies a command with the test actor and cause.
pub fn run(
    state: &State,
    command: Command,
    policy: ApplyPolicy,
) -> Result<TransitionResult, CoreError> {
    apply(
        state,
        command,
        policy,
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
}

/// A tiny in-memory store that feeds transition results back into the
/// next state, the way the persistence layer does.
pub struct Harness {
    pub volunteers: Vec<Volunteer>,
    pub requests: Vec<DisasterRequest>,
    pub assignments: Vec<Assignment>,
    pub policy: ApplyPolicy,
    next_id: i64,
}

impl Harness {
    pub fn new(policy: ApplyPolicy) -> Self {
        Self {
            volunteers: Vec::new(),
            requests: Vec::new(),
            assignments: Vec::new(),
            policy,
            next_id: 1,
        }
    }

    pub fn add_volunteer(&mut self, volunteer: Volunteer) {
        self.volunteers.push(volunteer);
    }

    pub fn add_request(&mut self, request: DisasterRequest) {
        self.requests.push(request);
    }

    pub fn volunteer(&self, volunteer_id: i64) -> &Volunteer {
        self.volunteers
            .iter()
            .find(|v| v.volunteer_id == volunteer_id)
            .unwrap()
    }

    pub fn request(&self, request_id: i64) -> &DisasterRequest {
        self.requests
            .iter()
            .find(|r| r.request_id == request_id)
            .unwrap()
    }

    pub fn assignment(&self, assignment_id: i64) -> &Assignment {
        self.assignments
            .iter()
            .find(|a| a.assignment_id == Some(assignment_id))
            .unwrap()
    }

    fn state_for(&self, volunteer_id: i64, request_id: i64) -> State {
        State::new(
            self.volunteer(volunteer_id).clone(),
            self.request(request_id).clone(),
            self.assignments
                .iter()
                .filter(|a| a.request_id == request_id)
                .cloned()
                .collect(),
            self.assignments
                .iter()
                .filter(|a| a.volunteer_id == volunteer_id && a.is_active())
                .cloned()
                .collect(),
        )
    }

    pub fn execute(&mut self, command: Command) -> Result<TransitionResult, CoreError> {
        let state: State = match &command {
            Command::Apply {
                volunteer_id,
                request_id,
            } => self.state_for(*volunteer_id, *request_id),
            Command::Confirm { assignment_id }
            | Command::Reject { assignment_id, .. }
            | Command::Complete { assignment_id }
            | Command::Cancel { assignment_id } => {
                let current: &Assignment = self.assignment(*assignment_id);
                self.state_for(current.volunteer_id, current.request_id)
            }
        };

        let mut result: TransitionResult = run(&state, command, self.policy)?;

        if result.assignment.assignment_id.is_none() {
            result.assignment.assignment_id = Some(self.next_id);
            self.next_id += 1;
            self.assignments.push(result.assignment.clone());
        } else if let Some(slot) = self
            .assignments
            .iter_mut()
            .find(|a| a.assignment_id == result.assignment.assignment_id)
        {
            *slot = result.assignment.clone();
        }

        if let Some(slot) = self
            .volunteers
            .iter_mut()
            .find(|v| v.volunteer_id == result.volunteer.volunteer_id)
        {
            *slot = result.volunteer.clone();
        }
        if let Some(slot) = self
            .requests
            .iter_mut()
            .find(|r| r.request_id == result.request.request_id)
        {
            *slot = result.request.clone();
        }

        Ok(result)
    }

    pub fn apply_to(&mut self, volunteer_id: i64, request_id: i64) -> i64 {
        self.execute(Command::Apply {
            volunteer_id,
            request_id,
        })
        .unwrap()
        .assignment
        .assignment_id
        .unwrap()
    }

    pub fn active_assignments_for(&self, volunteer_id: i64) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.volunteer_id == volunteer_id && a.is_active())
            .count()
    }
}
