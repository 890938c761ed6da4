// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod capacity;
mod error;
mod request;
mod validation;
mod volunteer;

#[cfg(test)]
mod tests;

pub use assignment::{Assignment, AssignmentStatus};
pub use capacity::{
    CapacityReport, all_terminal, committed_headcount, completed_headcount, evaluate_capacity,
    is_full, meets_target,
};
pub use error::{DomainError, ErrorKind};
pub use request::{DisasterRequest, NewDisasterRequest, RequestStatus};
pub use validation::{
    MAX_HEADCOUNT, normalize_phone, validate_new_request, validate_new_volunteer, validate_phone,
    validate_phone_unique,
};
pub use volunteer::{DEFAULT_MEMBER_COUNT, NewVolunteer, Volunteer, VolunteerStatus};
