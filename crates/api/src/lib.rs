// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the relief assignment coordinator.
//!
//! This crate sits between transports and the persistence layer. It
//! accepts plain request objects, runs one coordinator operation per call,
//! and returns serializable responses or an [`ApiError`] whose
//! [`ApiError::kind`] tells the caller how to react:
//!
//! - `not_found`: the referenced entity does not exist
//! - `invalid_state`: the caller acted on a stale view and should re-fetch
//! - `conflict`: a capacity or exclusivity rule refused the operation
//! - `invalid_input`: a field failed validation
//!
//! Authorization is out of scope. Mutating calls carry an [`Attribution`]
//! that is recorded in the audit trail.

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
#![allow(clippy::multiple_crate_versions)]

mod attribution;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use attribution::{ActorType, Attribution};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    apply_assignment, cancel_assignment, complete_assignment, confirm_assignment,
    create_request, get_assignment, get_audit_event, get_audit_timeline, get_request,
    get_volunteer, get_volunteer_timeline, list_open_requests, list_requests,
    list_volunteer_assignments, list_volunteers, reevaluate_request, register_volunteer,
    reject_assignment, set_availability, withdraw_request,
};
pub use request_response::{
    ApplyRequest, AssignmentInfo, AuditEventInfo, AuditTimelineResponse, AvailabilityResponse,
    CapacityInfo, CreateRequestRequest, ListOpenRequestsResponse, ListRequestsResponse,
    ListVolunteersResponse, OpenRequestInfo, RegisterVolunteerRequest, RejectRequest,
    RequestDetailResponse, RequestInfo, RequestOperationResponse, SetAvailabilityRequest,
    TransitionResponse, VolunteerAssignmentsResponse, VolunteerInfo,
};
