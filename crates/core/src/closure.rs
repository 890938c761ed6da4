// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Derived status rules.
//!
//! Request and volunteer statuses are recomputed from the assignment rows
//! after every transition rather than maintained with counters. Re-running
//! any function here on unchanged input yields the same answer.

use relief_domain::{
    Assignment, AssignmentStatus, DisasterRequest, RequestStatus, VolunteerStatus, all_terminal,
    completed_headcount, meets_target,
};

/// How a request's status moved when the closure rule ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureOutcome {
    /// The request evaluated.
    pub request_id: i64,
    /// Status before evaluation.
    pub previous: RequestStatus,
    /// Status after evaluation.
    pub current: RequestStatus,
}

impl ClosureOutcome {
    /// Whether the status moved.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }

    /// Whether this evaluation closed the request.
    #[must_use]
    pub const fn closed(&self) -> bool {
        matches!(self.current, RequestStatus::Completed)
            && !matches!(self.previous, RequestStatus::Completed)
    }
}

/// Derives a request's status from its assignments.
///
/// - `completed` and `cancelled` are sticky and never change here.
/// - Every assignment terminal and completed headcount at target: `completed`.
/// - Any confirmed or completed assignment: `in_progress`.
/// - Otherwise `pending`.
///
/// # Arguments
///
/// * `request` - The request to evaluate
/// * `assignments` - Assignments to consider; rows for other requests are ignored
#[must_use]
pub fn derive_request_status(
    request: &DisasterRequest,
    assignments: &[Assignment],
) -> RequestStatus {
    if !request.is_open() {
        return request.status;
    }

    let completed: u32 = completed_headcount(request, assignments);
    if all_terminal(request, assignments) && meets_target(request, completed) {
        return RequestStatus::Completed;
    }

    let has_committed: bool = assignments
        .iter()
        .filter(|a| a.request_id == request.request_id)
        .any(|a| a.status.counts_toward_capacity());

    if has_committed {
        RequestStatus::InProgress
    } else {
        RequestStatus::Pending
    }
}

/// Runs the closure rule for a request.
///
/// # Returns
///
/// The previous and derived status. The caller persists `current` when
/// `changed()` is true.
#[must_use]
pub fn evaluate_closure(request: &DisasterRequest, assignments: &[Assignment]) -> ClosureOutcome {
    ClosureOutcome {
        request_id: request.request_id,
        previous: request.status,
        current: derive_request_status(request, assignments),
    }
}

/// Derives a volunteer's status from the active assignments it holds.
///
/// An `off` volunteer with nothing active stays `off`.
///
/// # Arguments
///
/// * `current` - The volunteer's status before the transition
/// * `active` - The volunteer's assignments after the transition; terminal rows are ignored
#[must_use]
pub fn derive_volunteer_status(
    current: VolunteerStatus,
    active: &[Assignment],
) -> VolunteerStatus {
    if active.iter().any(|a| a.status == AssignmentStatus::Confirmed) {
        VolunteerStatus::Assigned
    } else if active.iter().any(|a| a.status == AssignmentStatus::Pending) {
        VolunteerStatus::Assigning
    } else if current == VolunteerStatus::Off {
        VolunteerStatus::Off
    } else {
        VolunteerStatus::Available
    }
}
