// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity evaluation for disaster requests.
//!
//! Capacity is always recomputed from the request's assignment rows rather
//! than tracked with a running counter. Assignments belonging to other
//! requests are ignored, so callers may pass any superset.

use crate::assignment::{Assignment, AssignmentStatus};
use crate::request::DisasterRequest;
use serde::{Deserialize, Serialize};

/// A point-in-time capacity summary for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityReport {
    /// Target headcount.
    pub required: u32,
    /// Headcount of confirmed and completed assignments.
    pub committed: u32,
    /// Headcount of completed assignments only.
    pub completed: u32,
    /// Number of pending or confirmed assignments.
    pub active_assignments: usize,
    /// Whether `committed` meets `required`.
    pub is_full: bool,
    /// Headcount still needed. Zero once full.
    pub remaining: u32,
}

fn headcount_where<F>(request: &DisasterRequest, assignments: &[Assignment], pred: F) -> u32
where
    F: Fn(AssignmentStatus) -> bool,
{
    assignments
        .iter()
        .filter(|a| a.request_id == request.request_id && pred(a.status))
        .fold(0_u32, |acc, a| acc.saturating_add(a.headcount))
}

/// Sum of headcount over the request's confirmed and completed assignments.
#[must_use]
pub fn committed_headcount(request: &DisasterRequest, assignments: &[Assignment]) -> u32 {
    headcount_where(request, assignments, |s| s.counts_toward_capacity())
}

/// Sum of headcount over the request's completed assignments.
#[must_use]
pub fn completed_headcount(request: &DisasterRequest, assignments: &[Assignment]) -> u32 {
    headcount_where(request, assignments, |s| s == AssignmentStatus::Completed)
}

/// Returns true if `headcount` satisfies the request's target.
///
/// A request requiring zero volunteers is always full.
#[must_use]
pub const fn meets_target(request: &DisasterRequest, headcount: u32) -> bool {
    headcount >= request.required_volunteers
}

/// Returns true if committed headcount meets the request's target.
#[must_use]
pub fn is_full(request: &DisasterRequest, assignments: &[Assignment]) -> bool {
    meets_target(request, committed_headcount(request, assignments))
}

/// Returns true if every assignment on the request is terminal.
///
/// Vacuously true for a request with no assignments.
#[must_use]
pub fn all_terminal(request: &DisasterRequest, assignments: &[Assignment]) -> bool {
    assignments
        .iter()
        .filter(|a| a.request_id == request.request_id)
        .all(Assignment::is_terminal)
}

/// Builds a full capacity report for the request.
#[must_use]
pub fn evaluate_capacity(request: &DisasterRequest, assignments: &[Assignment]) -> CapacityReport {
    let committed: u32 = committed_headcount(request, assignments);
    let completed: u32 = completed_headcount(request, assignments);
    let active_assignments: usize = assignments
        .iter()
        .filter(|a| a.request_id == request.request_id && a.is_active())
        .count();

    CapacityReport {
        required: request.required_volunteers,
        committed,
        completed,
        active_assignments,
        is_full: meets_target(request, committed),
        remaining: request.required_volunteers.saturating_sub(committed),
    }
}
