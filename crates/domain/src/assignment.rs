// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment status tracking and transition logic.
//!
//! An assignment records one volunteer's commitment to one request.
//! The state machine is:
//!
//! - `pending` → `confirmed` | `rejected` | `cancelled`
//! - `confirmed` → `completed` | `cancelled`
//!
//! `rejected`, `completed` and `cancelled` are terminal. Assignments are never
//! deleted; they only move to a terminal state.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Volunteer applied; awaiting confirmation.
    Pending,
    /// Commitment accepted; work is underway.
    Confirmed,
    /// Application was turned down.
    Rejected,
    /// Work was finished.
    Completed,
    /// Commitment was withdrawn.
    Cancelled,
}

impl AssignmentStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus {
                entity: "assignment",
                value: s.to_string(),
            }),
        }
    }

    /// Returns true if no further transition is defined from this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Cancelled)
    }

    /// Returns true if the assignment still holds its volunteer.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Returns true if the assignment's headcount counts toward capacity.
    #[must_use]
    pub const fn counts_toward_capacity(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Completed)
    }

    /// Checks if a transition from this status to `target` is permitted.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed | Self::Rejected | Self::Cancelled)
                | (Self::Confirmed, Self::Completed | Self::Cancelled)
        )
    }
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The join record between one volunteer and one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Store-assigned identifier. `None` until the assignment is inserted.
    pub assignment_id: Option<i64>,
    /// The committed volunteer.
    pub volunteer_id: i64,
    /// The request being serviced.
    pub request_id: i64,
    /// The volunteer's effective member count at the time of application.
    pub headcount: u32,
    /// Current lifecycle status.
    pub status: AssignmentStatus,
    /// When the assignment was created (RFC 3339).
    pub assigned_at: String,
    /// When the assignment was confirmed (RFC 3339).
    pub confirmed_at: Option<String>,
    /// When the assignment was completed (RFC 3339).
    pub completed_at: Option<String>,
    /// When the assignment was cancelled (RFC 3339).
    pub cancelled_at: Option<String>,
    /// Optional reason recorded on rejection.
    pub rejection_reason: Option<String>,
}

impl Assignment {
    /// Creates a new, not yet persisted assignment.
    ///
    /// # Arguments
    ///
    /// * `volunteer_id` - The applying volunteer
    /// * `request_id` - The request applied to
    /// * `headcount` - The volunteer's effective member count
    /// * `status` - The initial status (`pending` or `confirmed`)
    /// * `assigned_at` - Creation timestamp
    #[must_use]
    pub const fn new(
        volunteer_id: i64,
        request_id: i64,
        headcount: u32,
        status: AssignmentStatus,
        assigned_at: String,
    ) -> Self {
        Self {
            assignment_id: None,
            volunteer_id,
            request_id,
            headcount,
            status,
            assigned_at,
            confirmed_at: None,
            completed_at: None,
            cancelled_at: None,
            rejection_reason: None,
        }
    }

    /// Returns the identifier used in error reports.
    ///
    /// Unpersisted assignments report `0`.
    #[must_use]
    pub fn id_or_default(&self) -> i64 {
        self.assignment_id.unwrap_or_default()
    }

    /// Returns true if the assignment still holds its volunteer.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true if no further transition is defined.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Validates that this assignment may move to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAssignmentTransition` if the state machine
    /// does not permit the transition. Repeating a transition that already
    /// happened (e.g. completing a completed assignment) is an error, not a
    /// no-op.
    pub fn validate_transition(&self, target: AssignmentStatus) -> Result<(), DomainError> {
        if self.status.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidAssignmentTransition {
                assignment_id: self.id_or_default(),
                from: self.status,
                to: target,
            })
        }
    }
}
