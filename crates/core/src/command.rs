// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A command represents user or system intent as data only.
///
/// Commands are the only way to move an assignment through its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A volunteer takes on work for a request.
    Apply {
        /// The volunteer applying.
        volunteer_id: i64,
        /// The request being applied to.
        request_id: i64,
    },
    /// A pending assignment is accepted.
    Confirm {
        /// The assignment to confirm.
        assignment_id: i64,
    },
    /// A pending assignment is turned down.
    Reject {
        /// The assignment to reject.
        assignment_id: i64,
        /// Optional free-text reason.
        reason: Option<String>,
    },
    /// Confirmed work has been carried out.
    Complete {
        /// The assignment to complete.
        assignment_id: i64,
    },
    /// A pending or confirmed assignment is called off.
    Cancel {
        /// The assignment to cancel.
        assignment_id: i64,
    },
}

impl Command {
    /// The action name recorded in the audit trail.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Apply { .. } => "ApplyAssignment",
            Self::Confirm { .. } => "ConfirmAssignment",
            Self::Reject { .. } => "RejectAssignment",
            Self::Complete { .. } => "CompleteAssignment",
            Self::Cancel { .. } => "CancelAssignment",
        }
    }
}
