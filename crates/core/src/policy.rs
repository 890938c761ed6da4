// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use relief_domain::AssignmentStatus;

/// How `Apply` enters the assignment state machine.
///
/// A deployment picks exactly one policy at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyPolicy {
    /// Applications wait for a dispatcher to confirm or reject them.
    #[default]
    Dispatched,
    /// Applications are confirmed immediately.
    SelfService,
}

impl ApplyPolicy {
    /// Returns the configuration representation of the policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dispatched => "dispatched",
            Self::SelfService => "self-service",
        }
    }

    /// The status a newly applied assignment starts in.
    #[must_use]
    pub const fn initial_assignment_status(&self) -> AssignmentStatus {
        match self {
            Self::Dispatched => AssignmentStatus::Pending,
            Self::SelfService => AssignmentStatus::Confirmed,
        }
    }
}

impl FromStr for ApplyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dispatched" => Ok(Self::Dispatched),
            "self-service" | "self_service" => Ok(Self::SelfService),
            other => Err(format!(
                "unknown apply policy '{other}' (expected 'dispatched' or 'self-service')"
            )),
        }
    }
}

impl std::fmt::Display for ApplyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
