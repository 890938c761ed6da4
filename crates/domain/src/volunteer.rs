// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Volunteer records and availability status.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Headcount used when a volunteer record carries no member count.
pub const DEFAULT_MEMBER_COUNT: u32 = 1;

/// Availability of a volunteer.
///
/// `Assigning` and `Assigned` are the committed states: the volunteer holds
/// exactly one active assignment (pending or confirmed respectively).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolunteerStatus {
    /// Not taking work.
    Off,
    /// Free to apply to a request.
    #[default]
    Available,
    /// Holds a pending assignment.
    Assigning,
    /// Holds a confirmed assignment.
    Assigned,
}

impl VolunteerStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Available => "available",
            Self::Assigning => "assigning",
            Self::Assigned => "assigned",
        }
    }

    /// Returns true if the volunteer is held by an active assignment.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Assigning | Self::Assigned)
    }
}

impl FromStr for VolunteerStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "available" => Ok(Self::Available),
            "assigning" => Ok(Self::Assigning),
            "assigned" => Ok(Self::Assigned),
            _ => Err(DomainError::InvalidStatus {
                entity: "volunteer",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for VolunteerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered volunteer (an individual or a group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    /// Store-assigned identifier.
    pub volunteer_id: i64,
    /// Display name.
    pub name: String,
    /// Normalized phone number. Unique across volunteers.
    pub phone: String,
    /// Number of people this entry represents, if recorded.
    pub member_count: Option<u32>,
    /// Current availability.
    pub status: VolunteerStatus,
}

impl Volunteer {
    /// Returns the effective headcount this volunteer contributes.
    ///
    /// Falls back to [`DEFAULT_MEMBER_COUNT`] when no member count is recorded.
    #[must_use]
    pub fn headcount(&self) -> u32 {
        self.member_count.unwrap_or(DEFAULT_MEMBER_COUNT)
    }

    /// Returns true if the volunteer is held by an active assignment.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.status.is_committed()
    }

    /// Validates a manual availability change (`off` ↔ `available`).
    ///
    /// Committed volunteers cannot be switched; their status belongs to the
    /// lifecycle coordinator until the assignment ends.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidVolunteerTransition` if the volunteer is
    /// committed or the target is a committed status.
    pub fn validate_availability_change(&self, target: VolunteerStatus) -> Result<(), DomainError> {
        if self.is_committed() || target.is_committed() {
            return Err(DomainError::InvalidVolunteerTransition {
                volunteer_id: self.volunteer_id,
                from: self.status,
                to: target,
            });
        }
        Ok(())
    }
}

/// Registration data for a volunteer that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVolunteer {
    /// Display name.
    pub name: String,
    /// Phone number as entered.
    pub phone: String,
    /// Number of people this entry represents.
    pub member_count: Option<u32>,
    /// Initial availability (`off` or `available`).
    pub status: VolunteerStatus,
}

impl NewVolunteer {
    /// Creates registration data with the default `available` status.
    #[must_use]
    pub const fn new(name: String, phone: String, member_count: Option<u32>) -> Self {
        Self {
            name,
            phone,
            member_count,
            status: VolunteerStatus::Available,
        }
    }
}
