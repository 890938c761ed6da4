// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Disaster requests and their lifecycle status.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a disaster request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Open; no committed work yet.
    #[default]
    Pending,
    /// Open; at least one assignment is confirmed or completed.
    InProgress,
    /// Headcount met and every assignment finished.
    Completed,
    /// Withdrawn.
    Cancelled,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if the request still accepts volunteers.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus {
                entity: "request",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of relief work with a target headcount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasterRequest {
    /// Store-assigned identifier.
    pub request_id: i64,
    /// Where help is needed.
    pub location: String,
    /// Free-form description of the work.
    pub description: Option<String>,
    /// Who to contact on site.
    pub contact_name: String,
    /// Contact phone number.
    pub contact_phone: String,
    /// Target headcount.
    pub required_volunteers: u32,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// When the request was created (RFC 3339).
    pub created_at: String,
}

impl DisasterRequest {
    /// Returns true if the request still accepts volunteers.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Validates that the request may be withdrawn.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRequestTransition` if the request is
    /// already completed or cancelled.
    pub fn validate_withdrawal(&self) -> Result<(), DomainError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DomainError::InvalidRequestTransition {
                request_id: self.request_id,
                from: self.status,
                to: RequestStatus::Cancelled,
            })
        }
    }
}

/// Data for a request that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDisasterRequest {
    /// Where help is needed.
    pub location: String,
    /// Free-form description of the work.
    pub description: Option<String>,
    /// Who to contact on site.
    pub contact_name: String,
    /// Contact phone number.
    pub contact_phone: String,
    /// Target headcount.
    pub required_volunteers: u32,
}
