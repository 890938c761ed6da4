// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::assignment::AssignmentStatus;
use crate::request::RequestStatus;
use crate::validation::MAX_HEADCOUNT;
use crate::volunteer::VolunteerStatus;

/// Coarse classification of a domain error.
///
/// Callers use the kind to decide between surfacing the error, re-fetching
/// and informing the user, or rejecting the input outright. None of the
/// kinds are retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced volunteer, request, or assignment does not exist.
    NotFound,
    /// The current status does not permit the requested transition.
    /// The caller acted on a stale view and should re-fetch.
    InvalidState,
    /// A capacity or exclusivity rule rejected the operation.
    Conflict,
    /// A field failed validation.
    InvalidInput,
}

impl ErrorKind {
    /// Returns the wire representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
            Self::Conflict => "conflict",
            Self::InvalidInput => "invalid_input",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during domain validation and lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Volunteer does not exist.
    VolunteerNotFound(i64),
    /// Disaster request does not exist.
    RequestNotFound(i64),
    /// Assignment does not exist.
    AssignmentNotFound(i64),
    /// The assignment state machine does not permit this transition.
    InvalidAssignmentTransition {
        /// The assignment being transitioned.
        assignment_id: i64,
        /// The current status.
        from: AssignmentStatus,
        /// The requested status.
        to: AssignmentStatus,
    },
    /// The volunteer status does not permit this change.
    InvalidVolunteerTransition {
        /// The volunteer being changed.
        volunteer_id: i64,
        /// The current status.
        from: VolunteerStatus,
        /// The requested status.
        to: VolunteerStatus,
    },
    /// The request status does not permit this change.
    InvalidRequestTransition {
        /// The request being changed.
        request_id: i64,
        /// The current status.
        from: RequestStatus,
        /// The requested status.
        to: RequestStatus,
    },
    /// Volunteer is switched off and cannot take work.
    VolunteerUnavailable {
        /// The volunteer.
        volunteer_id: i64,
        /// The volunteer's current status.
        status: VolunteerStatus,
    },
    /// Volunteer already holds an active assignment.
    VolunteerAlreadyCommitted {
        /// The volunteer.
        volunteer_id: i64,
        /// The active assignment holding the volunteer.
        assignment_id: i64,
    },
    /// Request is completed or withdrawn and accepts no more work.
    RequestClosed {
        /// The request.
        request_id: i64,
        /// The request's current status.
        status: RequestStatus,
    },
    /// Request headcount target is already met.
    RequestFull {
        /// The request.
        request_id: i64,
        /// Headcount already committed.
        committed: u32,
        /// Headcount required.
        required: u32,
    },
    /// Request still has pending or confirmed assignments.
    RequestHasActiveAssignments {
        /// The request.
        request_id: i64,
        /// Number of active assignments.
        active: usize,
    },
    /// Volunteer name is empty or invalid.
    InvalidName(String),
    /// Phone number is empty or malformed.
    InvalidPhone(String),
    /// Another volunteer is already registered with this phone.
    DuplicatePhone(String),
    /// Member count must be between 1 and the storable maximum.
    InvalidMemberCount(u32),
    /// Required volunteer count must be between 1 and the storable maximum.
    InvalidRequiredVolunteers(u32),
    /// Request location is empty.
    InvalidLocation(String),
    /// Request contact name is empty.
    InvalidContact(String),
    /// A persisted status string could not be parsed.
    InvalidStatus {
        /// Which status domain was being parsed.
        entity: &'static str,
        /// The offending value.
        value: String,
    },
}

impl DomainError {
    /// Classifies this error for callers deciding how to react.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::VolunteerNotFound(_) | Self::RequestNotFound(_) | Self::AssignmentNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InvalidAssignmentTransition { .. }
            | Self::InvalidVolunteerTransition { .. }
            | Self::InvalidRequestTransition { .. } => ErrorKind::InvalidState,
            Self::VolunteerUnavailable { .. }
            | Self::VolunteerAlreadyCommitted { .. }
            | Self::RequestClosed { .. }
            | Self::RequestFull { .. }
            | Self::RequestHasActiveAssignments { .. }
            | Self::DuplicatePhone(_) => ErrorKind::Conflict,
            Self::InvalidName(_)
            | Self::InvalidPhone(_)
            | Self::InvalidMemberCount(_)
            | Self::InvalidRequiredVolunteers(_)
            | Self::InvalidLocation(_)
            | Self::InvalidContact(_)
            | Self::InvalidStatus { .. } => ErrorKind::InvalidInput,
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VolunteerNotFound(id) => write!(f, "Volunteer {id} not found"),
            Self::RequestNotFound(id) => write!(f, "Request {id} not found"),
            Self::AssignmentNotFound(id) => write!(f, "Assignment {id} not found"),
            Self::InvalidAssignmentTransition {
                assignment_id,
                from,
                to,
            } => {
                write!(
                    f,
                    "Assignment {assignment_id} cannot move from '{from}' to '{to}'"
                )
            }
            Self::InvalidVolunteerTransition {
                volunteer_id,
                from,
                to,
            } => {
                write!(
                    f,
                    "Volunteer {volunteer_id} cannot move from '{from}' to '{to}'"
                )
            }
            Self::InvalidRequestTransition {
                request_id,
                from,
                to,
            } => {
                write!(f, "Request {request_id} cannot move from '{from}' to '{to}'")
            }
            Self::VolunteerUnavailable {
                volunteer_id,
                status,
            } => {
                write!(
                    f,
                    "Volunteer {volunteer_id} is not available for work (status '{status}')"
                )
            }
            Self::VolunteerAlreadyCommitted {
                volunteer_id,
                assignment_id,
            } => {
                write!(
                    f,
                    "Volunteer {volunteer_id} is already committed to assignment {assignment_id}"
                )
            }
            Self::RequestClosed { request_id, status } => {
                write!(
                    f,
                    "Request {request_id} is closed (status '{status}') and accepts no more volunteers"
                )
            }
            Self::RequestFull {
                request_id,
                committed,
                required,
            } => {
                write!(
                    f,
                    "Request {request_id} is already full ({committed} of {required} committed)"
                )
            }
            Self::RequestHasActiveAssignments { request_id, active } => {
                write!(
                    f,
                    "Request {request_id} still has {active} active assignment(s)"
                )
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidPhone(msg) => write!(f, "Invalid phone: {msg}"),
            Self::DuplicatePhone(phone) => {
                write!(f, "A volunteer with phone '{phone}' is already registered")
            }
            Self::InvalidMemberCount(count) => {
                write!(
                    f,
                    "Invalid member count: {count}. Must be between 1 and {MAX_HEADCOUNT}"
                )
            }
            Self::InvalidRequiredVolunteers(count) => {
                write!(
                    f,
                    "Invalid required volunteer count: {count}. Must be between 1 and {MAX_HEADCOUNT}"
                )
            }
            Self::InvalidLocation(msg) => write!(f, "Invalid location: {msg}"),
            Self::InvalidContact(msg) => write!(f, "Invalid contact: {msg}"),
            Self::InvalidStatus { entity, value } => {
                write!(f, "Invalid {entity} status: '{value}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
