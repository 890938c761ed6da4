// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use relief::CoreError;
use relief_domain::{DomainError, ErrorKind, MAX_HEADCOUNT};
use relief_persistence::PersistenceError;
use thiserror::Error;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every variant maps to exactly one wire `kind` so callers can decide
/// whether to re-fetch, correct their input, or give up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A referenced volunteer, request, assignment, or event does not exist.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The current status does not permit the operation.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// A human-readable description of the rejected transition.
        message: String,
    },
    /// A capacity or exclusivity rule rejected the operation.
    #[error("Conflict ({rule}): {message}")]
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the wire representation of this error's kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ResourceNotFound { .. } => ErrorKind::NotFound.as_str(),
            Self::InvalidState { .. } => ErrorKind::InvalidState.as_str(),
            Self::Conflict { .. } => ErrorKind::Conflict.as_str(),
            Self::InvalidInput { .. } => ErrorKind::InvalidInput.as_str(),
            Self::Internal { .. } => "internal",
        }
    }
}

fn conflict(rule: &str, err: &DomainError) -> ApiError {
    ApiError::Conflict {
        rule: String::from(rule),
        message: err.to_string(),
    }
}

fn invalid_input(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: String::from(field),
        message,
    }
}

fn not_found(resource_type: &str, err: &DomainError) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from(resource_type),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// # Arguments
///
/// * `err` - The domain error to translate
///
/// # Returns
///
/// The API error carrying the same kind as `err.kind()`.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::VolunteerNotFound(_) => not_found("Volunteer", &err),
        DomainError::RequestNotFound(_) => not_found("Request", &err),
        DomainError::AssignmentNotFound(_) => not_found("Assignment", &err),
        DomainError::InvalidAssignmentTransition { .. }
        | DomainError::InvalidVolunteerTransition { .. }
        | DomainError::InvalidRequestTransition { .. } => ApiError::InvalidState {
            message: err.to_string(),
        },
        DomainError::VolunteerUnavailable { .. } => conflict("volunteer_available", &err),
        DomainError::VolunteerAlreadyCommitted { .. } => conflict("one_active_assignment", &err),
        DomainError::RequestClosed { .. } => conflict("request_open", &err),
        DomainError::RequestFull { .. } => conflict("request_capacity", &err),
        DomainError::RequestHasActiveAssignments { .. } => conflict("no_active_assignments", &err),
        DomainError::DuplicatePhone(_) => conflict("unique_phone", &err),
        DomainError::InvalidName(msg) => invalid_input("name", msg),
        DomainError::InvalidPhone(msg) => invalid_input("phone", msg),
        DomainError::InvalidMemberCount(count) => invalid_input(
            "member_count",
            format!("Member count must be between 1 and {MAX_HEADCOUNT}, got {count}"),
        ),
        DomainError::InvalidRequiredVolunteers(count) => invalid_input(
            "required_volunteers",
            format!("Required volunteers must be between 1 and {MAX_HEADCOUNT}, got {count}"),
        ),
        DomainError::InvalidLocation(msg) => invalid_input("location", msg),
        DomainError::InvalidContact(msg) => invalid_input("contact_name", msg),
        DomainError::InvalidStatus { entity, value } => invalid_input(
            "status",
            format!("'{value}' is not a valid {entity} status"),
        ),
    }
}

/// Translates a core error into an API error.
///
/// # Arguments
///
/// * `err` - The core error to translate
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Rejected operations surface their domain error. Storage failures become
/// `Internal` and keep their detail out of the message.
///
/// # Arguments
///
/// * `err` - The persistence error to translate
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::TransitionRejected(core_err) => translate_core_error(core_err),
        PersistenceError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Audit event"),
            message: format!("Audit event {event_id} not found"),
        },
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        other => {
            tracing::error!(error = %other, "Persistence failure");
            ApiError::Internal {
                message: String::from("The operation could not be completed"),
            }
        }
    }
}
