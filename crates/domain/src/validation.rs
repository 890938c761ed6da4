// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::request::NewDisasterRequest;
use crate::volunteer::{NewVolunteer, Volunteer};

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// Largest member count or required volunteer count that can be stored.
pub const MAX_HEADCOUNT: u32 = i32::MAX.unsigned_abs();

/// Normalizes a phone number for storage and uniqueness checks.
///
/// Spaces, dashes, dots and parentheses are removed. A leading `+` is kept.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    let trimmed: &str = phone.trim();
    let (prefix, rest): (&str, &str) = trimmed
        .strip_prefix('+')
        .map_or(("", trimmed), |rest| ("+", rest));

    let digits: String = rest
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    format!("{prefix}{digits}")
}

/// Validates a phone number.
///
/// # Errors
///
/// Returns `DomainError::InvalidPhone` if the normalized number is empty,
/// contains non-digits, or has an implausible length.
pub fn validate_phone(phone: &str) -> Result<(), DomainError> {
    let normalized: String = normalize_phone(phone);
    let digits: &str = normalized.strip_prefix('+').unwrap_or(&normalized);

    if digits.is_empty() {
        return Err(DomainError::InvalidPhone(String::from(
            "Phone cannot be empty",
        )));
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::InvalidPhone(format!(
            "Phone '{phone}' contains invalid characters"
        )));
    }

    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return Err(DomainError::InvalidPhone(format!(
            "Phone must have between {MIN_PHONE_DIGITS} and {MAX_PHONE_DIGITS} digits"
        )));
    }

    Ok(())
}

/// Validates a volunteer's registration fields.
///
/// This does NOT check phone uniqueness (that requires context).
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - The phone is malformed
/// - The member count is zero or above [`MAX_HEADCOUNT`]
/// - The initial status is a committed status
pub fn validate_new_volunteer(volunteer: &NewVolunteer) -> Result<(), DomainError> {
    if volunteer.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }

    validate_phone(&volunteer.phone)?;

    if let Some(count) = volunteer
        .member_count
        .filter(|count| !(1..=MAX_HEADCOUNT).contains(count))
    {
        return Err(DomainError::InvalidMemberCount(count));
    }

    if volunteer.status.is_committed() {
        return Err(DomainError::InvalidStatus {
            entity: "volunteer",
            value: volunteer.status.as_str().to_string(),
        });
    }

    Ok(())
}

/// Validates that a phone number is not already registered.
///
/// # Errors
///
/// Returns `DomainError::DuplicatePhone` if any existing volunteer has the
/// same normalized phone.
pub fn validate_phone_unique(phone: &str, existing: &[Volunteer]) -> Result<(), DomainError> {
    let normalized: String = normalize_phone(phone);
    if existing.iter().any(|v| normalize_phone(&v.phone) == normalized) {
        return Err(DomainError::DuplicatePhone(normalized));
    }
    Ok(())
}

/// Validates a disaster request's fields.
///
/// # Errors
///
/// Returns an error if:
/// - The location is empty
/// - The contact name is empty
/// - The contact phone is malformed
/// - The required volunteer count is zero or above [`MAX_HEADCOUNT`]
pub fn validate_new_request(request: &NewDisasterRequest) -> Result<(), DomainError> {
    if request.location.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Location cannot be empty",
        )));
    }

    if request.contact_name.trim().is_empty() {
        return Err(DomainError::InvalidContact(String::from(
            "Contact name cannot be empty",
        )));
    }

    validate_phone(&request.contact_phone)?;

    if !(1..=MAX_HEADCOUNT).contains(&request.required_volunteers) {
        return Err(DomainError::InvalidRequiredVolunteers(
            request.required_volunteers,
        ));
    }

    Ok(())
}
