// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod closure;
mod command;
mod error;
mod policy;
mod state;

#[cfg(test)]
mod tests;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// Re-export public types and functions
pub use apply::{apply, reevaluate, set_availability, withdraw};
pub use closure::{ClosureOutcome, derive_request_status, derive_volunteer_status, evaluate_closure};
pub use command::Command;
pub use error::CoreError;
pub use policy::ApplyPolicy;
pub use state::{RequestState, RequestTransition, State, TransitionResult, VolunteerTransition};

/// Returns the current UTC time as an RFC 3339 string.
///
/// Transitions take the timestamp as an argument so they stay pure; callers
/// obtain it here once per operation.
///
/// # Errors
///
/// Returns `CoreError::Internal` if the timestamp cannot be formatted.
pub fn current_timestamp() -> Result<String, CoreError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| CoreError::Internal(format!("Failed to format timestamp: {e}")))
}
