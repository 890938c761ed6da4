// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for the persistence layer.
//!
//! This module contains all read-only queries.
//!
//! ## Module Organization
//!
//! - `volunteers`: Volunteer lookups and listings
//! - `requests`: Disaster request lookups and listings
//! - `assignments`: Assignment lookups by id, request, and volunteer
//! - `audit`: Audit event and timeline queries
//! - `state`: Loading the scoped state a transition reads

pub mod assignments;
pub mod audit;
pub mod requests;
pub mod state;
pub mod volunteers;

use std::str::FromStr;

use num_traits::ToPrimitive;
use relief_domain::DomainError;

use crate::error::PersistenceError;

/// Converts a stored `INTEGER` count into a domain count.
pub(crate) fn count_from_db(value: i32, field: &str) -> Result<u32, PersistenceError> {
    value.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("{field} out of range: {value}"))
    })
}

/// Converts a domain count into a stored `INTEGER`.
pub(crate) fn count_to_db(value: u32, field: &str) -> Result<i32, PersistenceError> {
    value.to_i32().ok_or_else(|| {
        PersistenceError::SerializationError(format!("{field} out of range: {value}"))
    })
}

/// Parses a stored status column.
pub(crate) fn status_from_db<T>(value: &str) -> Result<T, PersistenceError>
where
    T: FromStr<Err = DomainError>,
{
    T::from_str(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}
