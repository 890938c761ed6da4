// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use relief_domain::{DisasterRequest, DomainError, RequestStatus};

use crate::diesel_schema::disaster_requests;
use crate::error::PersistenceError;
use crate::queries::{count_from_db, status_from_db};

/// Diesel Queryable struct for disaster request rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = disaster_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct RequestRow {
    request_id: i64,
    location: String,
    description: Option<String>,
    contact_name: String,
    contact_phone: String,
    required_volunteers: i32,
    status: String,
    created_at: String,
}

impl RequestRow {
    fn into_domain(self) -> Result<DisasterRequest, PersistenceError> {
        Ok(DisasterRequest {
            request_id: self.request_id,
            location: self.location,
            description: self.description,
            contact_name: self.contact_name,
            contact_phone: self.contact_phone,
            required_volunteers: count_from_db(self.required_volunteers, "required_volunteers")?,
            status: status_from_db(&self.status)?,
            created_at: self.created_at,
        })
    }
}

/// Retrieves a disaster request by id.
///
/// # Errors
///
/// Returns `DomainError::RequestNotFound` (wrapped) if no such request
/// exists, or a database error.
pub fn get_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<DisasterRequest, PersistenceError> {
    disaster_requests::table
        .filter(disaster_requests::request_id.eq(request_id))
        .select(RequestRow::as_select())
        .first::<RequestRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::domain(DomainError::RequestNotFound(request_id)))?
        .into_domain()
}

/// Lists requests ordered by id, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_requests(
    conn: &mut SqliteConnection,
    status: Option<RequestStatus>,
) -> Result<Vec<DisasterRequest>, PersistenceError> {
    let mut query = disaster_requests::table
        .select(RequestRow::as_select())
        .order(disaster_requests::request_id.asc())
        .into_boxed();

    if let Some(status) = status {
        query = query.filter(disaster_requests::status.eq(status.as_str()));
    }

    query
        .load::<RequestRow>(conn)?
        .into_iter()
        .map(RequestRow::into_domain)
        .collect()
}

/// Lists requests that still accept volunteers (`pending` or `in_progress`).
///
/// Capacity is not applied here; callers combine this with assignment rows.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_open_requests(
    conn: &mut SqliteConnection,
) -> Result<Vec<DisasterRequest>, PersistenceError> {
    disaster_requests::table
        .filter(disaster_requests::status.eq_any([
            RequestStatus::Pending.as_str(),
            RequestStatus::InProgress.as_str(),
        ]))
        .select(RequestRow::as_select())
        .order(disaster_requests::request_id.asc())
        .load::<RequestRow>(conn)?
        .into_iter()
        .map(RequestRow::into_domain)
        .collect()
}
