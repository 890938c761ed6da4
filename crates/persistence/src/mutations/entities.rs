// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Volunteer and request mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use relief_domain::{
    DisasterRequest, DomainError, NewDisasterRequest, NewVolunteer, RequestStatus, Volunteer,
    VolunteerStatus,
};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{disaster_requests, volunteers};
use crate::error::PersistenceError;
use crate::queries::count_to_db;

/// Inserts a volunteer row.
///
/// The phone number must already be normalized. A unique-constraint
/// violation on the phone column is reported as `DuplicatePhone`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `volunteer` - The validated volunteer to insert
///
/// # Returns
///
/// The stored volunteer with its assigned id.
///
/// # Errors
///
/// Returns an error if the phone is taken or the insert fails.
pub fn insert_volunteer(
    conn: &mut SqliteConnection,
    volunteer: &NewVolunteer,
) -> Result<Volunteer, PersistenceError> {
    let member_count: Option<i32> = volunteer
        .member_count
        .map(|count| count_to_db(count, "member_count"))
        .transpose()?;

    let inserted: QueryResult<usize> = diesel::insert_into(volunteers::table)
        .values((
            volunteers::name.eq(&volunteer.name),
            volunteers::phone.eq(&volunteer.phone),
            volunteers::member_count.eq(member_count),
            volunteers::status.eq(volunteer.status.as_str()),
        ))
        .execute(conn);

    match inserted {
        Ok(_) => {}
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(PersistenceError::domain(DomainError::DuplicatePhone(
                volunteer.phone.clone(),
            )));
        }
        Err(e) => return Err(e.into()),
    }

    let volunteer_id: i64 = conn.get_last_insert_rowid()?;
    debug!(volunteer_id, phone = %volunteer.phone, "Inserted volunteer");

    Ok(Volunteer {
        volunteer_id,
        name: volunteer.name.clone(),
        phone: volunteer.phone.clone(),
        member_count: volunteer.member_count,
        status: volunteer.status,
    })
}

/// Inserts a disaster request row in `pending` status.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `request` - The validated request to insert
/// * `created_at` - RFC 3339 creation timestamp
///
/// # Returns
///
/// The stored request with its assigned id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_request(
    conn: &mut SqliteConnection,
    request: &NewDisasterRequest,
    created_at: &str,
) -> Result<DisasterRequest, PersistenceError> {
    diesel::insert_into(disaster_requests::table)
        .values((
            disaster_requests::location.eq(&request.location),
            disaster_requests::description.eq(&request.description),
            disaster_requests::contact_name.eq(&request.contact_name),
            disaster_requests::contact_phone.eq(&request.contact_phone),
            disaster_requests::required_volunteers.eq(count_to_db(
                request.required_volunteers,
                "required_volunteers",
            )?),
            disaster_requests::status.eq(RequestStatus::Pending.as_str()),
            disaster_requests::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let request_id: i64 = conn.get_last_insert_rowid()?;
    debug!(request_id, location = %request.location, "Inserted request");

    Ok(DisasterRequest {
        request_id,
        location: request.location.clone(),
        description: request.description.clone(),
        contact_name: request.contact_name.clone(),
        contact_phone: request.contact_phone.clone(),
        required_volunteers: request.required_volunteers,
        status: RequestStatus::Pending,
        created_at: created_at.to_string(),
    })
}

/// Writes a volunteer's status.
///
/// # Errors
///
/// Returns a wrapped `VolunteerNotFound` if no row was updated, or a
/// database error.
pub fn update_volunteer_status(
    conn: &mut SqliteConnection,
    volunteer_id: i64,
    status: VolunteerStatus,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(volunteers::table)
        .filter(volunteers::volunteer_id.eq(volunteer_id))
        .set(volunteers::status.eq(status.as_str()))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::domain(DomainError::VolunteerNotFound(
            volunteer_id,
        )));
    }
    Ok(())
}

/// Writes a request's status.
///
/// # Errors
///
/// Returns a wrapped `RequestNotFound` if no row was updated, or a
/// database error.
pub fn update_request_status(
    conn: &mut SqliteConnection,
    request_id: i64,
    status: RequestStatus,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(disaster_requests::table)
        .filter(disaster_requests::request_id.eq(request_id))
        .set(disaster_requests::status.eq(status.as_str()))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::domain(DomainError::RequestNotFound(
            request_id,
        )));
    }
    Ok(())
}
