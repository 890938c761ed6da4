// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use relief_domain::{DomainError, Volunteer, VolunteerStatus};

use crate::diesel_schema::volunteers;
use crate::error::PersistenceError;
use crate::queries::{count_from_db, status_from_db};

/// Diesel Queryable struct for volunteer rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = volunteers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct VolunteerRow {
    volunteer_id: i64,
    name: String,
    phone: String,
    member_count: Option<i32>,
    status: String,
}

impl VolunteerRow {
    fn into_domain(self) -> Result<Volunteer, PersistenceError> {
        let member_count: Option<u32> = self
            .member_count
            .map(|count| count_from_db(count, "member_count"))
            .transpose()?;

        Ok(Volunteer {
            volunteer_id: self.volunteer_id,
            name: self.name,
            phone: self.phone,
            member_count,
            status: status_from_db(&self.status)?,
        })
    }
}

/// Retrieves a volunteer by id.
///
/// # Errors
///
/// Returns `DomainError::VolunteerNotFound` (wrapped) if no such volunteer
/// exists, or a database error.
pub fn get_volunteer(
    conn: &mut SqliteConnection,
    volunteer_id: i64,
) -> Result<Volunteer, PersistenceError> {
    volunteers::table
        .filter(volunteers::volunteer_id.eq(volunteer_id))
        .select(VolunteerRow::as_select())
        .first::<VolunteerRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::domain(DomainError::VolunteerNotFound(volunteer_id)))?
        .into_domain()
}

/// Finds a volunteer by normalized phone number.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_volunteer_by_phone(
    conn: &mut SqliteConnection,
    phone: &str,
) -> Result<Option<Volunteer>, PersistenceError> {
    volunteers::table
        .filter(volunteers::phone.eq(phone))
        .select(VolunteerRow::as_select())
        .first::<VolunteerRow>(conn)
        .optional()?
        .map(VolunteerRow::into_domain)
        .transpose()
}

/// Lists volunteers ordered by id, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_volunteers(
    conn: &mut SqliteConnection,
    status: Option<VolunteerStatus>,
) -> Result<Vec<Volunteer>, PersistenceError> {
    let mut query = volunteers::table
        .select(VolunteerRow::as_select())
        .order(volunteers::volunteer_id.asc())
        .into_boxed();

    if let Some(status) = status {
        query = query.filter(volunteers::status.eq(status.as_str()));
    }

    query
        .load::<VolunteerRow>(conn)?
        .into_iter()
        .map(VolunteerRow::into_domain)
        .collect()
}
