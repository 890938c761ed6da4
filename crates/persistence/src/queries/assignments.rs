// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use relief_domain::{Assignment, AssignmentStatus, DomainError};

use crate::diesel_schema::assignments;
use crate::error::PersistenceError;
use crate::queries::{count_from_db, status_from_db};

/// Diesel Queryable struct for assignment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = assignments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct AssignmentRow {
    assignment_id: i64,
    volunteer_id: i64,
    request_id: i64,
    headcount: i32,
    status: String,
    assigned_at: String,
    confirmed_at: Option<String>,
    completed_at: Option<String>,
    cancelled_at: Option<String>,
    rejection_reason: Option<String>,
}

impl AssignmentRow {
    fn into_domain(self) -> Result<Assignment, PersistenceError> {
        Ok(Assignment {
            assignment_id: Some(self.assignment_id),
            volunteer_id: self.volunteer_id,
            request_id: self.request_id,
            headcount: count_from_db(self.headcount, "headcount")?,
            status: status_from_db(&self.status)?,
            assigned_at: self.assigned_at,
            confirmed_at: self.confirmed_at,
            completed_at: self.completed_at,
            cancelled_at: self.cancelled_at,
            rejection_reason: self.rejection_reason,
        })
    }
}

fn load_rows(rows: Vec<AssignmentRow>) -> Result<Vec<Assignment>, PersistenceError> {
    rows.into_iter().map(AssignmentRow::into_domain).collect()
}

/// Retrieves an assignment by id.
///
/// # Errors
///
/// Returns `DomainError::AssignmentNotFound` (wrapped) if no such
/// assignment exists, or a database error.
pub fn get_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<Assignment, PersistenceError> {
    assignments::table
        .filter(assignments::assignment_id.eq(assignment_id))
        .select(AssignmentRow::as_select())
        .first::<AssignmentRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::domain(DomainError::AssignmentNotFound(assignment_id)))?
        .into_domain()
}

/// Retrieves every assignment on a request, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn assignments_for_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = assignments::table
        .filter(assignments::request_id.eq(request_id))
        .select(AssignmentRow::as_select())
        .order(assignments::assignment_id.asc())
        .load(conn)?;
    load_rows(rows)
}

/// Retrieves every assignment a volunteer has held, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn assignments_for_volunteer(
    conn: &mut SqliteConnection,
    volunteer_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = assignments::table
        .filter(assignments::volunteer_id.eq(volunteer_id))
        .select(AssignmentRow::as_select())
        .order(assignments::assignment_id.asc())
        .load(conn)?;
    load_rows(rows)
}

/// Retrieves a volunteer's `pending` and `confirmed` assignments.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn active_assignments_for_volunteer(
    conn: &mut SqliteConnection,
    volunteer_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = assignments::table
        .filter(assignments::volunteer_id.eq(volunteer_id))
        .filter(assignments::status.eq_any([
            AssignmentStatus::Pending.as_str(),
            AssignmentStatus::Confirmed.as_str(),
        ]))
        .select(AssignmentRow::as_select())
        .order(assignments::assignment_id.asc())
        .load(conn)?;
    load_rows(rows)
}
