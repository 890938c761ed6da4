// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment row mutations.
//!
//! Assignment rows are never deleted. A transition rewrites the status,
//! its timestamps, and the rejection reason in place.

use diesel::SqliteConnection;
use diesel::prelude::*;
use relief_domain::{Assignment, DomainError};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::assignments;
use crate::error::PersistenceError;
use crate::queries::count_to_db;

/// Inserts a new assignment row.
///
/// # Returns
///
/// The assignment id assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the volunteer
/// already holds an active assignment.
pub fn insert_assignment(
    conn: &mut SqliteConnection,
    assignment: &Assignment,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(assignments::table)
        .values((
            assignments::volunteer_id.eq(assignment.volunteer_id),
            assignments::request_id.eq(assignment.request_id),
            assignments::headcount.eq(count_to_db(assignment.headcount, "headcount")?),
            assignments::status.eq(assignment.status.as_str()),
            assignments::assigned_at.eq(&assignment.assigned_at),
            assignments::confirmed_at.eq(&assignment.confirmed_at),
            assignments::completed_at.eq(&assignment.completed_at),
            assignments::cancelled_at.eq(&assignment.cancelled_at),
            assignments::rejection_reason.eq(&assignment.rejection_reason),
        ))
        .execute(conn)?;

    conn.get_last_insert_rowid()
}

/// Rewrites the mutable columns of an existing assignment.
///
/// # Errors
///
/// Returns a wrapped `AssignmentNotFound` if no row was updated, or a
/// database error.
pub fn update_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
    assignment: &Assignment,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(assignments::table)
        .filter(assignments::assignment_id.eq(assignment_id))
        .set((
            assignments::status.eq(assignment.status.as_str()),
            assignments::confirmed_at.eq(&assignment.confirmed_at),
            assignments::completed_at.eq(&assignment.completed_at),
            assignments::cancelled_at.eq(&assignment.cancelled_at),
            assignments::rejection_reason.eq(&assignment.rejection_reason),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::domain(DomainError::AssignmentNotFound(
            assignment_id,
        )));
    }
    Ok(())
}
