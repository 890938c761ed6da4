// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the relief assignment coordinator.
//!
//! This crate stores volunteers, disaster requests, assignments, and the
//! audit trail in `SQLite` through Diesel.
//!
//! ## Transactions
//!
//! Every state-changing operation runs inside one `BEGIN IMMEDIATE`
//! transaction: the scoped state is loaded, the core transition function
//! decides, and the changed rows plus the audit event are written. A
//! rejection or a storage failure at any point rolls the whole operation
//! back, so callers never observe a half-applied transition.
//!
//! `BEGIN IMMEDIATE` takes the write lock up front. Two operations racing
//! for the last slot on a request are serialized; the second one sees the
//! first one's rows and is rejected by the capacity check.
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated in-memory databases
//! - Lock contention is exercised with one file database and a connection per thread
//! - Each `new_in_memory()` call gets its own shared-cache name
//! - Failure injection uses SQL triggers, never production hooks

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use relief::{
    ApplyPolicy, Command, RequestState, RequestTransition, State, TransitionResult,
    VolunteerTransition, current_timestamp,
};
use relief_audit::{Actor, AuditEvent, Cause};
use relief_domain::{
    Assignment, CapacityReport, DisasterRequest, NewDisasterRequest, NewVolunteer, RequestStatus,
    Volunteer, VolunteerStatus, evaluate_capacity, normalize_phone, validate_new_request,
    validate_new_volunteer, validate_phone_unique,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based collisions.
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// An open request together with its capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    /// The request.
    pub request: DisasterRequest,
    /// Committed headcount against the target.
    pub capacity: CapacityReport,
}

/// Persistence adapter for the relief store.
///
/// Owns a single `SQLite` connection. The server shares one adapter behind a
/// mutex, so operations on it never interleave.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    apply_policy: ApplyPolicy,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            apply_policy: ApplyPolicy::default(),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // Enable WAL mode for better read concurrency
        backend::sqlite::enable_wal_mode(&mut conn)?;

        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            apply_policy: ApplyPolicy::default(),
        })
    }

    /// Returns this adapter configured with the given apply policy.
    #[must_use]
    pub const fn with_apply_policy(mut self, policy: ApplyPolicy) -> Self {
        self.apply_policy = policy;
        self
    }

    /// Changes the apply policy used by subsequent `apply_assignment` calls.
    pub const fn set_apply_policy(&mut self, policy: ApplyPolicy) {
        self.apply_policy = policy;
    }

    /// The apply policy in effect.
    #[must_use]
    pub const fn apply_policy(&self) -> ApplyPolicy {
        self.apply_policy
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a volunteer.
    ///
    /// The phone number is normalized before it is checked for uniqueness
    /// and stored.
    ///
    /// # Errors
    ///
    /// Returns a wrapped domain error if a field is invalid or the phone is
    /// already registered, or a database error.
    pub fn register_volunteer(
        &mut self,
        volunteer: NewVolunteer,
    ) -> Result<Volunteer, PersistenceError> {
        validate_new_volunteer(&volunteer).map_err(PersistenceError::domain)?;

        let volunteer: NewVolunteer = NewVolunteer {
            name: volunteer.name.trim().to_string(),
            phone: normalize_phone(&volunteer.phone),
            ..volunteer
        };

        let stored: Volunteer = self.conn.immediate_transaction(|conn| {
            let existing: Option<Volunteer> =
                queries::volunteers::find_volunteer_by_phone(conn, &volunteer.phone)?;
            validate_phone_unique(&volunteer.phone, existing.as_slice())
                .map_err(PersistenceError::domain)?;
            mutations::insert_volunteer(conn, &volunteer)
        })?;

        info!(
            volunteer_id = stored.volunteer_id,
            headcount = stored.headcount(),
            "Registered volunteer"
        );
        Ok(stored)
    }

    /// Creates a disaster request in `pending` status.
    ///
    /// # Errors
    ///
    /// Returns a wrapped domain error if a field is invalid, or a database
    /// error.
    pub fn create_request(
        &mut self,
        request: NewDisasterRequest,
    ) -> Result<DisasterRequest, PersistenceError> {
        validate_new_request(&request).map_err(PersistenceError::domain)?;

        let request: NewDisasterRequest = NewDisasterRequest {
            location: request.location.trim().to_string(),
            contact_name: request.contact_name.trim().to_string(),
            contact_phone: normalize_phone(&request.contact_phone),
            ..request
        };
        let created_at: String = current_timestamp()?;

        let stored: DisasterRequest = self
            .conn
            .immediate_transaction(|conn| mutations::insert_request(conn, &request, &created_at))?;

        info!(
            request_id = stored.request_id,
            required_volunteers = stored.required_volunteers,
            "Created disaster request"
        );
        Ok(stored)
    }

    // ========================================================================
    // Assignment Transitions
    // ========================================================================

    /// Applies a volunteer to a request under the configured apply policy.
    ///
    /// # Errors
    ///
    /// Returns a wrapped domain error if the volunteer or request does not
    /// exist, the volunteer is off or already committed, or the request is
    /// closed or full.
    pub fn apply_assignment(
        &mut self,
        volunteer_id: i64,
        request_id: i64,
        actor: Actor,
        cause: Cause,
    ) -> Result<TransitionResult, PersistenceError> {
        self.execute_command(
            Command::Apply {
                volunteer_id,
                request_id,
            },
            actor,
            cause,
        )
    }

    /// Confirms a pending assignment.
    ///
    /// # Errors
    ///
    /// Returns a wrapped domain error if the assignment does not exist, is
    /// not pending, or its request is closed or full.
    pub fn confirm_assignment(
        &mut self,
        assignment_id: i64,
        actor: Actor,
        cause: Cause,
    ) -> Result<TransitionResult, PersistenceError> {
        self.execute_command(Command::Confirm { assignment_id }, actor, cause)
    }

    /// Rejects a pending assignment, recording an optional reason.
    ///
    /// # Errors
    ///
    /// Returns a wrapped domain error if the assignment does not exist or is
    /// not pending.
    pub fn reject_assignment(
        &mut self,
        assignment_id: i64,
        reason: Option<String>,
        actor: Actor,
        cause: Cause,
    ) -> Result<TransitionResult, PersistenceError> {
        self.execute_command(
            Command::Reject {
                assignment_id,
                reason,
            },
            actor,
            cause,
        )
    }

    /// Completes a confirmed assignment and runs the closure rule.
    ///
    /// # Errors
    ///
    /// Returns a wrapped domain error if the assignment does not exist or is
    /// not confirmed.
    pub fn complete_assignment(
        &mut self,
        assignment_id: i64,
        actor: Actor,
        cause: Cause,
    ) -> Result<TransitionResult, PersistenceError> {
        self.execute_command(Command::Complete { assignment_id }, actor, cause)
    }

    /// Cancels a pending or confirmed assignment.
    ///
    /// # Errors
    ///
    /// Returns a wrapped domain error if the assignment does not exist or is
    /// already terminal.
    pub fn cancel_assignment(
        &mut self,
        assignment_id: i64,
        actor: Actor,
        cause: Cause,
    ) -> Result<TransitionResult, PersistenceError> {
        self.execute_command(Command::Cancel { assignment_id }, actor, cause)
    }

    /// Runs one assignment command as a single transaction.
    fn execute_command(
        &mut self,
        command: Command,
        actor: Actor,
        cause: Cause,
    ) -> Result<TransitionResult, PersistenceError> {
        let policy: ApplyPolicy = self.apply_policy;
        let action: &'static str = command.action_name();
        let now: String = current_timestamp()?;

        let outcome: Result<TransitionResult, PersistenceError> =
            self.conn.immediate_transaction(|conn| {
                let state: State = queries::state::load_command_state(conn, &command)?;
                let result: TransitionResult =
                    relief::apply(&state, command, policy, actor, cause, &now)?;
                mutations::persist_transition(conn, result)
            });

        match outcome {
            Ok(result) => {
                info!(
                    action,
                    assignment_id = result.assignment.assignment_id,
                    volunteer_id = result.volunteer.volunteer_id,
                    request_id = result.request.request_id,
                    assignment_status = %result.assignment.status,
                    request_status = %result.request.status,
                    "Assignment transition committed"
                );
                if result.closure.closed() {
                    info!(request_id = result.request.request_id, "Request completed");
                }
                Ok(result)
            }
            Err(e) => {
                if e.domain_error().is_some() {
                    debug!(action, error = %e, "Assignment transition rejected");
                } else {
                    warn!(action, error = %e, "Assignment transition failed");
                }
                Err(e)
            }
        }
    }

    // ========================================================================
    // Request and Volunteer Operations
    // ========================================================================

    /// Re-runs the closure rule for a request.
    ///
    /// Safe to call any number of times. Every call records an audit event.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `RequestNotFound` if the request does not exist, or
    /// a database error.
    pub fn reevaluate_request(
        &mut self,
        request_id: i64,
        actor: Actor,
        cause: Cause,
    ) -> Result<RequestTransition, PersistenceError> {
        let now: String = current_timestamp()?;
        let result: RequestTransition = self.conn.immediate_transaction(|conn| {
            let state: RequestState = queries::state::load_request_state(conn, request_id)?;
            let result: RequestTransition = relief::reevaluate(&state, actor, cause, &now)?;
            mutations::persist_request_transition(conn, result)
        })?;

        info!(
            request_id,
            previous = %result.closure.previous,
            current = %result.closure.current,
            "Request reevaluated"
        );
        Ok(result)
    }

    /// Withdraws an open request that has no active assignments.
    ///
    /// # Errors
    ///
    /// Returns a wrapped domain error if the request does not exist, is
    /// already closed, or still has active assignments.
    pub fn withdraw_request(
        &mut self,
        request_id: i64,
        actor: Actor,
        cause: Cause,
    ) -> Result<RequestTransition, PersistenceError> {
        let now: String = current_timestamp()?;
        let result: RequestTransition = self.conn.immediate_transaction(|conn| {
            let state: RequestState = queries::state::load_request_state(conn, request_id)?;
            let result: RequestTransition = relief::withdraw(&state, actor, cause, &now)?;
            mutations::persist_request_transition(conn, result)
        })?;

        info!(request_id, "Request withdrawn");
        Ok(result)
    }

    /// Switches an uncommitted volunteer between `off` and `available`.
    ///
    /// # Errors
    ///
    /// Returns a wrapped domain error if the volunteer does not exist or is
    /// committed, or a database error.
    pub fn set_availability(
        &mut self,
        volunteer_id: i64,
        status: VolunteerStatus,
        actor: Actor,
        cause: Cause,
    ) -> Result<VolunteerTransition, PersistenceError> {
        let now: String = current_timestamp()?;
        let result: VolunteerTransition = self.conn.immediate_transaction(|conn| {
            let volunteer: Volunteer = queries::volunteers::get_volunteer(conn, volunteer_id)?;
            let result: VolunteerTransition =
                relief::set_availability(&volunteer, status, actor, cause, &now)?;
            mutations::persist_volunteer_transition(conn, result)
        })?;

        info!(volunteer_id, status = %status, "Volunteer availability changed");
        Ok(result)
    }

    /// Writes a request's status directly.
    ///
    /// This is the raw store write the coordinator uses internally. It does
    /// not consult the closure rule and records no audit event.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `RequestNotFound` if the request does not exist, or
    /// a database error.
    pub fn set_request_status(
        &mut self,
        request_id: i64,
        status: RequestStatus,
    ) -> Result<(), PersistenceError> {
        mutations::entities::update_request_status(&mut self.conn, request_id, status)?;
        debug!(request_id, status = %status, "Request status written");
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Retrieves a volunteer by id.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `VolunteerNotFound` if no such volunteer exists.
    pub fn get_volunteer(&mut self, volunteer_id: i64) -> Result<Volunteer, PersistenceError> {
        queries::volunteers::get_volunteer(&mut self.conn, volunteer_id)
    }

    /// Lists volunteers, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_volunteers(
        &mut self,
        status: Option<VolunteerStatus>,
    ) -> Result<Vec<Volunteer>, PersistenceError> {
        queries::volunteers::list_volunteers(&mut self.conn, status)
    }

    /// Lists every assignment a volunteer has held, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `VolunteerNotFound` if no such volunteer exists.
    pub fn list_volunteer_assignments(
        &mut self,
        volunteer_id: i64,
    ) -> Result<Vec<Assignment>, PersistenceError> {
        queries::volunteers::get_volunteer(&mut self.conn, volunteer_id)?;
        queries::assignments::assignments_for_volunteer(&mut self.conn, volunteer_id)
    }

    /// Retrieves a request by id.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `RequestNotFound` if no such request exists.
    pub fn get_request(&mut self, request_id: i64) -> Result<DisasterRequest, PersistenceError> {
        queries::requests::get_request(&mut self.conn, request_id)
    }

    /// Retrieves a request and every assignment on it.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `RequestNotFound` if no such request exists.
    pub fn get_request_with_assignments(
        &mut self,
        request_id: i64,
    ) -> Result<RequestState, PersistenceError> {
        queries::state::load_request_state(&mut self.conn, request_id)
    }

    /// Lists requests, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_requests(
        &mut self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<DisasterRequest>, PersistenceError> {
        queries::requests::list_requests(&mut self.conn, status)
    }

    /// Lists requests a volunteer could apply to: open and not yet full.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_open_requests(&mut self) -> Result<Vec<OpenRequest>, PersistenceError> {
        let requests: Vec<DisasterRequest> =
            queries::requests::list_open_requests(&mut self.conn)?;

        let mut open: Vec<OpenRequest> = Vec::with_capacity(requests.len());
        for request in requests {
            let assignments: Vec<Assignment> =
                queries::assignments::assignments_for_request(&mut self.conn, request.request_id)?;
            let capacity: CapacityReport = evaluate_capacity(&request, &assignments);
            if !capacity.is_full {
                open.push(OpenRequest { request, capacity });
            }
        }
        Ok(open)
    }

    /// Retrieves an assignment by id.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `AssignmentNotFound` if no such assignment exists.
    pub fn get_assignment(&mut self, assignment_id: i64) -> Result<Assignment, PersistenceError> {
        queries::assignments::get_assignment(&mut self.conn, assignment_id)
    }

    // ========================================================================
    // Audit Event Queries
    // ========================================================================

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Retrieves the audit timeline of a request, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `RequestNotFound` if the request does not exist, or
    /// an error if events cannot be deserialized.
    pub fn get_audit_timeline(
        &mut self,
        request_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::requests::get_request(&mut self.conn, request_id)?;
        queries::audit::get_audit_timeline(&mut self.conn, request_id)
    }

    /// Retrieves every audit event touching a volunteer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `VolunteerNotFound` if the volunteer does not exist,
    /// or an error if events cannot be deserialized.
    pub fn get_volunteer_timeline(
        &mut self,
        volunteer_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::volunteers::get_volunteer(&mut self.conn, volunteer_id)?;
        queries::audit::get_volunteer_timeline(&mut self.conn, volunteer_id)
    }

    /// Counts all stored audit events.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_audit_events(&mut self) -> Result<i64, PersistenceError> {
        queries::audit::count_audit_events(&mut self.conn)
    }
}
