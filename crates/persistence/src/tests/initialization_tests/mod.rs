// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other test module opens an in-memory database, so connection
//! setup and migrations are exercised implicitly. These cover the parts
//! the others take for granted.

use diesel::RunQueryDsl;
use relief::ApplyPolicy;

use super::{create_request, create_test_persistence, register};
use crate::{Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = create_test_persistence();
    let mut db2: Persistence = create_test_persistence();

    register(&mut db1, 1, None);

    assert_eq!(db1.list_volunteers(None).unwrap().len(), 1);
    assert!(db2.list_volunteers(None).unwrap().is_empty());
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence: Persistence = create_test_persistence();

    assert!(persistence.list_volunteers(None).is_ok());
    assert!(persistence.list_requests(None).is_ok());
    assert_eq!(persistence.count_audit_events().unwrap(), 0);
}

#[test]
fn test_foreign_key_enforcement_enabled() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_foreign_keys_reject_orphan_assignment() {
    let mut persistence: Persistence = create_test_persistence();

    let result = diesel::sql_query(
        "INSERT INTO assignments (volunteer_id, request_id, headcount, status, assigned_at) \
         VALUES (99, 99, 1, 'pending', '2026-03-01T12:00:00Z')",
    )
    .execute(&mut persistence.conn);

    assert!(result.is_err());
}

#[test]
fn test_one_active_assignment_index() {
    let mut persistence: Persistence = create_test_persistence();
    let volunteer = register(&mut persistence, 1, None);
    let first = create_request(&mut persistence, 2);
    let second = create_request(&mut persistence, 2);

    let insert = |request_id: i64| {
        format!(
            "INSERT INTO assignments (volunteer_id, request_id, headcount, status, assigned_at) \
             VALUES ({}, {request_id}, 1, 'pending', '2026-03-01T12:00:00Z')",
            volunteer.volunteer_id
        )
    };

    diesel::sql_query(insert(first.request_id))
        .execute(&mut persistence.conn)
        .unwrap();
    let result = diesel::sql_query(insert(second.request_id)).execute(&mut persistence.conn);

    assert!(result.is_err(), "the store itself refuses a second active row");
}

#[test]
fn test_file_database_initializes() {
    let path = std::env::temp_dir().join(format!(
        "relief-init-test-{}.sqlite3",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        register(&mut persistence, 1, None);
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.list_volunteers(None).unwrap().len(), 1);

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_apply_policy_defaults_to_dispatched() {
    let persistence: Persistence = create_test_persistence();
    assert_eq!(persistence.apply_policy(), ApplyPolicy::Dispatched);

    let persistence: Persistence = persistence.with_apply_policy(ApplyPolicy::SelfService);
    assert_eq!(persistence.apply_policy(), ApplyPolicy::SelfService);
}
