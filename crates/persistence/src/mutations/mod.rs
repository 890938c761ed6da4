// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Mutations use Diesel DSL, with `last_insert_rowid()` reached through the
//! `PersistenceBackend` trait.
//!
//! ## Module Organization
//!
//! - `entities`: Volunteer and request rows
//! - `assignments`: Assignment rows
//! - `audit`: Audit event persistence
//! - `transition`: Writing a whole transition result in one go
//!
//! None of these open a transaction. Callers in `lib.rs` wrap each
//! operation in a single `BEGIN IMMEDIATE` transaction.

pub mod assignments;
pub mod audit;
pub mod entities;
pub mod transition;

pub use entities::{insert_request, insert_volunteer};
pub use transition::{
    persist_request_transition, persist_transition, persist_volunteer_transition,
};
