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
    clippy::all
)]

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change:
/// an administrator, a volunteer acting for themselves, or the system
/// re-running the closure trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "volunteer", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
///
/// A cause describes why a state change was initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., an HTTP request id).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`ApplyAssignment`", "`CloseRequest`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of the entities touched by a transition.
///
/// The data is an opaque serialized form (JSON in practice) of the
/// assignment, volunteer, and request involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// The entities an audit event pertains to.
///
/// Assignment transitions carry all three ids. Request-level and
/// volunteer-level operations carry only their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuditScope {
    /// The request affected, if any.
    pub request_id: Option<i64>,
    /// The volunteer affected, if any.
    pub volunteer_id: Option<i64>,
    /// The assignment affected, if any. `None` until the assignment is persisted.
    pub assignment_id: Option<i64>,
}

impl AuditScope {
    /// Creates a scope covering only a request.
    #[must_use]
    pub const fn request(request_id: i64) -> Self {
        Self {
            request_id: Some(request_id),
            volunteer_id: None,
            assignment_id: None,
        }
    }

    /// Creates a scope covering only a volunteer.
    #[must_use]
    pub const fn volunteer(volunteer_id: i64) -> Self {
        Self {
            request_id: None,
            volunteer_id: Some(volunteer_id),
            assignment_id: None,
        }
    }

    /// Creates a scope covering an assignment and both of its parents.
    #[must_use]
    pub const fn assignment(
        request_id: i64,
        volunteer_id: i64,
        assignment_id: Option<i64>,
    ) -> Self {
        Self {
            request_id: Some(request_id),
            volunteer_id: Some(volunteer_id),
            assignment_id,
        }
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful state change must produce exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before the transition (before)
/// - The state after the transition (after)
/// - Which entities were touched (scope)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The persisted id. `None` before the event is stored.
    pub event_id: Option<i64>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// The entities this event pertains to.
    pub scope: AuditScope,
    /// RFC 3339 timestamp of the transition.
    pub recorded_at: String,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    /// * `scope` - The entities touched
    /// * `recorded_at` - When the transition happened
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        scope: AuditScope,
        recorded_at: String,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            scope,
            recorded_at,
        }
    }

    /// Returns this event with its assignment id filled in.
    ///
    /// Used when the assignment row is inserted in the same transaction
    /// that records the event.
    #[must_use]
    pub const fn with_assignment_id(mut self, assignment_id: i64) -> Self {
        self.scope.assignment_id = Some(assignment_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_event(action_name: &str, scope: AuditScope) -> AuditEvent {
        AuditEvent::new(
            Actor::new(String::from("admin-1"), String::from("admin")),
            Cause::new(String::from("req-456"), String::from("Dispatcher action")),
            Action::new(String::from(action_name), None),
            StateSnapshot::new(String::from("before-state")),
            StateSnapshot::new(String::from("after-state")),
            scope,
            String::from("2026-03-01T12:00:00Z"),
        )
    }

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("admin-1"), String::from("admin"));

        assert_eq!(actor.id, "admin-1");
        assert_eq!(actor.actor_type, "admin");
    }

    #[test]
    fn test_action_creation_with_details() {
        let action: Action = Action::new(
            String::from("RejectAssignment"),
            Some(String::from("volunteer could not travel")),
        );

        assert_eq!(action.name, "RejectAssignment");
        assert_eq!(
            action.details,
            Some(String::from("volunteer could not travel"))
        );
    }

    #[test]
    fn test_request_scope_has_no_volunteer() {
        let scope: AuditScope = AuditScope::request(4);

        assert_eq!(scope.request_id, Some(4));
        assert_eq!(scope.volunteer_id, None);
        assert_eq!(scope.assignment_id, None);
    }

    #[test]
    fn test_volunteer_scope_has_no_request() {
        let scope: AuditScope = AuditScope::volunteer(8);

        assert_eq!(scope.request_id, None);
        assert_eq!(scope.volunteer_id, Some(8));
    }

    #[test]
    fn test_new_event_is_unpersisted() {
        let event: AuditEvent =
            create_event("ConfirmAssignment", AuditScope::assignment(1, 2, Some(3)));

        assert_eq!(event.event_id, None);
        assert_eq!(event.scope.assignment_id, Some(3));
        assert_eq!(event.recorded_at, "2026-03-01T12:00:00Z");
    }

    #[test]
    fn test_with_assignment_id_fills_scope() {
        let event: AuditEvent = create_event("ApplyAssignment", AuditScope::assignment(1, 2, None))
            .with_assignment_id(9);

        assert_eq!(event.scope.assignment_id, Some(9));
        assert_eq!(event.scope.volunteer_id, Some(2));
        assert_eq!(event.scope.request_id, Some(1));
    }

    #[test]
    fn test_audit_event_equality() {
        let event1: AuditEvent = create_event("CompleteAssignment", AuditScope::request(1));
        let event2: AuditEvent = create_event("CompleteAssignment", AuditScope::request(1));
        let event3: AuditEvent = create_event("CancelAssignment", AuditScope::request(1));

        assert_eq!(event1, event2);
        assert_ne!(event1, event3);
    }
}
