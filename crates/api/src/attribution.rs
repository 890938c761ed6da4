// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attribution of state-changing calls.
//!
//! Every mutating call names who is acting and why. Attribution is recorded
//! in the audit trail and is not an authorization check: any caller may
//! invoke any operation.

use relief_audit::{Actor, Cause};

use crate::error::ApiError;

/// The kinds of actor the coordinator records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorType {
    /// A dispatcher managing requests and confirmations.
    Dispatcher,
    /// A volunteer acting for themselves.
    Volunteer,
    /// An automated process.
    System,
}

impl ActorType {
    /// Parses an actor type from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for anything other than `dispatcher`,
    /// `volunteer`, or `system`.
    pub fn parse(value: &str) -> Result<Self, ApiError> {
        match value {
            "dispatcher" => Ok(Self::Dispatcher),
            "volunteer" => Ok(Self::Volunteer),
            "system" => Ok(Self::System),
            other => Err(ApiError::InvalidInput {
                field: String::from("actor_type"),
                message: format!("Unknown actor type '{other}'"),
            }),
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dispatcher => "dispatcher",
            Self::Volunteer => "volunteer",
            Self::System => "system",
        }
    }
}

/// Who is acting and why, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Attribution {
    /// Identifier of the acting person or process.
    pub actor_id: String,
    /// One of `dispatcher`, `volunteer`, `system`.
    pub actor_type: String,
    /// Identifier of the triggering request or ticket.
    pub cause_id: String,
    /// Description of why the action is taken.
    pub cause_description: String,
}

impl Attribution {
    /// Creates an attribution.
    #[must_use]
    pub const fn new(
        actor_id: String,
        actor_type: String,
        cause_id: String,
        cause_description: String,
    ) -> Self {
        Self {
            actor_id,
            actor_type,
            cause_id,
            cause_description,
        }
    }

    /// Validates this attribution and converts it for the audit trail.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the actor id or cause id is blank, or the
    /// actor type is unknown.
    pub fn into_audit(self) -> Result<(Actor, Cause), ApiError> {
        let actor_id: &str = self.actor_id.trim();
        if actor_id.is_empty() {
            return Err(ApiError::InvalidInput {
                field: String::from("actor_id"),
                message: String::from("Actor id must not be empty"),
            });
        }
        let cause_id: &str = self.cause_id.trim();
        if cause_id.is_empty() {
            return Err(ApiError::InvalidInput {
                field: String::from("cause_id"),
                message: String::from("Cause id must not be empty"),
            });
        }
        let actor_type: ActorType = ActorType::parse(self.actor_type.trim())?;

        Ok((
            Actor::new(actor_id.to_string(), actor_type.as_str().to_string()),
            Cause::new(cause_id.to_string(), self.cause_description),
        ))
    }
}
