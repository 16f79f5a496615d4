//! # Actor Context
//!
//! Every write records who performed it. The caller passes the identity
//! explicitly; when there is none (a scheduled job, an import) the configured
//! system actor is used.

use serde::{Deserialize, Serialize};

/// Id of the built-in system actor.
pub const SYSTEM_ACTOR_ID: i64 = 1;

/// Display name of the built-in system actor.
pub const SYSTEM_ACTOR_NAME: &str = "system";

/// A user (or the system) performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
}

impl Actor {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Actor {
            id,
            name: name.into(),
        }
    }

    /// The built-in system actor.
    pub fn system() -> Self {
        Actor::new(SYSTEM_ACTOR_ID, SYSTEM_ACTOR_NAME)
    }
}

impl Default for Actor {
    fn default() -> Self {
        Actor::system()
    }
}

/// The identity attached to one request, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub actor: Option<Actor>,
}

impl ActorContext {
    /// A request made by a known user.
    pub fn user(id: i64, name: impl Into<String>) -> Self {
        ActorContext {
            actor: Some(Actor::new(id, name)),
        }
    }

    /// A request with no user attached.
    pub fn anonymous() -> Self {
        ActorContext { actor: None }
    }

    /// The identity to record, falling back to `fallback`.
    pub fn performed_by(&self, fallback: &Actor) -> Actor {
        self.actor.clone().unwrap_or_else(|| fallback.clone())
    }
}
