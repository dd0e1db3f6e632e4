//! Agent model
//!
//! Two kinds of responders share the grid:
//! - **Transport** agents carry a resource inventory and serve Deliver tasks
//! - **Medical** agents carry a free-form expertise tag and serve Assist tasks
//!
//! Every agent has an immutable id and a mutable position. The roster owned
//! by the simulation is the single source of truth for both; movement
//! mutates the position in place.
//!
//! CRITICAL: resource counts are u32 and only ever decremented when positive

use crate::models::position::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during agent operations
#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    #[error("Resource {resource} unavailable")]
    ResourceUnavailable { resource: String },
}

/// Role tag used when an operation needs a specific kind of agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Transport,
    Medical,
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentRole::Transport => f.write_str("transport"),
            AgentRole::Medical => f.write_str("medical"),
        }
    }
}

/// Anything that occupies, and can change, a grid position
pub trait Movable {
    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);
}

/// Resource-carrying responder
///
/// # Example
/// ```
/// use disaster_response_sim_core::{Position, TransportAgent};
///
/// let mut truck = TransportAgent::new("T1", Position::new(1, 1), [("food", 2)]);
/// assert_eq!(truck.take_one("food").unwrap(), 1);
/// assert_eq!(truck.resource_count("food"), 1);
/// assert!(truck.take_one("water").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportAgent {
    id: String,
    position: Position,
    /// Inventory keyed by resource name; ordered so restocking is deterministic
    #[serde(default)]
    resources: BTreeMap<String, u32>,
}

impl TransportAgent {
    pub fn new<I, K>(id: impl Into<String>, position: Position, resources: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        Self {
            id: id.into(),
            position,
            resources: resources.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn resources(&self) -> &BTreeMap<String, u32> {
        &self.resources
    }

    /// Units of `resource` on hand (0 when the key is absent)
    pub fn resource_count(&self, resource: &str) -> u32 {
        self.resources.get(resource).copied().unwrap_or(0)
    }

    /// Remove one unit of `resource`, returning the units left
    ///
    /// # Errors
    /// [`AgentError::ResourceUnavailable`] when none is on hand; the
    /// inventory is untouched in that case.
    pub fn take_one(&mut self, resource: &str) -> Result<u32, AgentError> {
        match self.resources.get_mut(resource) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(*count)
            }
            _ => Err(AgentError::ResourceUnavailable {
                resource: resource.to_string(),
            }),
        }
    }

    /// Add `amount` to every resource already in the inventory
    ///
    /// Resources the agent has never carried are not introduced.
    pub fn restock_all(&mut self, amount: u32) {
        for count in self.resources.values_mut() {
            *count = count.saturating_add(amount);
        }
    }
}

/// Service-providing responder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalAgent {
    id: String,
    position: Position,
    expertise: String,
}

impl MedicalAgent {
    pub fn new(id: impl Into<String>, position: Position, expertise: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            expertise: expertise.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn expertise(&self) -> &str {
        &self.expertise
    }
}

impl Movable for TransportAgent {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

impl Movable for MedicalAgent {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

/// Any responder on the roster
///
/// Shared capabilities (identity and position) are exposed here; role
/// specific behaviour is reached by matching on the variant once.
///
/// Serialized with an internal `"role"` tag:
/// ```
/// use disaster_response_sim_core::{Agent, AgentRole};
///
/// let agent: Agent = serde_json::from_str(
///     r#"{"role": "medical", "id": "M1", "position": {"x": 5, "y": 5}, "expertise": "emergency"}"#,
/// ).unwrap();
/// assert_eq!(agent.role(), AgentRole::Medical);
/// assert_eq!(agent.id(), "M1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Agent {
    Transport(TransportAgent),
    Medical(MedicalAgent),
}

impl Agent {
    /// Convenience constructor for a transport agent
    pub fn transport<I, K>(id: impl Into<String>, position: Position, resources: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        Agent::Transport(TransportAgent::new(id, position, resources))
    }

    /// Convenience constructor for a medical agent
    pub fn medical(id: impl Into<String>, position: Position, expertise: impl Into<String>) -> Self {
        Agent::Medical(MedicalAgent::new(id, position, expertise))
    }

    pub fn id(&self) -> &str {
        match self {
            Agent::Transport(a) => a.id(),
            Agent::Medical(a) => a.id(),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Agent::Transport(a) => a.position,
            Agent::Medical(a) => a.position,
        }
    }

    /// Replace the agent's position (identity is never touched)
    pub fn set_position(&mut self, position: Position) {
        match self {
            Agent::Transport(a) => a.position = position,
            Agent::Medical(a) => a.position = position,
        }
    }

    pub fn role(&self) -> AgentRole {
        match self {
            Agent::Transport(_) => AgentRole::Transport,
            Agent::Medical(_) => AgentRole::Medical,
        }
    }

    pub fn as_transport(&self) -> Option<&TransportAgent> {
        match self {
            Agent::Transport(a) => Some(a),
            Agent::Medical(_) => None,
        }
    }

    pub fn as_transport_mut(&mut self) -> Option<&mut TransportAgent> {
        match self {
            Agent::Transport(a) => Some(a),
            Agent::Medical(_) => None,
        }
    }

    pub fn as_medical(&self) -> Option<&MedicalAgent> {
        match self {
            Agent::Medical(a) => Some(a),
            Agent::Transport(_) => None,
        }
    }
}

impl Movable for Agent {
    fn position(&self) -> Position {
        Agent::position(self)
    }

    fn set_position(&mut self, position: Position) {
        Agent::set_position(self, position)
    }
}
