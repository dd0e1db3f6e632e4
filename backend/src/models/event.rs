//! Event logging for simulation replay and inspection.
//!
//! Every state change the engine makes is recorded as an [`Event`]. The log
//! is the engine's only output channel: renderers (such as the CLI) turn
//! events into text, and tests inspect them directly.
//!
//! # Event Types
//!
//! - **Movement**: an agent teleported to a task location
//! - **Allocation**: a transport agent handed over a unit of a resource, or
//!   found none and restocked
//! - **Assistance**: a medical agent served an Assist task
//! - **Negotiation**: a medical agent requested a resource from a transport
//!   agent
//! - **Queue**: a task was injected into or retired from the queue
//!
//! # Example
//!
//! ```rust
//! use disaster_response_sim_core::{Event, EventLog, Position};
//!
//! let mut log = EventLog::new();
//! log.log(Event::AgentMoved {
//!     step: 1,
//!     agent_id: "T1".to_string(),
//!     from: Position::new(1, 1),
//!     to: Position::new(7, 7),
//!     distance: 12,
//! });
//!
//! assert_eq!(log.events_for_agent("T1").len(), 1);
//! assert_eq!(log.events()[0].event_type(), "AgentMoved");
//! ```

use crate::models::position::Position;
use crate::models::task::{Priority, TaskType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Simulation event capturing a state change.
///
/// All events carry the step they occurred in. Events are logged in the
/// order they happen within a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Agent moved to a task location
    AgentMoved {
        step: usize,
        agent_id: String,
        from: Position,
        to: Position,
        distance: u64,
    },

    /// Transport agent allocated one unit of a resource to a Deliver task
    ResourceAllocated {
        step: usize,
        agent_id: String,
        task_id: String,
        resource: String,
        remaining: u32,
    },

    /// Transport agent had none of the requested resource
    ResourceUnavailable {
        step: usize,
        agent_id: String,
        task_id: String,
        resource: String,
    },

    /// Transport agent restocked every resource it carries
    Replenished {
        step: usize,
        agent_id: String,
        amount: u32,
        delay_ms: u64,
        inventory: BTreeMap<String, u32>,
    },

    /// Medical agent assisted at a task location
    AssistProvided {
        step: usize,
        agent_id: String,
        task_id: String,
        location: Position,
        priority: Priority,
        expertise: String,
    },

    /// Transport agent gave up one unit to a medical agent
    NegotiationSucceeded {
        step: usize,
        medical_id: String,
        transport_id: String,
        resource: String,
        remaining: u32,
    },

    /// Transport agent had nothing to give
    NegotiationFailed {
        step: usize,
        medical_id: String,
        transport_id: String,
        resource: String,
    },

    /// New task appended to the queue
    TaskAdded {
        step: usize,
        task_id: String,
        location: Position,
        task_type: TaskType,
        resource: Option<String>,
        priority: Priority,
    },

    /// Handled task removed from the queue (retire-handled retention only)
    TaskRetired { step: usize, task_id: String },
}

impl Event {
    /// Get the step in which this event occurred
    pub fn step(&self) -> usize {
        match self {
            Event::AgentMoved { step, .. } => *step,
            Event::ResourceAllocated { step, .. } => *step,
            Event::ResourceUnavailable { step, .. } => *step,
            Event::Replenished { step, .. } => *step,
            Event::AssistProvided { step, .. } => *step,
            Event::NegotiationSucceeded { step, .. } => *step,
            Event::NegotiationFailed { step, .. } => *step,
            Event::TaskAdded { step, .. } => *step,
            Event::TaskRetired { step, .. } => *step,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::AgentMoved { .. } => "AgentMoved",
            Event::ResourceAllocated { .. } => "ResourceAllocated",
            Event::ResourceUnavailable { .. } => "ResourceUnavailable",
            Event::Replenished { .. } => "Replenished",
            Event::AssistProvided { .. } => "AssistProvided",
            Event::NegotiationSucceeded { .. } => "NegotiationSucceeded",
            Event::NegotiationFailed { .. } => "NegotiationFailed",
            Event::TaskAdded { .. } => "TaskAdded",
            Event::TaskRetired { .. } => "TaskRetired",
        }
    }

    /// Get task ID if event relates to a specific task
    pub fn task_id(&self) -> Option<&str> {
        match self {
            Event::ResourceAllocated { task_id, .. } => Some(task_id),
            Event::ResourceUnavailable { task_id, .. } => Some(task_id),
            Event::AssistProvided { task_id, .. } => Some(task_id),
            Event::TaskAdded { task_id, .. } => Some(task_id),
            Event::TaskRetired { task_id, .. } => Some(task_id),
            _ => None,
        }
    }

    /// Get the acting agent's ID
    ///
    /// Negotiation events report the transport agent, whose inventory is the
    /// one that changes.
    pub fn agent_id(&self) -> Option<&str> {
        match self {
            Event::AgentMoved { agent_id, .. } => Some(agent_id),
            Event::ResourceAllocated { agent_id, .. } => Some(agent_id),
            Event::ResourceUnavailable { agent_id, .. } => Some(agent_id),
            Event::Replenished { agent_id, .. } => Some(agent_id),
            Event::AssistProvided { agent_id, .. } => Some(agent_id),
            Event::NegotiationSucceeded { transport_id, .. } => Some(transport_id),
            Event::NegotiationFailed { transport_id, .. } => Some(transport_id),
            _ => None,
        }
    }

    /// True if `agent_id` took part in the event in any role
    pub fn involves_agent(&self, agent_id: &str) -> bool {
        match self {
            Event::NegotiationSucceeded {
                medical_id,
                transport_id,
                ..
            }
            | Event::NegotiationFailed {
                medical_id,
                transport_id,
                ..
            } => medical_id == agent_id || transport_id == agent_id,
            other => other.agent_id() == Some(agent_id),
        }
    }
}

/// Event log for storing and querying simulation events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific step
    pub fn events_at_step(&self, step: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.step() == step).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific task
    pub fn events_for_task(&self, task_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.task_id() == Some(task_id))
            .collect()
    }

    /// Get events any role of which is played by `agent_id`
    pub fn events_for_agent(&self, agent_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.involves_agent(agent_id))
            .collect()
    }

    /// Events logged at or after index `from`
    pub fn since(&self, from: usize) -> &[Event] {
        &self.events[from.min(self.events.len())..]
    }
}
