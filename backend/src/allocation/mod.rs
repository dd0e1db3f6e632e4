//! Resource allocation for Deliver tasks
//!
//! A transport agent serving a Deliver task hands over one unit of the
//! task's resource. When it has none, it restocks instead:
//!
//! ```text
//! resources[r] > 0 ──► resources[r] -= 1              (Allocated)
//!        │
//!        └── else ──► every resource += amount        (Unavailable + Replenishment)
//! ```
//!
//! A failed allocation is not retried within the same step. Restocking
//! models a real-world delay; the delay is reported, never slept, so it
//! cannot reorder other agents' actions.
//!
//! # Critical Invariants
//!
//! - **Non-negative Inventory**: counts are only decremented when positive
//! - **No New Keys**: restocking never introduces a resource the agent did
//!   not already carry

pub mod negotiation;

use crate::models::agent::TransportAgent;
use crate::models::task::{Task, TaskError, TaskKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Restocking parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplenishConfig {
    /// Units added to every carried resource
    pub amount: u32,

    /// Logical restocking time charged to the simulation clock
    pub delay_ms: u64,
}

impl Default for ReplenishConfig {
    fn default() -> Self {
        Self {
            amount: 5,
            delay_ms: 2_000,
        }
    }
}

/// Result of a restock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replenishment {
    pub amount: u32,
    pub delay_ms: u64,
    /// Inventory after restocking
    pub inventory: BTreeMap<String, u32>,
}

/// Result of an allocation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// One unit handed over
    Allocated { resource: String, remaining: u32 },

    /// Nothing on hand; the agent restocked instead
    Unavailable {
        resource: String,
        replenishment: Replenishment,
    },
}

impl AllocationOutcome {
    pub fn is_allocated(&self) -> bool {
        matches!(self, AllocationOutcome::Allocated { .. })
    }
}

/// Allocate one unit of `task`'s resource from `agent`
///
/// # Errors
/// [`TaskError::NotDeliverable`] if `task` is not a Deliver task; the agent
/// is untouched.
///
/// # Example
/// ```
/// use disaster_response_sim_core::allocation::{allocate, AllocationOutcome, ReplenishConfig};
/// use disaster_response_sim_core::{Position, Task, TaskSpec, TransportAgent};
///
/// let task = Task::from_spec("task_0", TaskSpec::deliver(Position::new(7, 7), "food")).unwrap();
/// let mut truck = TransportAgent::new("T1", Position::new(7, 7), [("food", 3)]);
///
/// let outcome = allocate(&mut truck, &task, &ReplenishConfig::default()).unwrap();
/// assert!(matches!(outcome, AllocationOutcome::Allocated { remaining: 2, .. }));
/// ```
pub fn allocate(
    agent: &mut TransportAgent,
    task: &Task,
    config: &ReplenishConfig,
) -> Result<AllocationOutcome, TaskError> {
    let resource = match task.kind() {
        TaskKind::Deliver { resource } => resource,
        TaskKind::Assist => {
            return Err(TaskError::NotDeliverable {
                task_id: task.id().to_string(),
            })
        }
    };

    Ok(allocate_resource(agent, resource, config))
}

/// Hand over one unit of `resource`, or restock when none is on hand
///
/// The resource has already been taken from a Deliver task, so this cannot
/// fail.
pub fn allocate_resource(
    agent: &mut TransportAgent,
    resource: &str,
    config: &ReplenishConfig,
) -> AllocationOutcome {
    match agent.take_one(resource) {
        Ok(remaining) => AllocationOutcome::Allocated {
            resource: resource.to_string(),
            remaining,
        },
        Err(_) => AllocationOutcome::Unavailable {
            resource: resource.to_string(),
            replenishment: replenish(agent, config),
        },
    }
}

/// Add `config.amount` units to every resource `agent` carries
pub fn replenish(agent: &mut TransportAgent, config: &ReplenishConfig) -> Replenishment {
    agent.restock_all(config.amount);
    Replenishment {
        amount: config.amount,
        delay_ms: config.delay_ms,
        inventory: agent.resources().clone(),
    }
}
