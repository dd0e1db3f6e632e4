//! Medical assistance for Assist tasks

use crate::models::agent::MedicalAgent;
use crate::models::position::Position;
use crate::models::task::{Priority, Task};

/// What a medical agent did at a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assistance {
    pub task_id: String,
    pub location: Position,
    pub priority: Priority,
    pub expertise: String,
}

/// Serve `task` with `agent`
///
/// Assistance always succeeds and changes no state; the record is what the
/// caller logs.
pub fn assist(agent: &MedicalAgent, task: &Task) -> Assistance {
    Assistance {
        task_id: task.id().to_string(),
        location: task.location(),
        priority: task.priority(),
        expertise: agent.expertise().to_string(),
    }
}
