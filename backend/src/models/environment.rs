//! Shared grid environment
//!
//! Holds the grid bounds, the task queue and a lookup of agent positions.
//!
//! # Invariants
//!
//! 1. **Task Identity**: task ids are assigned here, in insertion order,
//!    from a sequence that never repeats within a run
//! 2. **Positions Are Bookkeeping**: `agent_positions` mirrors the roster
//!    and is refreshed by the simulation; the agents themselves are
//!    authoritative
//! 3. **Positive Bounds**: width and height are at least 1

use crate::models::position::Position;
use crate::models::task::{Task, TaskError, TaskSpec};
use std::collections::HashMap;

/// Grid, task queue and position lookup
///
/// # Example
///
/// ```rust
/// use disaster_response_sim_core::{Environment, Position, TaskSpec};
///
/// let mut env = Environment::new(10, 10).unwrap();
/// let id = env
///     .add_task(TaskSpec::deliver(Position::new(7, 7), "food"))
///     .unwrap()
///     .to_string();
///
/// assert_eq!(id, "task_00000000");
/// assert_eq!(env.num_tasks(), 1);
/// assert!(env.contains(Position::new(10, 1)));
/// assert!(!env.contains(Position::new(0, 1)));
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    width: i32,
    height: i32,

    /// Task queue; order is processing order after each prioritization
    tasks: Vec<Task>,

    /// Last known position of every agent, by id
    agent_positions: HashMap<String, Position>,

    next_task_seq: usize,
}

impl Environment {
    /// Create an empty environment
    ///
    /// Returns `None` unless both dimensions are positive.
    pub fn new(width: i32, height: i32) -> Option<Self> {
        if width < 1 || height < 1 {
            return None;
        }

        Some(Self {
            width,
            height,
            tasks: Vec::new(),
            agent_positions: HashMap::new(),
            next_task_seq: 0,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether `pos` lies within `[1, width] × [1, height]`
    pub fn contains(&self, pos: Position) -> bool {
        (1..=self.width).contains(&pos.x) && (1..=self.height).contains(&pos.y)
    }

    /// Validate `spec`, assign it the next task id and append it
    ///
    /// Returns the new task's id. A rejected spec still consumes its id so
    /// that ids stay tied to submission order.
    pub fn add_task(&mut self, spec: TaskSpec) -> Result<&str, TaskError> {
        let id = format!("task_{:08}", self.next_task_seq);
        self.next_task_seq += 1;

        let task = Task::from_spec(id, spec)?;
        self.tasks.push(task);
        Ok(self.tasks[self.tasks.len() - 1].id())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    pub fn num_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Remove the tasks whose ids appear in `ids`, keeping queue order
    ///
    /// Returns the number of tasks removed.
    pub fn remove_tasks(&mut self, ids: &[String]) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !ids.iter().any(|id| id == t.id()));
        before - self.tasks.len()
    }

    pub fn record_position(&mut self, agent_id: &str, pos: Position) {
        match self.agent_positions.get_mut(agent_id) {
            Some(slot) => *slot = pos,
            None => {
                self.agent_positions.insert(agent_id.to_string(), pos);
            }
        }
    }

    pub fn agent_position(&self, agent_id: &str) -> Option<Position> {
        self.agent_positions.get(agent_id).copied()
    }

    pub fn agent_positions(&self) -> &HashMap<String, Position> {
        &self.agent_positions
    }
}
