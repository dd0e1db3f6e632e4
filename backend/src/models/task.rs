//! Task model
//!
//! A task is a unit of work at a grid location. Each task has:
//! - A queue-unique id assigned by the environment (insertion order)
//! - A location on the grid
//! - A kind: Deliver (always names a resource) or Assist
//! - A priority (Low unless stated otherwise)
//!
//! Callers describe tasks with the loosely-typed [`TaskSpec`]; the
//! environment validates it into a [`Task`] when it is queued.

use crate::models::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Task urgency
///
/// Critical tasks are processed ahead of everything else each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Critical,
}

impl Priority {
    pub fn is_critical(self) -> bool {
        matches!(self, Priority::Critical)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => f.write_str("low"),
            Priority::Critical => f.write_str("critical"),
        }
    }
}

/// Untagged task type, as supplied by callers and the injector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Deliver,
    Assist,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Deliver => f.write_str("deliver"),
            TaskType::Assist => f.write_str("assist"),
        }
    }
}

/// What a queued task asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaskKind {
    /// Bring one unit of `resource` to the task location
    Deliver { resource: String },

    /// Provide medical assistance at the task location
    Assist,
}

/// Errors raised when a task does not satisfy its contract
#[derive(Debug, Error, PartialEq)]
pub enum TaskError {
    #[error("Deliver task {task_id} does not name a resource")]
    MissingResource { task_id: String },

    #[error("Task {task_id} is not a deliver task")]
    NotDeliverable { task_id: String },
}

/// Caller-facing task record with optional fields
///
/// `resource` is required when `task_type` is Deliver and ignored for
/// Assist. A missing `priority` resolves to [`Priority::Low`].
///
/// # Example
/// ```
/// use disaster_response_sim_core::{Position, Priority, TaskSpec, TaskType};
///
/// let spec: TaskSpec = serde_json::from_str(
///     r#"{"location": {"x": 2, "y": 2}, "type": "assist", "priority": "critical"}"#,
/// ).unwrap();
/// assert_eq!(spec.task_type, TaskType::Assist);
/// assert_eq!(spec.location, Position::new(2, 2));
/// assert_eq!(spec.resolved_priority(), Priority::Critical);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub location: Position,

    #[serde(rename = "type")]
    pub task_type: TaskType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl TaskSpec {
    /// Deliver one unit of `resource` to `location`
    pub fn deliver(location: Position, resource: impl Into<String>) -> Self {
        Self {
            location,
            task_type: TaskType::Deliver,
            resource: Some(resource.into()),
            priority: None,
        }
    }

    /// Provide assistance at `location`
    pub fn assist(location: Position) -> Self {
        Self {
            location,
            task_type: TaskType::Assist,
            resource: None,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn resolved_priority(&self) -> Priority {
        self.priority.unwrap_or_default()
    }
}

/// A validated task in the environment queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: String,
    location: Position,
    kind: TaskKind,
    priority: Priority,
}

impl Task {
    /// Validate a spec into a task carrying the given id
    ///
    /// # Errors
    /// [`TaskError::MissingResource`] for a Deliver spec without a resource
    /// (an empty resource name counts as missing).
    pub fn from_spec(id: impl Into<String>, spec: TaskSpec) -> Result<Self, TaskError> {
        let id = id.into();
        let priority = spec.resolved_priority();
        let kind = match spec.task_type {
            TaskType::Deliver => match spec.resource {
                Some(resource) if !resource.is_empty() => TaskKind::Deliver { resource },
                _ => return Err(TaskError::MissingResource { task_id: id }),
            },
            TaskType::Assist => TaskKind::Assist,
        };

        Ok(Self {
            id,
            location: spec.location,
            kind,
            priority,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> Position {
        self.location
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn task_type(&self) -> TaskType {
        match self.kind {
            TaskKind::Deliver { .. } => TaskType::Deliver,
            TaskKind::Assist => TaskType::Assist,
        }
    }

    /// Resource named by a Deliver task
    pub fn resource(&self) -> Option<&str> {
        match &self.kind {
            TaskKind::Deliver { resource } => Some(resource),
            TaskKind::Assist => None,
        }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn is_critical(&self) -> bool {
        self.priority.is_critical()
    }
}
