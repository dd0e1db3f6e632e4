//! Domain models for the disaster response simulator

pub mod agent;
pub mod environment;
pub mod event;
pub mod position;
pub mod task;

// Re-exports
pub use agent::{Agent, AgentError, AgentRole, MedicalAgent, TransportAgent};
pub use environment::Environment;
pub use event::{Event, EventLog};
pub use position::Position;
pub use task::{Priority, Task, TaskError, TaskKind, TaskSpec, TaskType};
