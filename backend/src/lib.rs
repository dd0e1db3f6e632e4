//! Disaster Response Simulator Core
//!
//! Discrete-time multi-agent simulation of a disaster-response grid with
//! deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Step clock
//! - **models**: Domain types (Position, Task, Agent, Environment, Event)
//! - **movement**: Manhattan distance and teleport-to-target movement
//! - **allocation**: Resource allocation, restocking and negotiation
//! - **assistance**: Medical assistance at Assist tasks
//! - **injection**: Periodic random task generation
//! - **orchestrator**: Scheduler and main simulation loop
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Resource counts never go negative
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Within a step, work happens in task-major, agent-minor order

// Module declarations
pub mod allocation;
pub mod assistance;
pub mod core;
pub mod injection;
pub mod models;
pub mod movement;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use allocation::negotiation::{negotiate, NegotiationOutcome};
pub use allocation::{
    allocate, allocate_resource, replenish, AllocationOutcome, ReplenishConfig, Replenishment,
};
pub use assistance::{assist, Assistance};
pub use crate::core::time::StepClock;
pub use injection::{InjectionConfig, TaskInjector};
pub use models::{
    agent::{Agent, AgentError, AgentRole, MedicalAgent, Movable, TransportAgent},
    environment::Environment,
    event::{Event, EventLog},
    position::Position,
    task::{Priority, Task, TaskError, TaskKind, TaskSpec, TaskType},
};
pub use movement::{distance, move_agent, Movement};
pub use orchestrator::{
    simulate, GridConfig, Simulation, SimulationConfig, SimulationError, SimulationSettings,
    StepResult, TaskRetention,
};
pub use rng::RngManager;
