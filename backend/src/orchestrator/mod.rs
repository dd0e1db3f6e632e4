//! Orchestrator - the per-step scheduler and the simulation loop
//!
//! See `engine.rs` for the loop and `scheduler.rs` for the matching walk.

pub mod engine;
pub mod scheduler;

// Re-export main types for convenience
pub use engine::{
    simulate, GridConfig, Simulation, SimulationConfig, SimulationError, SimulationSettings,
    StepResult, TaskRetention,
};
pub use scheduler::{match_action, prioritize, Action, WalkSummary};
