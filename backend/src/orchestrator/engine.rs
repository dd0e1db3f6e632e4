//! Simulation Engine
//!
//! Main simulation loop integrating all components:
//! - Task prioritization and agent-task matching (scheduler)
//! - Movement, allocation/restocking and assistance
//! - Periodic task injection (deterministic generation)
//! - Event logging (complete simulation history)
//!
//! # Architecture
//!
//! ```text
//! For each step s (1-based):
//! 1. Advance the step clock
//! 2. Prioritize the task queue (stable, Critical first)
//! 3. Walk (task, agent) pairs: move + allocate | move + assist
//! 4. Retire handled tasks (RetireHandled retention only)
//! 5. Inject a random task if s is a multiple of the injection interval
//! 6. Sync the environment's position map from the roster
//! 7. Charge restocking delays to the clock
//! ```
//!
//! # Example
//!
//! ```rust
//! use disaster_response_sim_core::{Agent, Position, Simulation, SimulationConfig, TaskSpec};
//!
//! let mut config = SimulationConfig::new(10, 10);
//! config.tasks.push(TaskSpec::deliver(Position::new(7, 7), "food"));
//! config.agents.push(Agent::transport("T1", Position::new(1, 1), [("food", 10)]));
//!
//! let mut sim = Simulation::new(config).unwrap();
//! let result = sim.step().unwrap();
//!
//! assert_eq!(result.step, 1);
//! assert_eq!(result.num_allocations, 1);
//! assert_eq!(sim.agent("T1").unwrap().position(), Position::new(7, 7));
//! ```

use crate::allocation::negotiation::{negotiate, NegotiationOutcome};
use crate::allocation::ReplenishConfig;
use crate::core::time::StepClock;
use crate::injection::{InjectionConfig, TaskInjector};
use crate::models::agent::{Agent, AgentRole};
use crate::models::environment::Environment;
use crate::models::event::{Event, EventLog};
use crate::models::task::{TaskError, TaskSpec};
use crate::orchestrator::scheduler;
use crate::rng::RngManager;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete scenario: grid, initial tasks, roster and engine settings
///
/// Loadable from JSON:
///
/// ```rust
/// use disaster_response_sim_core::SimulationConfig;
///
/// let config = SimulationConfig::from_json(r#"{
///     "grid": {"width": 10, "height": 10},
///     "tasks": [{"location": {"x": 2, "y": 2}, "type": "assist", "priority": "critical"}],
///     "agents": [{"role": "medical", "id": "M1", "position": {"x": 5, "y": 5}, "expertise": "emergency"}]
/// }"#).unwrap();
///
/// assert_eq!(config.tasks.len(), 1);
/// assert_eq!(config.settings.injection.interval, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub grid: GridConfig,

    /// Initial task queue, in submission order
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,

    /// Initial roster; ids must be unique
    #[serde(default)]
    pub agents: Vec<Agent>,

    #[serde(default)]
    pub settings: SimulationSettings,
}

impl SimulationConfig {
    /// Empty scenario on a `width` × `height` grid with default settings
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid: GridConfig { width, height },
            tasks: Vec::new(),
            agents: Vec::new(),
            settings: SimulationSettings::default(),
        }
    }

    /// Parse a scenario from JSON
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
}

/// Engine parameters independent of the scenario's contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// RNG seed for deterministic task injection
    pub rng_seed: u64,

    /// Simulated duration of one step
    pub step_duration_ms: u64,

    pub injection: InjectionConfig,

    pub replenish: ReplenishConfig,

    pub task_retention: TaskRetention,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            step_duration_ms: 1_000,
            injection: InjectionConfig::default(),
            replenish: ReplenishConfig::default(),
            task_retention: TaskRetention::default(),
        }
    }
}

/// What happens to a task once it has been served
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskRetention {
    /// Tasks are never removed; served tasks are served again every step
    #[default]
    KeepAll,

    /// A task that got a successful allocation or an assist during a step is
    /// removed at the end of that step
    RetireHandled,
}

// ============================================================================
// Errors and Results
// ============================================================================

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Duplicate agent id: {0}")]
    DuplicateAgent(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Agent {agent_id} is not a {expected} agent")]
    WrongRole { agent_id: String, expected: AgentRole },

    #[error("Malformed task: {0}")]
    MalformedTask(#[from] TaskError),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Summary of a single step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepResult {
    /// 1-based step index
    pub step: usize,

    /// Simulated time at the end of the step
    pub timestamp_ms: u64,

    pub num_moves: usize,
    pub num_allocations: usize,
    pub num_replenishments: usize,
    pub num_assists: usize,
    pub num_retired: usize,

    /// Id of the task injected this step, if any
    pub injected_task_id: Option<String>,

    /// Queue length at the end of the step
    pub queue_len: usize,
}

// ============================================================================
// Simulation
// ============================================================================

/// Simulation context owning all state for one run
///
/// The environment, roster, clock, RNG and event log are owned exclusively
/// here; there is no process-wide state. Steps are atomic from the caller's
/// point of view.
///
/// # Determinism
///
/// All randomness is via `rng` (seeded xorshift64*). Same seed + same
/// config = identical event log.
pub struct Simulation {
    environment: Environment,

    /// Roster in caller order; authoritative for positions and inventories
    agents: Vec<Agent>,

    /// Agent id → roster index
    agent_index: HashMap<String, usize>,

    clock: StepClock,
    rng: RngManager,
    injector: TaskInjector,
    replenish: ReplenishConfig,
    retention: TaskRetention,
    event_log: EventLog,
}

impl Simulation {
    /// Build a simulation from a scenario config
    ///
    /// # Errors
    /// - `InvalidConfig` for a non-positive grid or invalid settings
    /// - `MalformedTask` for a Deliver task without a resource
    /// - `DuplicateAgent` if two agents share an id
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let SimulationConfig {
            grid,
            tasks,
            agents,
            settings,
        } = config;

        let mut environment = Environment::new(grid.width, grid.height).ok_or_else(|| {
            SimulationError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                grid.width, grid.height
            ))
        })?;

        for spec in tasks {
            if !environment.contains(spec.location) {
                warn!(
                    "initial task at {} lies outside the {}x{} grid",
                    spec.location, grid.width, grid.height
                );
            }
            environment.add_task(spec)?;
        }

        Self::from_parts(environment, agents, settings)
    }

    /// Build a simulation around an existing environment and roster
    pub fn from_parts(
        mut environment: Environment,
        agents: Vec<Agent>,
        settings: SimulationSettings,
    ) -> Result<Self, SimulationError> {
        settings
            .injection
            .validate()
            .map_err(SimulationError::InvalidConfig)?;

        let mut agent_index = HashMap::with_capacity(agents.len());
        for (idx, agent) in agents.iter().enumerate() {
            if agent_index.insert(agent.id().to_string(), idx).is_some() {
                return Err(SimulationError::DuplicateAgent(agent.id().to_string()));
            }
            environment.record_position(agent.id(), agent.position());
        }

        Ok(Self {
            environment,
            agents,
            agent_index,
            clock: StepClock::new(settings.step_duration_ms),
            rng: RngManager::new(settings.rng_seed),
            injector: TaskInjector::new(settings.injection),
            replenish: settings.replenish,
            retention: settings.task_retention,
            event_log: EventLog::new(),
        })
    }

    /// Run one step
    pub fn step(&mut self) -> Result<StepResult, SimulationError> {
        let step = self.clock.advance_step();
        let first_event = self.event_log.len();

        // Prioritize then walk (task-major, agent-minor)
        scheduler::prioritize(self.environment.tasks_mut());
        let summary = scheduler::walk(
            self.environment.tasks(),
            &mut self.agents,
            step,
            &self.replenish,
            &mut self.event_log,
        );

        let mut num_retired = 0;
        if self.retention == TaskRetention::RetireHandled && !summary.handled_task_ids.is_empty() {
            num_retired = self.environment.remove_tasks(&summary.handled_task_ids);
            for task_id in &summary.handled_task_ids {
                self.event_log.log(Event::TaskRetired {
                    step,
                    task_id: task_id.clone(),
                });
            }
        }

        let injected_task_id = if self.injector.is_due(step) {
            Some(self.inject_task(step)?)
        } else {
            None
        };

        for agent in &self.agents {
            self.environment.record_position(agent.id(), agent.position());
        }

        self.clock.record_delay(summary.delay_ms);

        for event in self.event_log.since(first_event) {
            debug!("{:?}", event);
        }

        let result = StepResult {
            step,
            timestamp_ms: self.clock.timestamp_ms(),
            num_moves: summary.num_moves,
            num_allocations: summary.num_allocations,
            num_replenishments: summary.num_replenishments,
            num_assists: summary.num_assists,
            num_retired,
            injected_task_id,
            queue_len: self.environment.num_tasks(),
        };

        info!(
            "step {} done: {} moves, {} allocations, {} replenishments, {} assists, {} queued",
            step,
            result.num_moves,
            result.num_allocations,
            result.num_replenishments,
            result.num_assists,
            result.queue_len
        );

        Ok(result)
    }

    /// Run `steps` consecutive steps
    pub fn run(&mut self, steps: usize) -> Result<Vec<StepResult>, SimulationError> {
        let mut results = Vec::with_capacity(steps);
        for _ in 0..steps {
            results.push(self.step()?);
        }
        Ok(results)
    }

    /// Ask transport agent `transport_id` for one unit of `resource` on
    /// behalf of medical agent `medical_id`
    ///
    /// Not part of the per-step walk. The outcome is logged against the
    /// current step (0 before the first step).
    ///
    /// # Errors
    /// `AgentNotFound` or `WrongRole`; no state changes in either case.
    pub fn negotiate(
        &mut self,
        medical_id: &str,
        transport_id: &str,
        resource: &str,
    ) -> Result<NegotiationOutcome, SimulationError> {
        let medical_idx = self.index_of(medical_id)?;
        let transport_idx = self.index_of(transport_id)?;

        let medical = self.agents[medical_idx]
            .as_medical()
            .cloned()
            .ok_or_else(|| SimulationError::WrongRole {
                agent_id: medical_id.to_string(),
                expected: AgentRole::Medical,
            })?;
        let transport = self.agents[transport_idx]
            .as_transport_mut()
            .ok_or_else(|| SimulationError::WrongRole {
                agent_id: transport_id.to_string(),
                expected: AgentRole::Transport,
            })?;

        let outcome = negotiate(&medical, transport, resource);
        let step = self.clock.current_step();

        let event = match outcome {
            NegotiationOutcome::Accepted { remaining } => Event::NegotiationSucceeded {
                step,
                medical_id: medical_id.to_string(),
                transport_id: transport_id.to_string(),
                resource: resource.to_string(),
                remaining,
            },
            NegotiationOutcome::Declined => Event::NegotiationFailed {
                step,
                medical_id: medical_id.to_string(),
                transport_id: transport_id.to_string(),
                resource: resource.to_string(),
            },
        };
        debug!("{:?}", event);
        self.event_log.log(event);

        Ok(outcome)
    }

    fn inject_task(&mut self, step: usize) -> Result<String, SimulationError> {
        let spec = self.injector.generate(
            self.environment.width(),
            self.environment.height(),
            &mut self.rng,
        );
        let location = spec.location;
        let task_type = spec.task_type;
        let resource = spec.resource.clone();
        let priority = spec.resolved_priority();

        let task_id = self.environment.add_task(spec)?.to_string();
        self.event_log.log(Event::TaskAdded {
            step,
            task_id: task_id.clone(),
            location,
            task_type,
            resource,
            priority,
        });

        Ok(task_id)
    }

    fn index_of(&self, agent_id: &str) -> Result<usize, SimulationError> {
        self.agent_index
            .get(agent_id)
            .copied()
            .ok_or_else(|| SimulationError::AgentNotFound(agent_id.to_string()))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, agent_id: &str) -> Option<&Agent> {
        self.agent_index.get(agent_id).map(|&idx| &self.agents[idx])
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Index of the last step run (0 before the first step)
    pub fn current_step(&self) -> usize {
        self.clock.current_step()
    }

    /// Simulated time elapsed, including restocking delays
    pub fn timestamp_ms(&self) -> u64 {
        self.clock.timestamp_ms()
    }

    /// Consume the simulation, returning the final environment, roster and log
    pub fn into_parts(self) -> (Environment, Vec<Agent>, EventLog) {
        (self.environment, self.agents, self.event_log)
    }
}

/// Run `steps` steps over `environment` and `agents` with default settings
///
/// Returns the finished simulation holding the final environment, roster
/// and event log.
pub fn simulate(
    environment: Environment,
    agents: Vec<Agent>,
    steps: usize,
) -> Result<Simulation, SimulationError> {
    let mut simulation = Simulation::from_parts(environment, agents, SimulationSettings::default())?;
    simulation.run(steps)?;
    Ok(simulation)
}
