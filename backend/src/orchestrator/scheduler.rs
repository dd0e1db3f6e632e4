//! Per-step task scheduler
//!
//! Orders the task queue and walks every (task, agent) pair:
//!
//! ```text
//! prioritize(queue)                         stable, Critical first
//! for task in queue:                        task-major
//!     for agent in roster:                  agent-minor, roster order
//!         Transport × Deliver → move, allocate (or restock)
//!         Medical   × Assist  → move, assist
//!         anything else       → skipped, no event
//! ```
//!
//! Every compatible agent acts on every compatible task; no agent claims a
//! task exclusively.

use crate::allocation::{allocate_resource, AllocationOutcome, ReplenishConfig};
use crate::assistance::assist;
use crate::models::agent::{Agent, MedicalAgent, TransportAgent};
use crate::models::event::{Event, EventLog};
use crate::models::task::{Task, TaskKind};
use crate::movement::{move_agent, Movement};

/// Role-specific work a matched agent performs on a task
///
/// Carries the agent already resolved to its role, so the walk never has
/// to test the variant a second time.
#[derive(Debug, PartialEq, Eq)]
pub enum Action<'a> {
    Deliver {
        transport: &'a mut TransportAgent,
        resource: &'a str,
    },
    Assist {
        medical: &'a mut MedicalAgent,
    },
}

/// Tally of one walk over the queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub num_moves: usize,
    pub num_allocations: usize,
    pub num_replenishments: usize,
    pub num_assists: usize,

    /// Logical restocking time incurred during the walk
    pub delay_ms: u64,

    /// Tasks served at least once (successful allocation or assist), in
    /// first-served order
    pub handled_task_ids: Vec<String>,
}

impl WalkSummary {
    fn mark_handled(&mut self, task_id: &str) {
        if !self.handled_task_ids.iter().any(|id| id == task_id) {
            self.handled_task_ids.push(task_id.to_string());
        }
    }

    fn record_move(
        &mut self,
        log: &mut EventLog,
        step: usize,
        agent_id: &str,
        movement: Option<Movement>,
    ) {
        if let Some(movement) = movement {
            self.num_moves += 1;
            log.log(Event::AgentMoved {
                step,
                agent_id: agent_id.to_string(),
                from: movement.from,
                to: movement.to,
                distance: movement.distance,
            });
        }
    }
}

/// Stable-sort `tasks` so Critical tasks precede all others
///
/// Relative order inside each priority class is preserved.
pub fn prioritize(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| !task.is_critical());
}

/// The action `agent` takes on `task`, if the pair is compatible
pub fn match_action<'a>(agent: &'a mut Agent, task: &'a Task) -> Option<Action<'a>> {
    match (agent, task.kind()) {
        (Agent::Transport(transport), TaskKind::Deliver { resource }) => Some(Action::Deliver {
            transport,
            resource: resource.as_str(),
        }),
        (Agent::Medical(medical), TaskKind::Assist) => Some(Action::Assist { medical }),
        _ => None,
    }
}

/// Walk the queue once, applying every compatible (task, agent) pair
///
/// Events are appended to `log` in the order the actions happen.
pub fn walk(
    tasks: &[Task],
    agents: &mut [Agent],
    step: usize,
    replenish: &ReplenishConfig,
    log: &mut EventLog,
) -> WalkSummary {
    let mut summary = WalkSummary::default();

    for task in tasks {
        for agent in agents.iter_mut() {
            match match_action(agent, task) {
                Some(Action::Deliver { transport, resource }) => {
                    let movement = move_agent(transport, task.location());
                    summary.record_move(log, step, transport.id(), movement);

                    match allocate_resource(transport, resource, replenish) {
                        AllocationOutcome::Allocated { resource, remaining } => {
                            summary.num_allocations += 1;
                            summary.mark_handled(task.id());
                            log.log(Event::ResourceAllocated {
                                step,
                                agent_id: transport.id().to_string(),
                                task_id: task.id().to_string(),
                                resource,
                                remaining,
                            });
                        }
                        AllocationOutcome::Unavailable {
                            resource,
                            replenishment,
                        } => {
                            summary.num_replenishments += 1;
                            summary.delay_ms = summary.delay_ms.saturating_add(replenishment.delay_ms);
                            log::warn!(
                                "step {}: {} out of {} at {}, replenishing",
                                step,
                                transport.id(),
                                resource,
                                transport.position()
                            );
                            log.log(Event::ResourceUnavailable {
                                step,
                                agent_id: transport.id().to_string(),
                                task_id: task.id().to_string(),
                                resource,
                            });
                            log.log(Event::Replenished {
                                step,
                                agent_id: transport.id().to_string(),
                                amount: replenishment.amount,
                                delay_ms: replenishment.delay_ms,
                                inventory: replenishment.inventory,
                            });
                        }
                    }
                }
                Some(Action::Assist { medical }) => {
                    let movement = move_agent(medical, task.location());
                    summary.record_move(log, step, medical.id(), movement);

                    let assistance = assist(medical, task);
                    summary.num_assists += 1;
                    summary.mark_handled(task.id());
                    log.log(Event::AssistProvided {
                        step,
                        agent_id: medical.id().to_string(),
                        task_id: assistance.task_id,
                        location: assistance.location,
                        priority: assistance.priority,
                        expertise: assistance.expertise,
                    });
                }
                None => {}
            }
        }
    }

    summary
}
