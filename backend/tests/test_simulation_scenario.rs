//! Integration tests for the simulation loop
//!
//! These tests drive complete scenarios through `Simulation` and `simulate`
//! and check the resulting roster, queue and event log.

use disaster_response_sim_core::{
    simulate, Agent, Environment, Event, NegotiationOutcome, Position, Priority, Simulation,
    SimulationConfig, SimulationError, TaskError, TaskRetention, TaskSpec, TaskType,
};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, Once};

/// Collects warnings emitted through the `log` facade
struct WarningCollector;

static COLLECTOR: WarningCollector = WarningCollector;
static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());
static INIT_LOGGER: Once = Once::new();

impl Log for WarningCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            WARNINGS.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

fn capture_warnings() {
    INIT_LOGGER.call_once(|| {
        log::set_logger(&COLLECTOR).unwrap();
        log::set_max_level(LevelFilter::Warn);
    });
}

/// 10x10 grid, one Deliver and one Critical Assist task, one agent of each role
fn create_reference_config() -> SimulationConfig {
    let mut config = SimulationConfig::new(10, 10);
    config
        .tasks
        .push(TaskSpec::deliver(Position::new(7, 7), "food"));
    config
        .tasks
        .push(TaskSpec::assist(Position::new(2, 2)).with_priority(Priority::Critical));
    config.agents.push(Agent::transport(
        "T1",
        Position::new(1, 1),
        [("food", 10), ("medicine", 5)],
    ));
    config
        .agents
        .push(Agent::medical("M1", Position::new(5, 5), "emergency"));
    config
}

fn food_of(sim: &Simulation, agent_id: &str) -> u32 {
    sim.agent(agent_id)
        .and_then(|a| a.as_transport())
        .map(|t| t.resource_count("food"))
        .unwrap()
}

#[test]
fn test_reference_scenario_single_step() {
    let mut sim = Simulation::new(create_reference_config()).unwrap();
    let result = sim.step().unwrap();

    // Critical Assist task sorted ahead of the Deliver task
    let order: Vec<TaskType> = sim
        .environment()
        .tasks()
        .iter()
        .map(|t| t.task_type())
        .collect();
    assert_eq!(order, vec![TaskType::Assist, TaskType::Deliver]);

    assert_eq!(sim.agent("M1").unwrap().position(), Position::new(2, 2));
    assert_eq!(sim.agent("T1").unwrap().position(), Position::new(7, 7));
    assert_eq!(food_of(&sim, "T1"), 9);

    assert_eq!(result.step, 1);
    assert_eq!(result.num_moves, 2);
    assert_eq!(result.num_assists, 1);
    assert_eq!(result.num_allocations, 1);
    assert_eq!(result.injected_task_id, None);
    assert_eq!(result.timestamp_ms, 1_000);

    let events = sim.event_log().events();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[0],
        Event::AgentMoved {
            step: 1,
            agent_id: "M1".to_string(),
            from: Position::new(5, 5),
            to: Position::new(2, 2),
            distance: 6,
        }
    );
    assert_eq!(
        events[1],
        Event::AssistProvided {
            step: 1,
            agent_id: "M1".to_string(),
            task_id: "task_00000001".to_string(),
            location: Position::new(2, 2),
            priority: Priority::Critical,
            expertise: "emergency".to_string(),
        }
    );
    assert_eq!(events[2].event_type(), "AgentMoved");
    assert_eq!(
        events[3],
        Event::ResourceAllocated {
            step: 1,
            agent_id: "T1".to_string(),
            task_id: "task_00000000".to_string(),
            resource: "food".to_string(),
            remaining: 9,
        }
    );
}

#[test]
fn test_position_map_synced_after_step() {
    let mut sim = Simulation::new(create_reference_config()).unwrap();
    assert_eq!(sim.environment().agent_position("T1"), Some(Position::new(1, 1)));

    sim.step().unwrap();

    assert_eq!(sim.environment().agent_position("T1"), Some(Position::new(7, 7)));
    assert_eq!(sim.environment().agent_position("M1"), Some(Position::new(2, 2)));
}

#[test]
fn test_agents_at_target_do_not_move_again() {
    let mut config = create_reference_config();
    config.settings.injection.interval = 0;
    let mut sim = Simulation::new(config).unwrap();

    sim.step().unwrap();
    let second = sim.step().unwrap();

    assert_eq!(second.num_moves, 0);
    assert_eq!(sim.event_log().events_of_type("AgentMoved").len(), 2);
}

#[test]
fn test_keep_all_serves_same_task_every_step() {
    let mut config = create_reference_config();
    config.settings.injection.interval = 0;
    let mut sim = Simulation::new(config).unwrap();

    sim.run(3).unwrap();

    assert_eq!(food_of(&sim, "T1"), 7);
    assert_eq!(sim.environment().num_tasks(), 2);
    assert_eq!(sim.event_log().events_for_task("task_00000000").len(), 3);
    assert_eq!(sim.event_log().events_of_type("AssistProvided").len(), 3);
}

#[test]
fn test_retire_handled_removes_served_tasks() {
    let mut config = create_reference_config();
    config.settings.injection.interval = 0;
    config.settings.task_retention = TaskRetention::RetireHandled;
    let mut sim = Simulation::new(config).unwrap();

    let first = sim.step().unwrap();
    assert_eq!(first.num_retired, 2);
    assert_eq!(first.queue_len, 0);

    let second = sim.step().unwrap();
    assert_eq!(second.num_allocations, 0);
    assert_eq!(food_of(&sim, "T1"), 9);

    let retired = sim.event_log().events_of_type("TaskRetired");
    assert_eq!(retired.len(), 2);
    assert_eq!(retired[0].task_id(), Some("task_00000001"));
    assert_eq!(retired[1].task_id(), Some("task_00000000"));
}

#[test]
fn test_retire_handled_keeps_task_after_restock() {
    let mut config = SimulationConfig::new(5, 5);
    config.settings.injection.interval = 0;
    config.settings.task_retention = TaskRetention::RetireHandled;
    config.tasks.push(TaskSpec::deliver(Position::new(3, 3), "food"));
    config
        .agents
        .push(Agent::transport("T1", Position::new(1, 1), [("food", 0)]));
    let mut sim = Simulation::new(config).unwrap();

    let first = sim.step().unwrap();
    assert_eq!(first.num_replenishments, 1);
    assert_eq!(first.num_retired, 0);
    assert_eq!(sim.environment().num_tasks(), 1);

    let second = sim.step().unwrap();
    assert_eq!(second.num_allocations, 1);
    assert_eq!(second.num_retired, 1);
    assert_eq!(food_of(&sim, "T1"), 4);
}

#[test]
fn test_six_steps_inject_two_tasks() {
    let mut sim = Simulation::new(SimulationConfig::new(8, 4)).unwrap();
    let results = sim.run(6).unwrap();

    let injected_steps: Vec<usize> = results
        .iter()
        .filter(|r| r.injected_task_id.is_some())
        .map(|r| r.step)
        .collect();
    assert_eq!(injected_steps, vec![3, 6]);

    assert_eq!(sim.environment().num_tasks(), 2);
    for task in sim.environment().tasks() {
        assert!(sim.environment().contains(task.location()));
        if task.task_type() == TaskType::Deliver {
            assert_eq!(task.resource(), Some("food"));
        }
    }

    let added = sim.event_log().events_of_type("TaskAdded");
    assert_eq!(added.len(), 2);
    assert_eq!(added[0].step(), 3);
    assert_eq!(added[1].step(), 6);
}

#[test]
fn test_injected_task_served_from_next_step() {
    let mut config = SimulationConfig::new(3, 3);
    config.settings.injection.deliver_probability = 1.0;
    config
        .agents
        .push(Agent::transport("T1", Position::new(2, 2), [("food", 10)]));
    let mut sim = Simulation::new(config).unwrap();

    let third = sim.run(3).unwrap().pop().unwrap();
    assert!(third.injected_task_id.is_some());
    assert_eq!(third.num_allocations, 0);

    let fourth = sim.step().unwrap();
    assert_eq!(fourth.num_allocations, 1);
    assert_eq!(food_of(&sim, "T1"), 9);
}

#[test]
fn test_same_seed_same_event_log() {
    let run = |seed: u64| {
        let mut config = create_reference_config();
        config.settings.rng_seed = seed;
        let mut sim = Simulation::new(config).unwrap();
        sim.run(30).unwrap();
        sim.event_log().events().to_vec()
    };

    assert_eq!(run(7), run(7));
    assert_ne!(run(7), run(8));
}

#[test]
fn test_negotiate_through_simulation() {
    let mut sim = Simulation::new(create_reference_config()).unwrap();

    let outcome = sim.negotiate("M1", "T1", "medicine").unwrap();
    assert_eq!(outcome, NegotiationOutcome::Accepted { remaining: 4 });

    let outcome = sim.negotiate("M1", "T1", "blankets").unwrap();
    assert_eq!(outcome, NegotiationOutcome::Declined);

    let events = sim.event_log().events_for_agent("M1");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type(), "NegotiationSucceeded");
    assert_eq!(events[0].step(), 0);
    assert_eq!(events[1].event_type(), "NegotiationFailed");
}

#[test]
fn test_negotiate_rejects_unknown_and_wrong_roles() {
    let mut sim = Simulation::new(create_reference_config()).unwrap();

    assert!(matches!(
        sim.negotiate("M9", "T1", "food"),
        Err(SimulationError::AgentNotFound(id)) if id == "M9"
    ));
    assert!(matches!(
        sim.negotiate("T1", "M1", "food"),
        Err(SimulationError::WrongRole { .. })
    ));

    assert_eq!(food_of(&sim, "T1"), 10);
    assert!(sim.event_log().is_empty());
}

#[test]
fn test_malformed_deliver_task_rejected() {
    let json = r#"{
        "grid": {"width": 10, "height": 10},
        "tasks": [{"location": {"x": 7, "y": 7}, "type": "deliver"}]
    }"#;
    let config = SimulationConfig::from_json(json).unwrap();

    match Simulation::new(config) {
        Err(SimulationError::MalformedTask(TaskError::MissingResource { task_id })) => {
            assert_eq!(task_id, "task_00000000");
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("malformed task accepted"),
    }
}

#[test]
fn test_config_from_json_with_settings() {
    let json = r#"{
        "grid": {"width": 10, "height": 10},
        "tasks": [
            {"location": {"x": 7, "y": 7}, "type": "deliver", "resource": "food"},
            {"location": {"x": 2, "y": 2}, "type": "assist", "priority": "critical"}
        ],
        "agents": [
            {"role": "transport", "id": "T1", "position": {"x": 1, "y": 1}, "resources": {"food": 10, "medicine": 5}},
            {"role": "medical", "id": "M1", "position": {"x": 5, "y": 5}, "expertise": "emergency"}
        ],
        "settings": {
            "rng_seed": 99,
            "replenish": {"amount": 2},
            "task_retention": "retire_handled"
        }
    }"#;

    let config = SimulationConfig::from_json(json).unwrap();
    assert_eq!(config.settings.rng_seed, 99);
    assert_eq!(config.settings.replenish.amount, 2);
    assert_eq!(config.settings.replenish.delay_ms, 2_000);
    assert_eq!(config.settings.injection.interval, 3);
    assert_eq!(config.settings.task_retention, TaskRetention::RetireHandled);

    let mut sim = Simulation::new(config).unwrap();
    sim.step().unwrap();
    assert_eq!(food_of(&sim, "T1"), 9);
}

#[test]
fn test_config_parse_error() {
    assert!(matches!(
        SimulationConfig::from_json("{\"grid\": 3}"),
        Err(SimulationError::ConfigParse(_))
    ));
}

#[test]
fn test_simulate_entrypoint() {
    let mut environment = Environment::new(10, 10).unwrap();
    environment
        .add_task(TaskSpec::deliver(Position::new(7, 7), "food"))
        .unwrap();
    let agents = vec![Agent::transport("T1", Position::new(1, 1), [("food", 2)])];

    let sim = simulate(environment, agents, 3).unwrap();

    assert_eq!(sim.current_step(), 3);
    let (environment, agents, log) = sim.into_parts();
    // 2 -> 1 -> 0 -> restock to 5
    assert_eq!(agents[0].as_transport().unwrap().resource_count("food"), 5);
    assert_eq!(log.events_of_type("Replenished").len(), 1);
    assert_eq!(environment.num_tasks(), 2);
}

#[test]
fn test_out_of_grid_initial_task_accepted_with_warning() {
    capture_warnings();

    let mut config = SimulationConfig::new(10, 10);
    config.settings.injection.interval = 0;
    config.tasks.push(TaskSpec::deliver(Position::new(50, -3), "food"));
    config
        .agents
        .push(Agent::transport("T1", Position::new(1, 1), [("food", 2)]));

    let mut sim = Simulation::new(config).unwrap();
    assert_eq!(sim.environment().num_tasks(), 1);
    assert!(WARNINGS
        .lock()
        .unwrap()
        .iter()
        .any(|w| w.contains("(50, -3)") && w.contains("outside the 10x10 grid")));

    sim.step().unwrap();

    assert_eq!(sim.agent("T1").unwrap().position(), Position::new(50, -3));
    assert_eq!(food_of(&sim, "T1"), 1);
    match sim.event_log().events()[0] {
        Event::AgentMoved { distance, .. } => assert_eq!(distance, 53),
        ref other => panic!("unexpected first event: {:?}", other),
    }
}

#[test]
fn test_move_between_extreme_corners_reports_exact_distance() {
    let mut config = SimulationConfig::new(10, 10);
    config.settings.injection.interval = 0;
    config
        .tasks
        .push(TaskSpec::assist(Position::new(i32::MAX, i32::MAX)));
    config
        .agents
        .push(Agent::medical("M1", Position::new(i32::MIN, i32::MIN), "emergency"));

    let mut sim = Simulation::new(config).unwrap();
    sim.step().unwrap();

    assert_eq!(
        sim.event_log().events()[0],
        Event::AgentMoved {
            step: 1,
            agent_id: "M1".to_string(),
            from: Position::new(i32::MIN, i32::MIN),
            to: Position::new(i32::MAX, i32::MAX),
            distance: 8_589_934_590,
        }
    );
}

#[test]
fn test_deliver_for_uncarried_resource_restocks_every_step() {
    let mut config = SimulationConfig::new(5, 5);
    config.settings.injection.interval = 0;
    config.tasks.push(TaskSpec::deliver(Position::new(2, 2), "water"));
    config.agents.push(Agent::transport(
        "T1",
        Position::new(2, 2),
        [("food", 1), ("medicine", 0)],
    ));
    let mut sim = Simulation::new(config).unwrap();

    let first = sim.step().unwrap();
    assert_eq!(first.num_allocations, 0);
    assert_eq!(first.num_replenishments, 1);
    assert_eq!(first.timestamp_ms, 1_000 + 2_000);

    let types: Vec<&str> = sim
        .event_log()
        .events()
        .iter()
        .map(|e| e.event_type())
        .collect();
    assert_eq!(types, vec!["ResourceUnavailable", "Replenished"]);
    match &sim.event_log().events()[1] {
        Event::Replenished { inventory, .. } => {
            assert_eq!(inventory.get("food"), Some(&6));
            assert_eq!(inventory.get("medicine"), Some(&5));
            assert!(!inventory.contains_key("water"));
        }
        other => panic!("unexpected event: {:?}", other),
    }

    let second = sim.step().unwrap();
    assert_eq!(second.num_replenishments, 1);
    assert_eq!(food_of(&sim, "T1"), 11);
    let transport = sim.agent("T1").and_then(|a| a.as_transport()).unwrap();
    assert_eq!(transport.resource_count("water"), 0);
}
