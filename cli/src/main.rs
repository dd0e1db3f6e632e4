//! Disaster Response Simulator CLI
//!
//! Loads a scenario, runs it step by step and prints the event stream as
//! console lines stamped with the simulated time of each step.
//!
//! Usage:
//!   disaster-response-cli [demo | SCENARIO.json] [STEPS] [--json]
//!
//! `demo` (the default) runs the built-in 10x10 scenario. `--json` prints
//! one JSON object per event instead of text. Diagnostics go to stderr at
//! the level named by `SIM_LOG` (error, warn, info, debug, trace; default
//! warn).

use disaster_response_sim_core::{
    Agent, Event, Position, Priority, Simulation, SimulationConfig, TaskSpec,
};
use log::{LevelFilter, Log, Metadata, Record};
use std::process::ExitCode;

const DEFAULT_STEPS: usize = 10;

// ── Logger ──────────────────────────────────────────────────────────────

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging() {
    let level = std::env::var("SIM_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

// ── Arguments ───────────────────────────────────────────────────────────

struct Args {
    scenario: Option<String>,
    steps: usize,
    json: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        scenario: None,
        steps: DEFAULT_STEPS,
        json: false,
    };
    let mut positional = 0;

    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            args.json = true;
            continue;
        }
        match positional {
            0 if arg != "demo" => args.scenario = Some(arg),
            0 => {}
            1 => {
                args.steps = arg
                    .parse()
                    .map_err(|_| format!("steps must be a non-negative integer, got '{}'", arg))?;
            }
            _ => return Err(format!("unexpected argument '{}'", arg)),
        }
        positional += 1;
    }

    Ok(args)
}

fn demo_config() -> SimulationConfig {
    let mut config = SimulationConfig::new(10, 10);
    config.tasks = vec![
        TaskSpec::deliver(Position::new(7, 7), "food"),
        TaskSpec::assist(Position::new(2, 2)).with_priority(Priority::Critical),
    ];
    config.agents = vec![
        Agent::transport("T1", Position::new(1, 1), [("food", 10), ("medicine", 5)]),
        Agent::medical("M1", Position::new(5, 5), "emergency"),
    ];
    config
}

fn load_config(args: &Args) -> Result<SimulationConfig, String> {
    match &args.scenario {
        None => Ok(demo_config()),
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path, e))?;
            SimulationConfig::from_json(&json).map_err(|e| e.to_string())
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────────

fn render(event: &Event) -> String {
    match event {
        Event::AgentMoved {
            agent_id, from, to, distance, ..
        } => format!("{} moved {} -> {} ({} cells)", agent_id, from, to, distance),
        Event::ResourceAllocated {
            agent_id,
            task_id,
            resource,
            remaining,
            ..
        } => format!(
            "{} allocated {} to {} ({} left)",
            agent_id, resource, task_id, remaining
        ),
        Event::ResourceUnavailable {
            agent_id,
            task_id,
            resource,
            ..
        } => format!("{} has no {} for {}", agent_id, resource, task_id),
        Event::Replenished {
            agent_id,
            amount,
            delay_ms,
            inventory,
            ..
        } => {
            let stock: Vec<String> = inventory.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            format!(
                "{} replenished +{} each in {}ms [{}]",
                agent_id,
                amount,
                delay_ms,
                stock.join(", ")
            )
        }
        Event::AssistProvided {
            agent_id,
            task_id,
            location,
            priority,
            expertise,
            ..
        } => format!(
            "{} ({}) assisted {} at {} [{}]",
            agent_id, expertise, task_id, location, priority
        ),
        Event::NegotiationSucceeded {
            medical_id,
            transport_id,
            resource,
            remaining,
            ..
        } => format!(
            "{} got {} from {} ({} left)",
            medical_id, resource, transport_id, remaining
        ),
        Event::NegotiationFailed {
            medical_id,
            transport_id,
            resource,
            ..
        } => format!("{} asked {} for {}: none left", medical_id, transport_id, resource),
        Event::TaskAdded {
            task_id,
            location,
            task_type,
            resource,
            priority,
            ..
        } => match resource {
            Some(resource) => format!(
                "new {} task {} at {} ({}) [{}]",
                task_type, task_id, location, resource, priority
            ),
            None => format!("new {} task {} at {} [{}]", task_type, task_id, location, priority),
        },
        Event::TaskRetired { task_id, .. } => format!("{} retired", task_id),
    }
}

fn print_events(events: &[Event], timestamp_ms: u64, json: bool) -> Result<(), serde_json::Error> {
    for event in events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("[t={:>7}ms] step {:>3}: {}", timestamp_ms, event.step(), render(event));
        }
    }
    Ok(())
}

// ── Main ────────────────────────────────────────────────────────────────

fn run(args: &Args) -> Result<(), String> {
    let config = load_config(args)?;
    let mut sim = Simulation::new(config).map_err(|e| e.to_string())?;
    let mut cursor = 0;

    for _ in 0..args.steps {
        sim.step().map_err(|e| e.to_string())?;
        let events = sim.event_log().since(cursor);
        print_events(events, sim.timestamp_ms(), args.json).map_err(|e| e.to_string())?;
        cursor = sim.event_log().len();
    }

    if args.scenario.is_none() {
        sim.negotiate("M1", "T1", "medicine").map_err(|e| e.to_string())?;
        let events = sim.event_log().since(cursor);
        print_events(events, sim.timestamp_ms(), args.json).map_err(|e| e.to_string())?;
    }

    if !args.json {
        println!(
            "\n{} steps, {} events, {} tasks queued, t={}ms",
            sim.current_step(),
            sim.event_log().len(),
            sim.environment().num_tasks(),
            sim.timestamp_ms()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("usage: disaster-response-cli [demo | SCENARIO.json] [STEPS] [--json]");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
