//! Time management for the simulation
//!
//! The simulation advances in discrete, 1-based steps. Each step costs a
//! fixed amount of simulated wall time; logical delays (such as restocking a
//! transport agent) are added on top. Nothing here ever sleeps.

/// Step counter plus simulated timestamp
///
/// # Example
/// ```
/// use disaster_response_sim_core::StepClock;
///
/// let mut clock = StepClock::new(1_000);
/// assert_eq!(clock.current_step(), 0);
///
/// clock.advance_step();
/// clock.record_delay(2_000);
/// assert_eq!(clock.current_step(), 1);
/// assert_eq!(clock.timestamp_ms(), 3_000);
/// ```
#[derive(Debug, Clone)]
pub struct StepClock {
    /// Steps started since the run began (0 before the first step)
    current_step: usize,
    /// Simulated duration of one step
    step_duration_ms: u64,
    /// Logical delays accumulated on top of the step cadence
    delay_ms: u64,
}

impl StepClock {
    /// Create a clock positioned before the first step
    pub fn new(step_duration_ms: u64) -> Self {
        Self {
            current_step: 0,
            step_duration_ms,
            delay_ms: 0,
        }
    }

    /// Begin the next step and return its 1-based index
    pub fn advance_step(&mut self) -> usize {
        self.current_step += 1;
        self.current_step
    }

    /// Add a logical delay to the simulated timeline
    pub fn record_delay(&mut self, delay_ms: u64) {
        self.delay_ms = self.delay_ms.saturating_add(delay_ms);
    }

    /// Index of the step most recently started
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Simulated milliseconds elapsed since the run began
    pub fn timestamp_ms(&self) -> u64 {
        (self.current_step as u64)
            .saturating_mul(self.step_duration_ms)
            .saturating_add(self.delay_ms)
    }

    /// Total logical delay recorded so far
    pub fn total_delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn step_duration_ms(&self) -> u64 {
        self.step_duration_ms
    }
}
