//! Periodic task injection.
//!
//! Every `interval` steps a new task appears somewhere on the grid. All
//! draws go through the seeded [`RngManager`], so the same seed and config
//! always inject the same tasks.
//!
//! # Draw Order
//!
//! Per injected task: x, then y, then type, then priority. Changing this
//! order changes every seeded scenario.
//!
//! # Example
//!
//! ```
//! use disaster_response_sim_core::injection::{InjectionConfig, TaskInjector};
//! use disaster_response_sim_core::RngManager;
//!
//! let injector = TaskInjector::new(InjectionConfig::default());
//! let mut rng = RngManager::new(42);
//!
//! assert!(!injector.is_due(2));
//! assert!(injector.is_due(3));
//!
//! let spec = injector.generate(10, 10, &mut rng);
//! assert!((1..=10).contains(&spec.location.x));
//! assert!((1..=10).contains(&spec.location.y));
//! ```

use crate::models::position::Position;
use crate::models::task::{Priority, TaskSpec, TaskType};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Injection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionConfig {
    /// Inject on every step that is a positive multiple of this (0 disables)
    pub interval: usize,

    /// Resource named by injected Deliver tasks
    pub resource: String,

    /// Probability an injected task is Deliver rather than Assist
    pub deliver_probability: f64,

    /// Probability an injected task is Critical rather than Low
    pub critical_probability: f64,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            interval: 3,
            resource: "food".to_string(),
            deliver_probability: 0.5,
            critical_probability: 0.5,
        }
    }
}

impl InjectionConfig {
    /// Check that probabilities lie in [0, 1] and a resource is named
    pub fn validate(&self) -> Result<(), String> {
        for (name, p) in [
            ("deliver_probability", self.deliver_probability),
            ("critical_probability", self.critical_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{} must be within [0, 1], got {}", name, p));
            }
        }
        if self.interval > 0 && self.resource.is_empty() {
            return Err("injection resource must not be empty".to_string());
        }
        Ok(())
    }
}

/// Generator for injected tasks
#[derive(Debug, Clone)]
pub struct TaskInjector {
    config: InjectionConfig,
}

impl TaskInjector {
    pub fn new(config: InjectionConfig) -> Self {
        Self { config }
    }

    /// Whether a task is injected on `step` (1-based)
    pub fn is_due(&self, step: usize) -> bool {
        self.config.interval > 0 && step > 0 && step % self.config.interval == 0
    }

    /// Draw a task uniformly over a `width` × `height` grid
    ///
    /// # Panics
    /// Panics if either dimension is below 1.
    pub fn generate(&self, width: i32, height: i32, rng: &mut RngManager) -> TaskSpec {
        let location = Position::new(rng.range_inclusive(1, width), rng.range_inclusive(1, height));

        let task_type = if rng.chance(self.config.deliver_probability) {
            TaskType::Deliver
        } else {
            TaskType::Assist
        };

        let priority = if rng.chance(self.config.critical_probability) {
            Priority::Critical
        } else {
            Priority::Low
        };

        let resource = match task_type {
            TaskType::Deliver => Some(self.config.resource.clone()),
            TaskType::Assist => None,
        };

        TaskSpec {
            location,
            task_type,
            resource,
            priority: Some(priority),
        }
    }
}
