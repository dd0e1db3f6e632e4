//! Bilateral resource negotiation
//!
//! A medical agent asks a transport agent for one unit of a resource. The
//! transfer is direct: no environment, no queue, no retry. The per-step
//! scheduler never calls this; it is a primitive for callers that extend
//! the simulation (see `Simulation::negotiate`).

use crate::models::agent::{MedicalAgent, TransportAgent};

/// Answer given by the transport agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationOutcome {
    /// One unit was released; `remaining` is what the transport agent has left
    Accepted { remaining: u32 },

    /// Transport agent had none of the resource; nothing changed
    Declined,
}

impl NegotiationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, NegotiationOutcome::Accepted { .. })
    }
}

/// Request one unit of `resource` from `transport` on behalf of `medical`
///
/// # Example
/// ```
/// use disaster_response_sim_core::allocation::negotiation::{negotiate, NegotiationOutcome};
/// use disaster_response_sim_core::{MedicalAgent, Position, TransportAgent};
///
/// let medic = MedicalAgent::new("M1", Position::new(5, 5), "emergency");
/// let mut truck = TransportAgent::new("T1", Position::new(1, 1), [("medicine", 1)]);
///
/// assert_eq!(negotiate(&medic, &mut truck, "medicine"), NegotiationOutcome::Accepted { remaining: 0 });
/// assert_eq!(negotiate(&medic, &mut truck, "medicine"), NegotiationOutcome::Declined);
/// ```
pub fn negotiate(
    _medical: &MedicalAgent,
    transport: &mut TransportAgent,
    resource: &str,
) -> NegotiationOutcome {
    match transport.take_one(resource) {
        Ok(remaining) => NegotiationOutcome::Accepted { remaining },
        Err(_) => NegotiationOutcome::Declined,
    }
}
