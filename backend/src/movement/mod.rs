//! Distance and movement
//!
//! Movement is a single-step teleport to the destination; there is no
//! pathfinding and no obstacle model. The Manhattan distance is reported
//! as the cost of the move.

use crate::models::agent::Movable;
use crate::models::position::Position;

/// Record of a completed move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub from: Position,
    pub to: Position,
    pub distance: u64,
}

/// Manhattan distance between two grid positions
///
/// Widened to `u64` so any pair of `i32` coordinates is exact.
///
/// # Example
/// ```
/// use disaster_response_sim_core::{distance, Position};
///
/// assert_eq!(distance(Position::new(1, 1), Position::new(7, 7)), 12);
/// assert_eq!(distance(Position::new(3, 4), Position::new(3, 4)), 0);
/// ```
pub fn distance(a: Position, b: Position) -> u64 {
    u64::from(a.x.abs_diff(b.x)) + u64::from(a.y.abs_diff(b.y))
}

/// Move `agent` to `destination` unless it is already there
///
/// Returns the move taken, or `None` when the agent did not move.
pub fn move_agent<A: Movable + ?Sized>(agent: &mut A, destination: Position) -> Option<Movement> {
    let from = agent.position();
    let cost = distance(from, destination);
    if cost == 0 {
        return None;
    }

    agent.set_position(destination);
    Some(Movement {
        from,
        to: destination,
        distance: cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::agent::Agent;

    #[test]
    fn test_distance_extremes() {
        let a = Position::new(i32::MIN, i32::MIN);
        let b = Position::new(i32::MAX, i32::MAX);
        assert_eq!(distance(a, Position::new(i32::MIN, 0)), u64::from(i32::MIN.unsigned_abs()));
        assert_eq!(distance(a, a), 0);
        assert_eq!(distance(b, Position::new(i32::MAX, 0)), i32::MAX as u64);
        assert_eq!(distance(a, b), 2 * u64::from(u32::MAX));
        assert_eq!(distance(b, a), 8_589_934_590);
    }

    #[test]
    fn test_move_agent_teleports() {
        let mut agent = Agent::transport("T1", Position::new(1, 1), [("food", 10)]);
        let movement = move_agent(&mut agent, Position::new(7, 7)).unwrap();

        assert_eq!(movement.from, Position::new(1, 1));
        assert_eq!(movement.to, Position::new(7, 7));
        assert_eq!(movement.distance, 12);
        assert_eq!(agent.position(), Position::new(7, 7));
    }

    #[test]
    fn test_move_agent_noop_when_in_place() {
        let mut agent = Agent::medical("M1", Position::new(2, 2), "emergency");
        assert_eq!(move_agent(&mut agent, Position::new(2, 2)), None);
        assert_eq!(agent.position(), Position::new(2, 2));
    }
}
