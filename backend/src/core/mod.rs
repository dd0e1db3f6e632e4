//! Engine infrastructure shared by the simulation loop

pub mod time;
