//! Rosters and player attribute containers

pub mod agent;
pub mod roster;

pub use agent::{Agent, CourtPosition};
pub use roster::{Team, TeamStrategy};
