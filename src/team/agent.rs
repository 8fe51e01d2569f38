//! Player attribute containers
//!
//! Attributes are fixed for the duration of a game. Per-game working state
//! (fatigue, fouls, points) lives in `sim::state`, never on the agent.

use serde::{Deserialize, Serialize};

/// On-court position, used by the positional matchup policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourtPosition {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
}

impl CourtPosition {
    /// Positions in lineup order
    pub const ALL: [CourtPosition; 5] = [
        CourtPosition::PointGuard,
        CourtPosition::ShootingGuard,
        CourtPosition::SmallForward,
        CourtPosition::PowerForward,
        CourtPosition::Center,
    ];
}

/// One player
///
/// All rating attributes are on a 0-100 scale. `stamina_drain_rate` is the
/// fatigue (0.0-1.0 scale) a player accrues per possession on court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub position: CourtPosition,
    pub scoring: f32,
    pub defense: f32,
    pub iq: f32,
    pub stamina_drain_rate: f32,
}

impl Agent {
    pub fn new(name: &str, position: CourtPosition) -> Self {
        Self {
            name: name.to_string(),
            position,
            scoring: 50.0,
            defense: 50.0,
            iq: 50.0,
            stamina_drain_rate: 0.015,
        }
    }

    /// Test agent: high-scoring guard
    pub fn test_scorer(name: &str) -> Self {
        Self {
            name: name.to_string(),
            position: CourtPosition::ShootingGuard,
            scoring: 75.0,
            defense: 45.0,
            iq: 60.0,
            stamina_drain_rate: 0.015,
        }
    }

    /// Test agent: defensive specialist
    pub fn test_stopper(name: &str) -> Self {
        Self {
            name: name.to_string(),
            position: CourtPosition::PowerForward,
            scoring: 40.0,
            defense: 80.0,
            iq: 55.0,
            stamina_drain_rate: 0.015,
        }
    }

    /// Test agent: cannot score at all (adversarial-ruleset tests)
    pub fn test_brick_layer(name: &str) -> Self {
        Self {
            name: name.to_string(),
            position: CourtPosition::Center,
            scoring: 0.0,
            defense: 95.0,
            iq: 50.0,
            stamina_drain_rate: 0.0,
        }
    }
}
