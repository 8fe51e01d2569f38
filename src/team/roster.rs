//! Team rosters and strategy bias
//!
//! Rosters are produced by an external seeding step and referenced, never
//! mutated, by the simulation. The first five roster slots are the starting
//! lineup; the rest is the bench.

use serde::{Deserialize, Serialize};

use crate::team::agent::{Agent, CourtPosition};

/// Offensive strategy bias applied during move selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStrategy {
    /// Fraction of possessions that look for a three-pointer (0.0-1.0)
    pub three_point_bias: f32,
    /// Pace multiplier: above 1.0 plays faster, consuming less clock
    pub pace: f32,
}

impl Default for TeamStrategy {
    fn default() -> Self {
        Self {
            three_point_bias: 0.35,
            pace: 1.0,
        }
    }
}

/// One team: name, roster, strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub roster: Vec<Agent>,
    pub strategy: TeamStrategy,
}

impl Team {
    pub fn new(name: &str, roster: Vec<Agent>) -> Self {
        Self {
            name: name.to_string(),
            roster,
            strategy: TeamStrategy::default(),
        }
    }

    /// Number of starters fielded at tip-off (never more than five)
    pub fn starter_count(&self) -> usize {
        self.roster.len().min(5)
    }

    /// Deterministic eight-player test roster centered on `avg_scoring`
    ///
    /// Attribute spread is fixed (no rng) so tests stay reproducible:
    /// starters alternate above/below the average, bench players sit
    /// slightly below it.
    pub fn test_team(name: &str, avg_scoring: f32) -> Self {
        let spreads: [f32; 8] = [10.0, 5.0, 0.0, -5.0, -10.0, -4.0, -6.0, -8.0];
        let roster = spreads
            .iter()
            .enumerate()
            .map(|(i, spread)| {
                let position = CourtPosition::ALL[i % 5];
                Agent {
                    name: format!("{} #{}", name, i + 1),
                    position,
                    scoring: (avg_scoring + spread).clamp(0.0, 100.0),
                    defense: (avg_scoring - spread * 0.5).clamp(0.0, 100.0),
                    iq: 55.0,
                    stamina_drain_rate: 0.015,
                }
            })
            .collect();

        Self::new(name, roster)
    }

    /// Roster with every player unable to score, for safety-cap tests
    pub fn test_bricklayers(name: &str) -> Self {
        let roster = (0..8)
            .map(|i| {
                let mut agent = Agent::test_brick_layer(&format!("{} #{}", name, i + 1));
                agent.position = CourtPosition::ALL[i % 5];
                agent
            })
            .collect();
        Self::new(name, roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_roster_size() {
        let team = Team::test_team("Reds", 60.0);
        assert_eq!(team.roster.len(), 8);
        assert_eq!(team.starter_count(), 5);
    }

    #[test]
    fn test_team_average_scoring() {
        let team = Team::test_team("Reds", 60.0);
        let starters_avg: f32 =
            team.roster[..5].iter().map(|a| a.scoring).sum::<f32>() / 5.0;
        assert!((starters_avg - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_team_is_deterministic() {
        assert_eq!(Team::test_team("A", 70.0), Team::test_team("A", 70.0));
    }

    #[test]
    fn test_short_roster_starters() {
        let team = Team::new("Tiny", vec![Agent::test_scorer("Solo")]);
        assert_eq!(team.starter_count(), 1);
    }
}
