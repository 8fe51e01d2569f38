//! Immutable simulation output
//!
//! A `GameResult` is produced once per game, fully reproducible from
//! `(teams, ruleset, seed)`, and never mutated afterwards. Reporting and
//! commentary layers are read-only consumers.

use serde::{Deserialize, Serialize};

use crate::core::types::Side;
use crate::sim::state::{GameState, PlayEvent};
use crate::team::Team;

/// One player's box-score line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLine {
    pub name: String,
    pub points: u32,
    pub fouls: u8,
    pub fouled_out: bool,
}

/// One team's final line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLine {
    pub name: String,
    pub score: u32,
    pub players: Vec<PlayerLine>,
}

/// Immutable record of one simulated game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub home: TeamLine,
    pub away: TeamLine,
    pub winner: Side,
    pub elam_activated: bool,
    /// Fixed target of the Elam period, if it was reached before the cap
    pub elam_target_score: Option<u32>,
    pub possessions: u32,
    /// Possessions forfeited for lack of eligible players
    pub auto_turnovers: u32,
    /// True when the possession safety cap forced termination; a valid,
    /// flagged outcome distinct from a normal Elam finish
    pub cap_terminated: bool,
    pub seed: u64,
    pub plays: Vec<PlayEvent>,
}

impl GameResult {
    /// Freeze a finished game state into its immutable record
    pub fn freeze(
        home: &Team,
        away: &Team,
        state: GameState,
        winner: Side,
        seed: u64,
    ) -> Self {
        let line = |team: &Team, side_state: &crate::sim::state::TeamGameState| TeamLine {
            name: team.name.clone(),
            score: side_state.score,
            players: team
                .roster
                .iter()
                .zip(side_state.players.iter())
                .map(|(agent, p)| PlayerLine {
                    name: agent.name.clone(),
                    points: p.points,
                    fouls: p.fouls,
                    fouled_out: p.fouled_out,
                })
                .collect(),
        };

        Self {
            home: line(home, &state.home),
            away: line(away, &state.away),
            winner,
            elam_activated: state.elam_activated,
            elam_target_score: state.elam_target,
            possessions: state.possessions,
            auto_turnovers: state.auto_turnovers,
            cap_terminated: state.cap_terminated,
            seed,
            plays: state.plays,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home.score,
            Side::Away => self.away.score,
        }
    }

    /// Final margin of victory
    pub fn margin(&self) -> u32 {
        self.score(self.winner) - self.score(self.winner.opponent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freeze_preserves_box_score() {
        let home = Team::test_team("H", 60.0);
        let away = Team::test_team("A", 55.0);
        let mut state = GameState::new(8, 8, 600.0);
        state.add_points(Side::Home, 0, 5);
        state.home.players[0].fouls = 3;

        let result = GameResult::freeze(&home, &away, state, Side::Home, 7);

        assert_eq!(result.home.score, 5);
        assert_eq!(result.home.players[0].points, 5);
        assert_eq!(result.home.players[0].fouls, 3);
        assert_eq!(result.home.players[0].name, home.roster[0].name);
        assert_eq!(result.seed, 7);
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let home = Team::test_team("H", 60.0);
        let away = Team::test_team("A", 55.0);
        let state = GameState::new(8, 8, 600.0);
        let result = GameResult::freeze(&home, &away, state, Side::Home, 7);

        let json = serde_json::to_string(&result).unwrap();
        let back: GameResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
