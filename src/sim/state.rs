//! Mutable working state for one simulated game
//!
//! A `GameState` is exclusively owned by the in-flight simulation call and
//! has no lifetime outside it; at game end it is frozen into a `GameResult`.
//! Scores are monotonically non-decreasing, the possession counter only
//! increases, and once the Elam period activates it never reverts.

use serde::{Deserialize, Serialize};

use crate::core::types::Side;

/// Game period: timed quarters, then the untimed Elam ending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Quarter(u8),
    Elam,
}

/// Shot categories the move selector can pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotType {
    ThreePointer,
    MidRange,
    Layup,
}

/// Why a player left or entered the floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubReason {
    Fatigue,
    FoulOut,
}

/// One entry of the play-by-play log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayKind {
    Make {
        shooter: String,
        shot: ShotType,
        points: u32,
    },
    Miss {
        shooter: String,
        shot: ShotType,
    },
    ShootingFoul {
        shooter: String,
        defender: String,
    },
    FreeThrows {
        shooter: String,
        made: u32,
        attempted: u32,
        points: u32,
    },
    Turnover {
        culprit: String,
    },
    /// Possession forfeited because no eligible player remained
    AutoTurnover,
    FouledOut {
        player: String,
    },
    Substitution {
        player_out: String,
        player_in: String,
        reason: SubReason,
    },
    PeriodEnd {
        period: Period,
    },
    ElamActivated {
        target: u32,
    },
    /// Forced termination at the possession safety cap
    SafetyCap,
}

/// A play with the running score after it resolved
///
/// `side` is `None` for administrative plays (period end, Elam activation,
/// safety cap) that belong to neither offense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    pub possession: u32,
    pub period: Period,
    pub side: Option<Side>,
    pub kind: PlayKind,
    pub home_score: u32,
    pub away_score: u32,
}

/// Per-player working state; the roster agent itself is never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameState {
    /// Accumulated fatigue, 0.0 (fresh) to 1.0 (gassed)
    pub fatigue: f32,
    pub fouls: u8,
    pub points: u32,
    pub on_court: bool,
    pub fouled_out: bool,
}

impl PlayerGameState {
    fn new(on_court: bool) -> Self {
        Self {
            fatigue: 0.0,
            fouls: 0,
            points: 0,
            on_court,
            fouled_out: false,
        }
    }
}

/// Working state for one side of the matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGameState {
    pub score: u32,
    /// Parallel to the team's roster vector
    pub players: Vec<PlayerGameState>,
}

impl TeamGameState {
    fn new(roster_size: usize) -> Self {
        Self {
            score: 0,
            players: (0..roster_size)
                .map(|i| PlayerGameState::new(i < 5))
                .collect(),
        }
    }

    /// Roster indices currently on the floor and not fouled out
    pub fn eligible_on_court(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.on_court && !p.fouled_out)
            .map(|(i, _)| i)
            .collect()
    }

    /// Bench index with the lowest fatigue, if any player is available
    pub fn freshest_bench(&self) -> Option<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.on_court && !p.fouled_out)
            .min_by(|(_, a), (_, b)| {
                a.fatigue
                    .partial_cmp(&b.fatigue)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }
}

/// Mutable state for one simulated game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub home: TeamGameState,
    pub away: TeamGameState,
    pub period: Period,
    /// Seconds remaining in the current timed period; unused during Elam
    pub clock_seconds: f32,
    pub elam_activated: bool,
    /// Fixed once at Elam activation; never recomputed
    pub elam_target: Option<u32>,
    pub possessions: u32,
    pub auto_turnovers: u32,
    pub cap_terminated: bool,
    pub plays: Vec<PlayEvent>,
}

impl GameState {
    pub fn new(home_roster: usize, away_roster: usize, quarter_seconds: f32) -> Self {
        Self {
            home: TeamGameState::new(home_roster),
            away: TeamGameState::new(away_roster),
            period: Period::Quarter(1),
            clock_seconds: quarter_seconds,
            elam_activated: false,
            elam_target: None,
            possessions: 0,
            auto_turnovers: 0,
            cap_terminated: false,
            plays: Vec::new(),
        }
    }

    pub fn team(&self, side: Side) -> &TeamGameState {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut TeamGameState {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        self.team(side).score
    }

    /// Credit points to a side and its shooter; returns the new team score
    pub fn add_points(&mut self, side: Side, player_idx: usize, points: u32) -> u32 {
        let team = self.team_mut(side);
        team.score += points;
        if let Some(player) = team.players.get_mut(player_idx) {
            player.points += points;
        }
        team.score
    }

    /// Has either side met or exceeded the Elam target?
    ///
    /// Checked after every discrete scoring event; the winning score may
    /// overshoot the target by the value of the final play.
    pub fn elam_reached(&self) -> bool {
        match self.elam_target {
            Some(target) => self.home.score >= target || self.away.score >= target,
            None => false,
        }
    }

    /// Record a play, capturing the running score
    pub fn push_play(&mut self, side: Option<Side>, kind: PlayKind) {
        self.plays.push(PlayEvent {
            possession: self.possessions,
            period: self.period,
            side,
            kind,
            home_score: self.home.score,
            away_score: self.away.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starters_on_court() {
        let state = GameState::new(8, 8, 600.0);
        assert_eq!(state.home.eligible_on_court().len(), 5);
        assert_eq!(state.away.eligible_on_court().len(), 5);
    }

    #[test]
    fn test_short_roster_all_on_court() {
        let state = GameState::new(3, 8, 600.0);
        assert_eq!(state.home.eligible_on_court().len(), 3);
    }

    #[test]
    fn test_add_points_updates_team_and_player() {
        let mut state = GameState::new(8, 8, 600.0);
        let new_score = state.add_points(Side::Away, 2, 3);
        assert_eq!(new_score, 3);
        assert_eq!(state.away.score, 3);
        assert_eq!(state.away.players[2].points, 3);
        assert_eq!(state.home.score, 0);
    }

    #[test]
    fn test_elam_target_check() {
        let mut state = GameState::new(8, 8, 600.0);
        state.elam_target = Some(10);
        assert!(!state.elam_reached());
        state.add_points(Side::Home, 0, 10);
        assert!(state.elam_reached());
    }

    #[test]
    fn test_freshest_bench_prefers_low_fatigue() {
        let mut state = GameState::new(8, 8, 600.0);
        state.home.players[5].fatigue = 0.4;
        state.home.players[6].fatigue = 0.1;
        state.home.players[7].fatigue = 0.9;
        assert_eq!(state.home.freshest_bench(), Some(6));
    }

    #[test]
    fn test_fouled_out_bench_not_selected() {
        let mut state = GameState::new(6, 6, 600.0);
        state.home.players[5].fouled_out = true;
        assert_eq!(state.home.freshest_bench(), None);
    }

    #[test]
    fn test_play_log_captures_running_score() {
        let mut state = GameState::new(8, 8, 600.0);
        state.possessions = 1;
        state.add_points(Side::Home, 0, 2);
        state.push_play(
            Some(Side::Home),
            PlayKind::Make {
                shooter: "X".into(),
                shot: ShotType::Layup,
                points: 2,
            },
        );
        assert_eq!(state.plays[0].home_score, 2);
        assert_eq!(state.plays[0].away_score, 0);
    }
}
