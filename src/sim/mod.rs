//! Deterministic game simulation engine
//!
//! `simulate_game` is a pure, synchronous computation over
//! `(teams, validated ruleset, seed)`. Independent games share no mutable
//! state, so rounds fan out data-parallel over matchups.

pub mod game;
pub mod output;
pub mod possession;
pub mod state;

use rayon::prelude::*;

use crate::core::config::SimTuning;
use crate::rules::{GameRules, RuleError, RuleSet, RuleSpace};
use crate::team::Team;

pub use game::run_game;
pub use output::{GameResult, PlayerLine, TeamLine};
pub use possession::{resolve_possession, PossessionOutcome};
pub use state::{GameState, Period, PlayEvent, PlayKind, ShotType, SubReason};

/// Simulate one game from a validated ruleset with default tuning
///
/// The only fallible step is extracting the typed parameter view; a
/// ruleset that came out of `RuleSpace::validate` cannot fail it.
pub fn simulate_game(
    home: &Team,
    away: &Team,
    space: &RuleSpace,
    ruleset: &RuleSet,
    seed: u64,
) -> Result<GameResult, RuleError> {
    let rules = GameRules::from_ruleset(space, ruleset)?;
    Ok(run_game(home, away, &rules, &SimTuning::default(), seed))
}

/// Simulate a round of independent matchups in parallel
///
/// Each game owns its state and rng; the per-game seed derives from
/// `base_seed` plus the matchup index, so a round is as reproducible as a
/// single game.
pub fn simulate_round(
    matchups: &[(Team, Team)],
    rules: &GameRules,
    base_seed: u64,
) -> Vec<GameResult> {
    matchups
        .par_iter()
        .enumerate()
        .map(|(i, (home, away))| {
            run_game(
                home,
                away,
                rules,
                &SimTuning::default(),
                base_seed.wrapping_add(i as u64),
            )
        })
        .collect()
}
