//! Possession resolution
//!
//! Resolves one offense-vs-defense exchange: move selection, defensive
//! matchup, probability composition, outcome draw, scoring, fatigue, and
//! clock. Side effects are limited to the passed-in `GameState` and the
//! deterministic advance of the passed-in rng; the same seed and draw
//! sequence always reproduce the same outcome.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::core::config::SimTuning;
use crate::core::types::Side;
use crate::rules::{GameRules, MatchupPolicy};
use crate::sim::state::{GameState, Period, PlayKind, ShotType};
use crate::team::{Agent, Team};

/// How a possession resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PossessionOutcome {
    /// Total points scored this possession (shot plus any free throws)
    Points(u32),
    Miss,
    Turnover,
    /// Forfeited: no eligible player could take the floor
    AutoTurnover,
}

/// Logistic make probability from a rating-vs-difficulty gap
fn logistic(rating: f32, difficulty: f32, scale: f32) -> f32 {
    1.0 / (1.0 + (-(rating - difficulty) / scale).exp())
}

/// Defensive contest multiplier, bounded to `contest_floor`..=1.0
fn contest_multiplier(defender: Option<&Agent>, tuning: &SimTuning) -> f32 {
    match defender {
        Some(agent) => {
            let reduction = (agent.defense / 100.0) * (1.0 - tuning.contest_floor);
            (1.0 - reduction).clamp(tuning.contest_floor, 1.0)
        }
        None => 1.0,
    }
}

/// IQ modifier, bounded to `iq_floor`..=`iq_ceiling`
fn iq_modifier(iq: f32, tuning: &SimTuning) -> f32 {
    let t = (iq / 100.0).clamp(0.0, 1.0);
    tuning.iq_floor + t * (tuning.iq_ceiling - tuning.iq_floor)
}

/// Stamina modifier, bounded to `stamina_floor`..=1.0
fn stamina_modifier(fatigue: f32, tuning: &SimTuning) -> f32 {
    (1.0 - fatigue * (1.0 - tuning.stamina_floor)).clamp(tuning.stamina_floor, 1.0)
}

/// Pick the shooter: weighted by scoring among the eligible five
fn select_shooter(team: &Team, eligible: &[usize], rng: &mut ChaCha8Rng) -> usize {
    let total: f32 = eligible.iter().map(|&i| team.roster[i].scoring + 1.0).sum();
    let mut draw = rng.gen::<f32>() * total;
    for &idx in eligible {
        draw -= team.roster[idx].scoring + 1.0;
        if draw <= 0.0 {
            return idx;
        }
    }
    // Rounding remainder lands on the last eligible player
    eligible[eligible.len() - 1]
}

/// Pick the shot type from the offense's strategy bias
fn select_shot(team: &Team, rng: &mut ChaCha8Rng) -> ShotType {
    if rng.gen::<f32>() < team.strategy.three_point_bias {
        ShotType::ThreePointer
    } else if rng.gen::<f32>() < 0.5 {
        ShotType::Layup
    } else {
        ShotType::MidRange
    }
}

/// Pick the primary defender's roster index via the governable matchup policy
fn select_defender(
    defense: &Team,
    eligible: &[usize],
    shooter: &Agent,
    policy: MatchupPolicy,
    rng: &mut ChaCha8Rng,
) -> Option<usize> {
    if eligible.is_empty() {
        return None;
    }
    let idx = match policy {
        MatchupPolicy::Positional => eligible
            .iter()
            .copied()
            .find(|&i| defense.roster[i].position == shooter.position)
            .unwrap_or(eligible[0]),
        MatchupPolicy::BestOnBest => eligible
            .iter()
            .copied()
            .fold(eligible[0], |best, i| {
                if defense.roster[i].defense > defense.roster[best].defense {
                    i
                } else {
                    best
                }
            }),
        MatchupPolicy::Scrambled => eligible[rng.gen_range(0..eligible.len())],
    };
    Some(idx)
}

fn shot_difficulty(shot: ShotType, tuning: &SimTuning) -> f32 {
    match shot {
        ShotType::ThreePointer => tuning.three_difficulty,
        ShotType::MidRange => tuning.mid_difficulty,
        ShotType::Layup => tuning.layup_difficulty,
    }
}

fn shot_value(shot: ShotType, rules: &GameRules) -> u32 {
    match shot {
        ShotType::ThreePointer => rules.three_point_value,
        ShotType::MidRange | ShotType::Layup => rules.two_point_value,
    }
}

/// Nominal free-throw attempts awarded for a shooting foul on a miss
fn foul_shot_count(shot: ShotType) -> u32 {
    match shot {
        ShotType::ThreePointer => 3,
        ShotType::MidRange | ShotType::Layup => 2,
    }
}

/// Shoot free throws, crediting each make as its own scoring event
///
/// Stops the moment the Elam target is reached: the game ends the instant
/// a score meets the target, so remaining attempts are never taken.
fn shoot_free_throws(
    shooter: &Agent,
    shooter_idx: usize,
    attempts: u32,
    off_side: Side,
    rules: &GameRules,
    tuning: &SimTuning,
    state: &mut GameState,
    rng: &mut ChaCha8Rng,
) -> u32 {
    let iq_mod = iq_modifier(shooter.iq, tuning);
    let p_make = (logistic(shooter.scoring, tuning.free_throw_difficulty, tuning.logistic_scale)
        * iq_mod)
        .clamp(0.05, 0.99);

    let mut made = 0;
    let mut taken = 0;
    let mut points = 0;
    for _ in 0..attempts {
        if state.elam_reached() {
            break;
        }
        taken += 1;
        if rng.gen::<f32>() < p_make {
            made += 1;
            points += rules.free_throw_value;
            state.add_points(off_side, shooter_idx, rules.free_throw_value);
        }
    }

    state.push_play(
        Some(off_side),
        PlayKind::FreeThrows {
            shooter: shooter.name.clone(),
            made,
            attempted: taken,
            points,
        },
    );
    points
}

/// Resolve one possession, mutating `state` and advancing `rng`
///
/// Never errors: an exhausted roster degrades to an implicit turnover so
/// every scheduled game still produces a result.
pub fn resolve_possession(
    offense: &Team,
    defense: &Team,
    off_side: Side,
    rules: &GameRules,
    tuning: &SimTuning,
    state: &mut GameState,
    rng: &mut ChaCha8Rng,
) -> PossessionOutcome {
    state.possessions += 1;
    let timed = matches!(state.period, Period::Quarter(_));

    let shooters = state.team(off_side).eligible_on_court();
    let defenders = state.team(off_side.opponent()).eligible_on_court();

    let outcome = if shooters.is_empty() {
        state.auto_turnovers += 1;
        state.push_play(Some(off_side), PlayKind::AutoTurnover);
        trace!(side = ?off_side, "no eligible players, possession forfeited");
        PossessionOutcome::AutoTurnover
    } else {
        let shooter_idx = select_shooter(offense, &shooters, rng);
        let shooter = &offense.roster[shooter_idx];
        let shot = select_shot(offense, rng);
        let defender_idx =
            select_defender(defense, &defenders, shooter, rules.matchup_policy, rng);
        let defender = defender_idx.map(|i| &defense.roster[i]);

        let fatigue = state.team(off_side).players[shooter_idx].fatigue;
        let iq_mod = iq_modifier(shooter.iq, tuning);
        let base = logistic(shooter.scoring, shot_difficulty(shot, tuning), tuning.logistic_scale);
        let p_make = (base
            * contest_multiplier(defender, tuning)
            * iq_mod
            * stamina_modifier(fatigue, tuning))
        .clamp(0.01, 0.99);

        // Low-IQ offenses cough the ball up more often
        let turnover_chance = (tuning.base_turnover_chance * (2.0 - iq_mod)).clamp(0.0, 1.0);

        if rng.gen::<f32>() < turnover_chance {
            state.push_play(
                Some(off_side),
                PlayKind::Turnover {
                    culprit: shooter.name.clone(),
                },
            );
            PossessionOutcome::Turnover
        } else {
            let fouled = defender.is_some() && rng.gen::<f32>() < tuning.base_foul_chance;
            let made = rng.gen::<f32>() < p_make;

            if fouled {
                // Attribute the foul before resolving free throws
                let defender_name = defender.map(|d| d.name.clone()).unwrap_or_default();
                if let Some(idx) = defender_idx {
                    let def_team = state.team_mut(off_side.opponent());
                    if let Some(p) = def_team.players.get_mut(idx) {
                        p.fouls += 1;
                    }
                }
                state.push_play(
                    Some(off_side),
                    PlayKind::ShootingFoul {
                        shooter: shooter.name.clone(),
                        defender: defender_name,
                    },
                );
            }

            if made {
                let points = shot_value(shot, rules);
                state.add_points(off_side, shooter_idx, points);
                state.push_play(
                    Some(off_side),
                    PlayKind::Make {
                        shooter: shooter.name.clone(),
                        shot,
                        points,
                    },
                );

                let mut total = points;
                // And-one: a single bonus attempt, skipped if the make
                // already ended the game at the Elam target
                if fouled && rules.and_one_enabled && !state.elam_reached() {
                    total += shoot_free_throws(
                        shooter,
                        shooter_idx,
                        1,
                        off_side,
                        rules,
                        tuning,
                        state,
                        rng,
                    );
                }
                PossessionOutcome::Points(total)
            } else if fouled {
                let attempts = foul_shot_count(shot);
                let points = shoot_free_throws(
                    shooter,
                    shooter_idx,
                    attempts,
                    off_side,
                    rules,
                    tuning,
                    state,
                    rng,
                );
                if points > 0 {
                    PossessionOutcome::Points(points)
                } else {
                    PossessionOutcome::Miss
                }
            } else {
                state.push_play(
                    Some(off_side),
                    PlayKind::Miss {
                        shooter: shooter.name.clone(),
                        shot,
                    },
                );
                PossessionOutcome::Miss
            }
        }
    };

    // Fatigue accrues for everyone on the floor, both sides
    for (side, team) in [(off_side, offense), (off_side.opponent(), defense)] {
        let game_team = state.team_mut(side);
        for (idx, player) in game_team.players.iter_mut().enumerate() {
            if player.on_court && !player.fouled_out {
                if let Some(agent) = team.roster.get(idx) {
                    player.fatigue = (player.fatigue + agent.stamina_drain_rate).min(1.0);
                }
            }
        }
    }

    // Elam periods never touch the clock
    if timed {
        let floor = tuning.min_possession_seconds.min(rules.shot_clock_seconds);
        let span = rng.gen_range(floor..=rules.shot_clock_seconds);
        let pace = offense.strategy.pace.max(0.1);
        state.clock_seconds = (state.clock_seconds - span / pace).max(0.0);
    }

    outcome
}
