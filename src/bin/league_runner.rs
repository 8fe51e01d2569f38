//! Headless League Runner
//!
//! Runs one governed round end to end: grants vote tokens, passes a rule
//! change through propose/vote/tally/enact, then simulates a game under
//! the enacted ruleset and prints the result. Debug harness only; round
//! scheduling proper lives outside this crate.

use clap::Parser;
use serde::Serialize;

use hardwood::core::types::{ActorId, ProposalId, Side};
use hardwood::governance::{EventLog, GovernanceEvent, VoteChoice};
use hardwood::rules::{ParamValue, RuleChange, RuleSpace};
use hardwood::sim::simulate_game;
use hardwood::team::Team;

/// Headless League Runner - one governed round for inspection
#[derive(Parser, Debug)]
#[command(name = "league_runner")]
#[command(about = "Run a governed round and print the game result")]
struct Args {
    /// Random seed for the simulated game
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Average scoring attribute of the home roster
    #[arg(long, default_value_t = 70.0)]
    home_scoring: f32,

    /// Average scoring attribute of the away roster
    #[arg(long, default_value_t = 50.0)]
    away_scoring: f32,

    /// Value to enact for three_point_value before tip-off
    #[arg(long, default_value_t = 3)]
    three_point_value: i64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RoundReport {
    ruleset_three_point_value: i64,
    home_score: u32,
    away_score: u32,
    winner: String,
    elam_target: Option<u32>,
    possessions: u32,
    cap_terminated: bool,
    seed: u64,
}

fn main() -> hardwood::core::error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let space = RuleSpace::standard();
    let mut log = EventLog::new(&space);

    // Three governors, each funded with vote tokens
    let governors = [ActorId::new(), ActorId::new(), ActorId::new()];
    for actor in governors {
        log.append(
            GovernanceEvent::Grant {
                to: actor,
                token: hardwood::governance::Token::Vote,
                amount: 10,
            },
            0,
        )?;
    }

    let proposal = ProposalId(1);
    log.append(
        GovernanceEvent::Propose {
            proposal,
            actor: governors[0],
            change: RuleChange::single(
                "three_point_value",
                ParamValue::Int(args.three_point_value),
            ),
            description: format!("set three_point_value to {}", args.three_point_value),
        },
        0,
    )?;

    for actor in governors {
        log.append(
            GovernanceEvent::Vote {
                proposal,
                actor,
                choice: VoteChoice::Yes,
                weight: 1,
            },
            0,
        )?;
    }
    log.append(GovernanceEvent::Tally { proposal }, 0)?;
    log.append(GovernanceEvent::Enact { proposal }, 0)?;

    let ruleset = log.projection().ruleset.clone();
    let home = Team::test_team("Home", args.home_scoring);
    let away = Team::test_team("Away", args.away_scoring);

    let result = simulate_game(&home, &away, &space, &ruleset, args.seed)?;

    let report = RoundReport {
        ruleset_three_point_value: ruleset.int("three_point_value").unwrap_or(0),
        home_score: result.home.score,
        away_score: result.away.score,
        winner: match result.winner {
            Side::Home => home.name.clone(),
            Side::Away => away.name.clone(),
        },
        elam_target: result.elam_target_score,
        possessions: result.possessions,
        cap_terminated: result.cap_terminated,
        seed: result.seed,
    };

    if args.format == "text" {
        println!(
            "{} {} - {} {} (target {:?}, {} possessions, seed {})",
            home.name,
            report.home_score,
            report.away_score,
            away.name,
            report.elam_target,
            report.possessions,
            report.seed
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
