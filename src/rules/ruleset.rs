//! Validated rule snapshots and the typed view the simulation consumes
//!
//! A `RuleSet` is immutable once created and always fully specified; it is
//! superseded by enactments, never edited. The simulation never reads the
//! dynamic map directly: it extracts a `GameRules` once at game start so a
//! mistyped parameter can never surface mid-game.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::rules::space::{ParamValue, RuleError, RuleSpace};

/// A complete, validated snapshot of parameter values
///
/// Construction goes through `RuleSpace::validate` (or
/// `RuleSpace::default_ruleset`); the map is private so no invalid value
/// can be inserted after the fact. BTreeMap keeps iteration and
/// serialization order deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    values: BTreeMap<String, ParamValue>,
}

impl RuleSet {
    pub(crate) fn from_values(values: BTreeMap<String, ParamValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ParamValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ParamValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ParamValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn choice(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParamValue::Choice(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A structured rule-change draft: a diff against the live ruleset
///
/// Produced outside the core (the free-text interpreter is an external,
/// sandboxed collaborator) and trusted only after `RuleSpace::validate`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleChange {
    values: BTreeMap<String, ParamValue>,
}

impl RuleChange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-parameter change, the common case
    pub fn single(name: &str, value: ParamValue) -> Self {
        let mut change = Self::new();
        change.set(name, value);
        change
    }

    pub fn set(&mut self, name: &str, value: ParamValue) -> &mut Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Names of the parameters this change touches
    pub fn parameters(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Defensive matchup assignment policy (governable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchupPolicy {
    /// Defender at the same roster position guards the shooter
    Positional,
    /// The best available defender guards every shot
    BestOnBest,
    /// A random eligible defender contests each shot
    Scrambled,
}

impl MatchupPolicy {
    fn from_choice(s: &str) -> Option<Self> {
        match s {
            "positional" => Some(MatchupPolicy::Positional),
            "best_on_best" => Some(MatchupPolicy::BestOnBest),
            "scrambled" => Some(MatchupPolicy::Scrambled),
            _ => None,
        }
    }
}

/// Typed parameter view consumed by the simulation engine
///
/// Extracted once per game from a validated `RuleSet`; every field is
/// already the concrete type the possession resolver needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRules {
    pub two_point_value: u32,
    pub three_point_value: u32,
    pub free_throw_value: u32,
    pub quarter_seconds: f32,
    pub elam_trigger_quarter: u8,
    pub elam_margin: u32,
    pub shot_clock_seconds: f32,
    pub foul_out_limit: u8,
    pub and_one_enabled: bool,
    pub matchup_policy: MatchupPolicy,
}

impl GameRules {
    pub fn from_ruleset(space: &RuleSpace, ruleset: &RuleSet) -> Result<Self, RuleError> {
        fn int(ruleset: &RuleSet, name: &str) -> Result<i64, RuleError> {
            ruleset.int(name).ok_or_else(|| RuleError::UnknownParameter {
                name: name.to_string(),
            })
        }

        let matchup_raw = ruleset
            .choice("matchup_policy")
            .ok_or_else(|| RuleError::UnknownParameter {
                name: "matchup_policy".to_string(),
            })?;
        let matchup_policy =
            MatchupPolicy::from_choice(matchup_raw).ok_or_else(|| RuleError::OutOfRange {
                parameter: "matchup_policy".to_string(),
                value: ParamValue::Choice(matchup_raw.to_string()),
                allowed: space
                    .get("matchup_policy")
                    .map(|s| s.kind.describe())
                    .unwrap_or_default(),
            })?;

        Ok(Self {
            two_point_value: int(ruleset, "two_point_value")? as u32,
            three_point_value: int(ruleset, "three_point_value")? as u32,
            free_throw_value: int(ruleset, "free_throw_value")? as u32,
            quarter_seconds: int(ruleset, "quarter_minutes")? as f32 * 60.0,
            elam_trigger_quarter: int(ruleset, "elam_trigger_quarter")? as u8,
            elam_margin: int(ruleset, "elam_margin")? as u32,
            shot_clock_seconds: int(ruleset, "shot_clock_seconds")? as f32,
            foul_out_limit: int(ruleset, "foul_out_limit")? as u8,
            and_one_enabled: ruleset.flag("and_one_enabled").unwrap_or(true),
            matchup_policy,
        })
    }
}
