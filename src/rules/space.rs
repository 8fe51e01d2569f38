//! The closed schema of governable parameters
//!
//! Every parameter the league can vote on is declared here with its value
//! type, legal range, and default. The schema is closed: no parameter
//! reaches the simulation without an entry, and no value reaches the
//! simulation without passing range validation.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::rules::ruleset::{RuleChange, RuleSet};

/// A single governable parameter value
///
/// Closed tagged union. Untagged serde representation so TOML drafts can
/// write `three_point_value = 5` directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Choice(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Choice(v) => write!(f, "{}", v),
        }
    }
}

/// The type and legal range of one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamKind {
    Int { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Bool,
    Choice { options: Vec<String> },
}

impl ParamKind {
    /// Does this kind admit the given value?
    ///
    /// A mistyped value is treated the same as an out-of-range one: the
    /// kind simply does not admit it.
    pub fn admits(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParamKind::Int { min, max }, ParamValue::Int(v)) => (min..=max).contains(&v),
            (ParamKind::Float { min, max }, ParamValue::Float(v)) => (min..=max).contains(&v),
            (ParamKind::Bool, ParamValue::Bool(_)) => true,
            (ParamKind::Choice { options }, ParamValue::Choice(v)) => {
                options.iter().any(|o| o == v)
            }
            _ => false,
        }
    }

    /// Is the legal range empty?
    pub fn is_empty(&self) -> bool {
        match self {
            ParamKind::Int { min, max } => min > max,
            ParamKind::Float { min, max } => min > max,
            ParamKind::Bool => false,
            ParamKind::Choice { options } => options.is_empty(),
        }
    }

    /// Human-readable range description for error messages
    pub fn describe(&self) -> String {
        match self {
            ParamKind::Int { min, max } => format!("int {}..={}", min, max),
            ParamKind::Float { min, max } => format!("float {}..={}", min, max),
            ParamKind::Bool => "bool".to_string(),
            ParamKind::Choice { options } => format!("one of {{{}}}", options.join(", ")),
        }
    }
}

/// Validation failures at the rule boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("unknown parameter '{name}'")]
    UnknownParameter { name: String },

    #[error("parameter '{parameter}' = {value} is outside allowed {allowed}")]
    OutOfRange {
        parameter: String,
        value: ParamValue,
        allowed: String,
    },

    #[error("parameter '{name}' declares an empty range")]
    EmptyRange { name: String },

    #[error("default for parameter '{name}' violates its own range")]
    BadDefault { name: String },
}

/// One entry of the schema: name, kind, default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub default: ParamValue,
}

impl ParamSpec {
    pub fn new(name: &str, kind: ParamKind, default: ParamValue) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default,
        }
    }
}

/// The versioned table of every governable parameter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleSpace {
    entries: AHashMap<String, ParamSpec>,
}

impl RuleSpace {
    /// Build a rule space from a list of specs
    ///
    /// Rejects empty ranges and defaults outside their own range, so a
    /// constructed space is always internally consistent.
    pub fn new(specs: Vec<ParamSpec>) -> Result<Self, RuleError> {
        let mut entries = AHashMap::new();
        for spec in specs {
            if spec.kind.is_empty() {
                return Err(RuleError::EmptyRange { name: spec.name });
            }
            if !spec.kind.admits(&spec.default) {
                return Err(RuleError::BadDefault { name: spec.name });
            }
            entries.insert(spec.name.clone(), spec);
        }
        Ok(Self { entries })
    }

    /// The standard league rule space
    pub fn standard() -> Self {
        let specs = vec![
            ParamSpec::new(
                "two_point_value",
                ParamKind::Int { min: 1, max: 10 },
                ParamValue::Int(2),
            ),
            ParamSpec::new(
                "three_point_value",
                ParamKind::Int { min: 1, max: 10 },
                ParamValue::Int(3),
            ),
            ParamSpec::new(
                "free_throw_value",
                ParamKind::Int { min: 0, max: 5 },
                ParamValue::Int(1),
            ),
            ParamSpec::new(
                "quarter_minutes",
                ParamKind::Int { min: 1, max: 20 },
                ParamValue::Int(10),
            ),
            ParamSpec::new(
                "elam_trigger_quarter",
                ParamKind::Int { min: 1, max: 8 },
                ParamValue::Int(3),
            ),
            ParamSpec::new(
                "elam_margin",
                ParamKind::Int { min: 1, max: 50 },
                ParamValue::Int(15),
            ),
            ParamSpec::new(
                "shot_clock_seconds",
                ParamKind::Int { min: 4, max: 60 },
                ParamValue::Int(24),
            ),
            ParamSpec::new(
                "foul_out_limit",
                ParamKind::Int { min: 1, max: 10 },
                ParamValue::Int(6),
            ),
            ParamSpec::new("and_one_enabled", ParamKind::Bool, ParamValue::Bool(true)),
            ParamSpec::new(
                "matchup_policy",
                ParamKind::Choice {
                    options: vec![
                        "positional".to_string(),
                        "best_on_best".to_string(),
                        "scrambled".to_string(),
                    ],
                },
                ParamValue::Choice("positional".to_string()),
            ),
            ParamSpec::new(
                "vote_quorum",
                ParamKind::Int { min: 1, max: 1000 },
                ParamValue::Int(3),
            ),
            ParamSpec::new(
                "vote_majority",
                ParamKind::Float { min: 0.5, max: 1.0 },
                ParamValue::Float(0.5),
            ),
        ];

        Self::new(specs).expect("standard rule space entries are valid")
    }

    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamSpec> {
        self.entries.values()
    }

    /// A complete ruleset with every parameter at its default
    pub fn default_ruleset(&self) -> RuleSet {
        RuleSet::from_values(
            self.entries
                .values()
                .map(|s| (s.name.clone(), s.default.clone()))
                .collect(),
        )
    }

    /// Apply a rule-change diff to the live ruleset and validate the result
    ///
    /// A change is always a diff: parameters it does not mention keep
    /// their value from `current` (not the hard default). Any unknown
    /// parameter name or inadmissible value rejects the whole change,
    /// identifying exactly the offending field. Pure; no side effects.
    pub fn validate(&self, current: &RuleSet, change: &RuleChange) -> Result<RuleSet, RuleError> {
        for (name, value) in change.iter() {
            let spec = self
                .entries
                .get(name)
                .ok_or_else(|| RuleError::UnknownParameter { name: name.clone() })?;
            if !spec.kind.admits(value) {
                return Err(RuleError::OutOfRange {
                    parameter: name.clone(),
                    value: value.clone(),
                    allowed: spec.kind.describe(),
                });
            }
        }

        // Start from the live values, fill any gap from the defaults, then
        // overlay the diff. The result is always fully specified.
        let mut values = std::collections::BTreeMap::new();
        for spec in self.entries.values() {
            let value = current
                .get(&spec.name)
                .cloned()
                .unwrap_or_else(|| spec.default.clone());
            values.insert(spec.name.clone(), value);
        }
        for (name, value) in change.iter() {
            values.insert(name.clone(), value.clone());
        }

        Ok(RuleSet::from_values(values))
    }
}
