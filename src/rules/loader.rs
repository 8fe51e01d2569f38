//! Load rule space definitions and rule-change drafts from TOML files
//!
//! The rule space table is versioned data, not derived state; leagues ship
//! it alongside the binary and load it at startup. Drafts arrive from the
//! external interpreter already structured, one TOML table of
//! `parameter = value` pairs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::{LeagueError, Result};
use crate::rules::ruleset::RuleChange;
use crate::rules::space::{ParamKind, ParamSpec, ParamValue, RuleSpace};

#[derive(Debug, Deserialize)]
struct SpaceFile {
    #[serde(default)]
    #[allow(dead_code)]
    version: u32,
    #[serde(rename = "parameter", default)]
    parameters: Vec<ParamEntry>,
}

#[derive(Debug, Deserialize)]
struct ParamEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    min: Option<ParamValue>,
    max: Option<ParamValue>,
    #[serde(default)]
    options: Vec<String>,
    default: ParamValue,
}

fn expect_int(value: &Option<ParamValue>, field: &str, name: &str) -> Result<i64> {
    match value {
        Some(ParamValue::Int(v)) => Ok(*v),
        Some(other) => Err(LeagueError::Definition(format!(
            "{}: expected integer {}, got {}",
            name, field, other
        ))),
        None => Err(LeagueError::Definition(format!(
            "{}: missing {}",
            name, field
        ))),
    }
}

fn expect_float(value: &Option<ParamValue>, field: &str, name: &str) -> Result<f64> {
    match value {
        Some(ParamValue::Float(v)) => Ok(*v),
        // TOML writes `min = 0` for a float parameter as an integer
        Some(ParamValue::Int(v)) => Ok(*v as f64),
        Some(other) => Err(LeagueError::Definition(format!(
            "{}: expected float {}, got {}",
            name, field, other
        ))),
        None => Err(LeagueError::Definition(format!(
            "{}: missing {}",
            name, field
        ))),
    }
}

/// Parse a rule space definition table from TOML text
pub fn parse_rulespace_toml(content: &str) -> Result<RuleSpace> {
    let file: SpaceFile = toml::from_str(content)?;

    let mut specs = Vec::with_capacity(file.parameters.len());
    for entry in file.parameters {
        let kind = match entry.kind.as_str() {
            "int" => ParamKind::Int {
                min: expect_int(&entry.min, "min", &entry.name)?,
                max: expect_int(&entry.max, "max", &entry.name)?,
            },
            "float" => ParamKind::Float {
                min: expect_float(&entry.min, "min", &entry.name)?,
                max: expect_float(&entry.max, "max", &entry.name)?,
            },
            "bool" => ParamKind::Bool,
            "choice" => {
                if entry.options.is_empty() {
                    return Err(LeagueError::Definition(format!(
                        "{}: choice parameter needs options",
                        entry.name
                    )));
                }
                ParamKind::Choice {
                    options: entry.options,
                }
            }
            other => {
                return Err(LeagueError::Definition(format!(
                    "{}: unknown parameter type '{}'",
                    entry.name, other
                )));
            }
        };

        // Float defaults may arrive as TOML integers
        let default = match (&kind, entry.default) {
            (ParamKind::Float { .. }, ParamValue::Int(v)) => ParamValue::Float(v as f64),
            (_, default) => default,
        };

        specs.push(ParamSpec {
            name: entry.name,
            kind,
            default,
        });
    }

    Ok(RuleSpace::new(specs)?)
}

/// Load a rule space definition table from a TOML file
pub fn load_rulespace(path: &Path) -> Result<RuleSpace> {
    let content = fs::read_to_string(path)?;
    parse_rulespace_toml(&content)
}

/// Parse a structured rule-change draft from TOML text
///
/// The draft is a flat table, e.g. `three_point_value = 5`. No validation
/// happens here; the draft is checked against the rule space at the
/// governance boundary.
pub fn parse_change_toml(content: &str) -> Result<RuleChange> {
    let values: BTreeMap<String, ParamValue> = toml::from_str(content)?;

    let mut change = RuleChange::new();
    for (name, value) in values {
        change.set(&name, value);
    }
    Ok(change)
}

/// Load a rule-change draft from a TOML file
pub fn load_change(path: &Path) -> Result<RuleChange> {
    let content = fs::read_to_string(path)?;
    parse_change_toml(&content)
}
