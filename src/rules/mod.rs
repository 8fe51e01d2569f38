//! Governable rule parameters: schema, validated snapshots, TOML loading

pub mod loader;
pub mod ruleset;
pub mod space;

pub use loader::{load_change, load_rulespace, parse_change_toml, parse_rulespace_toml};
pub use ruleset::{GameRules, MatchupPolicy, RuleChange, RuleSet};
pub use space::{ParamKind, ParamSpec, ParamValue, RuleError, RuleSpace};
