use thiserror::Error;

/// Crate-wide error: every fallible public surface funnels into this
#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("Rule validation failed: {0}")]
    Rule(#[from] crate::rules::RuleError),

    #[error("Governance event rejected: {0}")]
    Governance(#[from] crate::governance::GovernanceError),

    #[error("Malformed rule definition: {0}")]
    Definition(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LeagueError>;
