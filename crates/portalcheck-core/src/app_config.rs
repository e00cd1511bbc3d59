use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level configuration, read from `PORTALCHECK_*` env vars.
///
/// Everything has a default: the engine is meant to run out of the box with
/// an empty environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Directory holding persisted session records.
    pub store_path: PathBuf,
    /// Optional rewards YAML; defaults apply when absent.
    pub rewards_path: Option<PathBuf>,
    /// Maximum age of a persisted session eligible for restore.
    pub session_ttl_ms: i64,
    /// Context-bus buffer depth for slow subscribers.
    pub bus_capacity: usize,
}
