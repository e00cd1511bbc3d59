use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::error::ConfigError;

/// Load application configuration from environment variables.
///
/// Loading `.env` files is the caller's job (the CLI calls
/// `dotenvy::dotenv().ok()` before this); this function only reads the
/// process environment.
///
/// # Errors
///
/// Returns `ConfigError` if any `PORTALCHECK_*` value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function.
///
/// The parsing/validation logic is decoupled from the real environment so
/// tests can drive it with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("PORTALCHECK_ENV", "development"));
    let log_level = or_default("PORTALCHECK_LOG_LEVEL", "info");
    let store_path = PathBuf::from(or_default("PORTALCHECK_STORE_PATH", "./data"));
    let rewards_path = lookup("PORTALCHECK_REWARDS_PATH").ok().map(PathBuf::from);

    // One hour, matching the session restore TTL.
    let session_ttl_ms = parse_i64("PORTALCHECK_SESSION_TTL_MS", "3600000")?;
    if session_ttl_ms <= 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PORTALCHECK_SESSION_TTL_MS".to_string(),
            reason: format!("must be positive, got {session_ttl_ms}"),
        });
    }

    let bus_capacity = parse_usize("PORTALCHECK_BUS_CAPACITY", "32")?;
    if bus_capacity == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PORTALCHECK_BUS_CAPACITY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        store_path,
        rewards_path,
        session_ttl_ms,
        bus_capacity,
    })
}

fn parse_environment(raw: &str) -> Environment {
    match raw {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.store_path, PathBuf::from("./data"));
        assert!(cfg.rewards_path.is_none());
        assert_eq!(cfg.session_ttl_ms, 3_600_000);
        assert_eq!(cfg.bus_capacity, 32);
    }

    #[test]
    fn environment_override() {
        let mut map = HashMap::new();
        map.insert("PORTALCHECK_ENV", "production");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Production);
    }

    #[test]
    fn unknown_environment_falls_back_to_development() {
        let mut map = HashMap::new();
        map.insert("PORTALCHECK_ENV", "staging");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
    }

    #[test]
    fn ttl_override() {
        let mut map = HashMap::new();
        map.insert("PORTALCHECK_SESSION_TTL_MS", "60000");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.session_ttl_ms, 60_000);
    }

    #[test]
    fn non_numeric_ttl_fails() {
        let mut map = HashMap::new();
        map.insert("PORTALCHECK_SESSION_TTL_MS", "an-hour");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. })
                if var == "PORTALCHECK_SESSION_TTL_MS"),
            "expected InvalidEnvVar(PORTALCHECK_SESSION_TTL_MS), got: {result:?}"
        );
    }

    #[test]
    fn non_positive_ttl_fails() {
        let mut map = HashMap::new();
        map.insert("PORTALCHECK_SESSION_TTL_MS", "0");
        assert!(build_app_config(lookup_from_map(&map)).is_err());
    }

    #[test]
    fn zero_bus_capacity_fails() {
        let mut map = HashMap::new();
        map.insert("PORTALCHECK_BUS_CAPACITY", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. })
                if var == "PORTALCHECK_BUS_CAPACITY")
        );
    }

    #[test]
    fn rewards_path_is_picked_up_when_set() {
        let mut map = HashMap::new();
        map.insert("PORTALCHECK_REWARDS_PATH", "./config/rewards.yaml");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.rewards_path,
            Some(PathBuf::from("./config/rewards.yaml"))
        );
    }
}
