//! Server configuration

use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::BCRYPT_COST;

#[derive(Debug, Error)]
#[error("Invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// SQLite database file; in-memory stores when unset
    pub database_path: Option<PathBuf>,

    /// Bearer token lifetime
    pub session_ttl_hours: i64,

    /// bcrypt cost for new password hashes
    pub password_cost: u32,

    /// Built front end to serve for non-API paths
    pub static_dir: Option<PathBuf>,

    /// Allowed CORS origins; any origin when empty
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            database_path: None,
            session_ttl_hours: 24 * 7,
            password_cost: BCRYPT_COST,
            static_dir: None,
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(port) = lookup("PORT") {
            config.port = parse("PORT", port)?;
        }
        if let Some(path) = lookup("DATABASE_PATH").filter(|p| !p.is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Some(hours) = lookup("SESSION_TTL_HOURS") {
            config.session_ttl_hours = parse("SESSION_TTL_HOURS", hours)?;
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            config.password_cost = parse("BCRYPT_COST", cost)?;
        }
        if let Some(dir) = lookup("STATIC_DIR").filter(|d| !d.is_empty()) {
            config.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(config)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError { name, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert!(config.database_path.is_none());
        assert_eq!(config.session_ttl(), chrono::Duration::days(7));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DATABASE_PATH", "/tmp/sms.db"),
            ("SESSION_TTL_HOURS", "2"),
            ("CORS_ORIGINS", "http://localhost:5173, http://localhost:3000,"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/sms.db")));
        assert_eq!(config.session_ttl_hours, 2);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173", "http://localhost:3000"]
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "not-a-port")])).unwrap_err();
        assert_eq!(err.name, "PORT");
    }
}
