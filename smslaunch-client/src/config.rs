//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use smslaunch_core::DEFAULT_MAX_SELECTED;
use thiserror::Error;

/// Pause after each hand-off before the next action is accepted
pub const DEFAULT_HANDOFF_DELAY: Duration = Duration::from_millis(300);

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Error)]
#[error("Invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server origin, without the `/api` suffix
    pub base_url: String,

    /// Where the bearer token is kept between runs
    pub token_file: Option<PathBuf>,

    /// Selection cap
    pub max_selected: usize,

    pub handoff_delay: Duration,

    /// Program that opens `sms:` URIs
    pub opener: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_file: default_token_file(),
            max_selected: DEFAULT_MAX_SELECTED,
            handoff_delay: DEFAULT_HANDOFF_DELAY,
            opener: default_opener().to_string(),
        }
    }
}

impl ClientConfig {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClientConfig::default();

        if let Some(url) = lookup("SMSLAUNCH_URL").filter(|u| !u.is_empty()) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = lookup("SMSLAUNCH_TOKEN_FILE").filter(|p| !p.is_empty()) {
            config.token_file = Some(PathBuf::from(path));
        }
        if let Some(max) = lookup("SMSLAUNCH_MAX_SELECTED") {
            let parsed: usize = parse("SMSLAUNCH_MAX_SELECTED", max.clone())?;
            if parsed == 0 {
                return Err(ConfigError {
                    name: "SMSLAUNCH_MAX_SELECTED",
                    value: max,
                });
            }
            config.max_selected = parsed;
        }
        if let Some(ms) = lookup("SMSLAUNCH_HANDOFF_DELAY_MS") {
            config.handoff_delay = Duration::from_millis(parse("SMSLAUNCH_HANDOFF_DELAY_MS", ms)?);
        }
        if let Some(opener) = lookup("SMSLAUNCH_OPENER").filter(|o| !o.trim().is_empty()) {
            config.opener = opener;
        }

        Ok(config)
    }
}

/// Token file in the platform data directory
fn default_token_file() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("com", "smslaunch", "SMS Launcher")?;
    Some(dirs.data_dir().join("token"))
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
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
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.max_selected, 20);
        assert_eq!(config.handoff_delay, Duration::from_millis(300));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SMSLAUNCH_URL", "https://sms.example.com/"),
            ("SMSLAUNCH_TOKEN_FILE", "/tmp/token"),
            ("SMSLAUNCH_MAX_SELECTED", "5"),
            ("SMSLAUNCH_HANDOFF_DELAY_MS", "0"),
            ("SMSLAUNCH_OPENER", "termux-open"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://sms.example.com");
        assert_eq!(config.token_file, Some(PathBuf::from("/tmp/token")));
        assert_eq!(config.max_selected, 5);
        assert_eq!(config.handoff_delay, Duration::ZERO);
        assert_eq!(config.opener, "termux-open");
    }

    #[test]
    fn test_zero_cap_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("SMSLAUNCH_MAX_SELECTED", "0")])).unwrap_err();
        assert_eq!(err.name, "SMSLAUNCH_MAX_SELECTED");
    }
}
