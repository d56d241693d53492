//! Runtime configuration loaded from the environment
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add REMINDER_STORE_PATH for the persisted reminder registry
//! - 1.0.0: Initial release with token, application id and preference path

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Default location of the emoji preference file
pub const DEFAULT_STORE_PATH: &str = "bookmarks.json";
/// Default location of the pending reminder registry
pub const DEFAULT_REMINDER_STORE_PATH: &str = "reminders.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub application_id: u64,
    /// When set, slash commands are registered for this guild only
    pub discord_guild_id: Option<u64>,
    pub store_path: PathBuf,
    pub reminder_store_path: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Read configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a local `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let discord_token =
            non_empty("DISCORD_TOKEN").ok_or_else(|| anyhow::anyhow!("DISCORD_TOKEN is required"))?;

        let application_id = non_empty("DISCORD_APP_ID")
            .ok_or_else(|| anyhow::anyhow!("DISCORD_APP_ID is required"))?
            .parse::<u64>()
            .context("DISCORD_APP_ID must be a numeric application id")?;

        let discord_guild_id = match non_empty("DISCORD_GUILD_ID") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .context("DISCORD_GUILD_ID must be a numeric guild id")?,
            ),
            None => None,
        };

        let store_path = non_empty("BOOKMARK_STORE_PATH")
            .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string())
            .into();
        let reminder_store_path = non_empty("REMINDER_STORE_PATH")
            .unwrap_or_else(|| DEFAULT_REMINDER_STORE_PATH.to_string())
            .into();
        let log_level = non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Config {
            discord_token,
            application_id,
            discord_guild_id,
            store_path,
            reminder_store_path,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config =
            Config::from_lookup(lookup(&[("DISCORD_TOKEN", "abc"), ("DISCORD_APP_ID", "42")]))
                .unwrap();

        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.application_id, 42);
        assert_eq!(config.discord_guild_id, None);
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(
            config.reminder_store_path,
            PathBuf::from(DEFAULT_REMINDER_STORE_PATH)
        );
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_missing_token_fails() {
        let err = Config::from_lookup(lookup(&[("DISCORD_APP_ID", "42")])).unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }

    #[test]
    fn test_blank_app_id_fails() {
        let result = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_APP_ID", "   "),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_guild_and_paths_override() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_APP_ID", "42"),
            ("DISCORD_GUILD_ID", "1234"),
            ("BOOKMARK_STORE_PATH", "/data/prefs.json"),
            ("REMINDER_STORE_PATH", "/data/reminders.json"),
        ]))
        .unwrap();

        assert_eq!(config.discord_guild_id, Some(1234));
        assert_eq!(config.store_path, PathBuf::from("/data/prefs.json"));
        assert_eq!(config.reminder_store_path, PathBuf::from("/data/reminders.json"));
    }

    #[test]
    fn test_non_numeric_guild_fails() {
        let result = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_APP_ID", "42"),
            ("DISCORD_GUILD_ID", "guild"),
        ]));
        assert!(result.is_err());
    }
}
