use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ApiUrl,
    Editor,
    TimeoutSecs,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::ApiUrl => "api_url",
            ConfigKey::Editor => "editor",
            ConfigKey::TimeoutSecs => "timeout_secs",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[ConfigKey::ApiUrl, ConfigKey::Editor, ConfigKey::TimeoutSecs]
    }
}

/// Environment variables read by [`Config::from_lookup`].
pub mod env_vars {
    pub const TOKEN: &str = "GITHUB_TOKEN";
    pub const API_URL: &str = "GITHUB_API_URL";
    pub const GIT_EDITOR: &str = "GIT_EDITOR";
    pub const EDITOR: &str = "EDITOR";
    pub const TIMEOUT_SECS: &str = "GISSUE_TIMEOUT_SECS";
}

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_EDITOR: &str = "vim";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Directory name for the user configuration, under `$HOME`.
pub const CONFIG_DIR: &str = ".gissue";
/// Filename for the user configuration within [`CONFIG_DIR`].
pub const CONFIG_FILENAME: &str = "config.json";

/// Settings handed to the issue client and the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Sent as `Authorization: token <token>`; empty when unset.
    pub token: String,
    pub editor: String,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            token: String::new(),
            editor: DEFAULT_EDITOR.to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Loads the config file (if any) and the process environment.
    pub fn load() -> Result<Self> {
        let file_config = match config_file_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read(&path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                parse_config(&content)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            _ => HashMap::new(),
        };
        Config::from_lookup(&file_config, |key| std::env::var(key).ok())
    }

    /// Builds the config from file values and an environment lookup.
    ///
    /// Environment values take precedence over file values, which take
    /// precedence over the defaults. Empty environment values count as unset,
    /// except for the token, which is never read from the file.
    pub fn from_lookup<F>(file_config: &HashMap<ConfigKey, Value>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let file_str = |key: ConfigKey| {
            file_config
                .get(&key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let token = lookup(env_vars::TOKEN).unwrap_or_default();

        let editor = env(env_vars::GIT_EDITOR)
            .or_else(|| env(env_vars::EDITOR))
            .or_else(|| file_str(ConfigKey::Editor))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

        let api_base_url = env(env_vars::API_URL)
            .or_else(|| file_str(ConfigKey::ApiUrl))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        // A zero timeout would fail every request before it is sent.
        let timeout = match env(env_vars::TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "{} must be a whole number of seconds",
                        env_vars::TIMEOUT_SECS
                    )
                })?,
            None => match file_config.get(&ConfigKey::TimeoutSecs) {
                Some(value) => value
                    .as_u64()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "{} must be a whole number of seconds",
                            ConfigKey::TimeoutSecs.as_str()
                        )
                    })?,
                None => DEFAULT_TIMEOUT,
            },
        };

        Ok(Config {
            token,
            editor,
            api_base_url,
            timeout,
        })
    }
}

/// `~/.gissue/config.json`, or `None` when `HOME` is not set.
pub fn config_file_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(CONFIG_DIR)
            .join(CONFIG_FILENAME)
    })
}

/// Parses a JSON configuration file content into a map of configuration values.
///
/// - Returns an empty HashMap if `content` is empty or contains only whitespace.
/// - Unknown keys are skipped.
/// - Returns an `Err` if the content is not a JSON object.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content).context("Failed to parse config JSON")?;

    let Value::Object(map) = value else {
        return Err(anyhow::anyhow!("Config must be a JSON object"));
    };

    let mut config_map = HashMap::new();
    for key in ConfigKey::all() {
        match map.get(key.as_str()) {
            Some(Value::Null) | None => {}
            Some(val) => {
                config_map.insert(*key, val.clone());
            }
        }
    }
    for unknown in map
        .keys()
        .filter(|k| !ConfigKey::all().iter().any(|key| key.as_str() == k.as_str()))
    {
        tracing::warn!(key = %unknown, "ignoring unknown config key");
    }
    Ok(config_map)
}
