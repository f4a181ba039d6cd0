use crate::board::PauseLabels;
use crate::github::client::DEFAULT_API_URL;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Repositories,
    Account,
    PausingLabels,
    IgnoreLabelCase,
    ApiUrl,
    Token,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Repositories => "repositories",
            ConfigKey::Account => "account",
            ConfigKey::PausingLabels => "pausing_labels",
            ConfigKey::IgnoreLabelCase => "ignore_label_case",
            ConfigKey::ApiUrl => "api_url",
            ConfigKey::Token => "token",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::Repositories,
            ConfigKey::Account,
            ConfigKey::PausingLabels,
            ConfigKey::IgnoreLabelCase,
            ConfigKey::ApiUrl,
            ConfigKey::Token,
        ]
    }
}

/// Filename for the project-specific configuration within the .kanban directory.
pub const PROJECT_CONFIG_FILENAME: &str = "config.json";
/// Directory name for project-specific configuration.
pub const PROJECT_CONFIG_DIR: &str = ".kanban";

/// Environment variables read by [`env_config`], with the key each one sets.
const ENV_VARS: &[(&str, ConfigKey)] = &[
    ("GH_REPOSITORIES", ConfigKey::Repositories),
    ("GH_ACCOUNT", ConfigKey::Account),
    ("PAUSING_LABELS", ConfigKey::PausingLabels),
    ("GH_API_URL", ConfigKey::ApiUrl),
    ("GH_TOKEN", ConfigKey::Token),
];

/// Parses a JSON configuration file content into a map of configuration values.
///
/// Expects `content` to be a byte slice representing either:
/// - A simple JSON array of strings (treated as just the repositories list)
/// - A JSON object with configuration keys (e.g., {"repositories": [...], ...})
///
/// - Returns an empty HashMap if the input `content` is empty or contains only whitespace.
/// - Returns an `Err` if the JSON parsing fails or the top-level value is anything else.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content).context("Failed to parse config JSON")?;

    let mut config_map = HashMap::new();

    match value {
        Value::Object(map) => {
            for key in ConfigKey::all() {
                if let Some(val) = map.get(key.as_str()) {
                    config_map.insert(*key, val.clone());
                }
            }
            Ok(config_map)
        }
        Value::Array(_) => {
            config_map.insert(ConfigKey::Repositories, value);
            Ok(config_map)
        }
        _ => Err(anyhow::anyhow!(
            "Config must be either an array of strings or an object"
        )),
    }
}

/// Path of the project configuration file below `dir`.
pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILENAME)
}

/// Reads the project configuration below `dir`. A missing file is an empty configuration.
pub fn load_project_config(dir: &Path) -> Result<HashMap<ConfigKey, Value>> {
    let path = project_config_path(dir);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Builds configuration values from environment variables.
///
/// List values (`GH_REPOSITORIES`, `PAUSING_LABELS`) are `|`-separated. Empty
/// variables are ignored.
pub fn env_config<F>(lookup: F) -> HashMap<ConfigKey, Value>
where
    F: Fn(&str) -> Option<String>,
{
    ENV_VARS
        .iter()
        .filter_map(|(name, key)| {
            let raw = lookup(name)?;
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            let value = match key {
                ConfigKey::Repositories | ConfigKey::PausingLabels => Value::Array(
                    split_list(raw)
                        .into_iter()
                        .map(Value::String)
                        .collect(),
                ),
                _ => Value::String(raw.to_string()),
            };
            Some((*key, value))
        })
        .collect()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merges `updates` into `base_config` and returns a new configuration map.
///
/// - Keys from `updates` are added to a clone of `base_config`.
/// - If a key exists in both, the value from `updates` overwrites the value in the cloned `base_config`.
///
/// # Arguments
///
/// * `base_config`: A reference to the base configuration map.
/// * `updates`: A reference to the configuration map containing updates to apply.
///
/// # Returns
///
/// * A new `HashMap<ConfigKey, Value>` representing the merged configuration.
pub fn update_config(
    base_config: &HashMap<ConfigKey, Value>,
    updates: &HashMap<ConfigKey, Value>,
) -> HashMap<ConfigKey, Value> {
    let mut new_config = base_config.clone();
    for (key, value) in updates {
        new_config.insert(*key, value.clone());
    }
    new_config
}

/// Typed settings for one board run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub repositories: Vec<String>,
    pub account: Option<String>,
    pub pause_labels: PauseLabels,
    pub api_url: String,
    pub token: Option<String>,
}

fn string_list(config: &HashMap<ConfigKey, Value>, key: ConfigKey) -> Result<Vec<String>> {
    match config.get(&key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.trim().to_string())
                    .ok_or_else(|| anyhow::anyhow!("`{}` must only contain strings", key.as_str()))
            })
            .filter(|item| !matches!(item, Ok(s) if s.is_empty()))
            .collect(),
        Some(Value::String(single)) => Ok(split_list(single)),
        Some(_) => Err(anyhow::anyhow!(
            "`{}` must be an array of strings",
            key.as_str()
        )),
    }
}

fn string_value(config: &HashMap<ConfigKey, Value>, key: ConfigKey) -> Result<Option<String>> {
    match config.get(&key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(anyhow::anyhow!("`{}` must be a string", key.as_str())),
    }
}

fn bool_value(config: &HashMap<ConfigKey, Value>, key: ConfigKey) -> Result<bool> {
    match config.get(&key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.trim() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" | "" => Ok(false),
            other => Err(anyhow::anyhow!(
                "`{}` must be a boolean, got \"{other}\"",
                key.as_str()
            )),
        },
        Some(_) => Err(anyhow::anyhow!("`{}` must be a boolean", key.as_str())),
    }
}

impl Settings {
    /// Resolve a merged configuration map into settings.
    pub fn from_config(config: &HashMap<ConfigKey, Value>) -> Result<Settings> {
        let repositories = string_list(config, ConfigKey::Repositories)?;
        if repositories.is_empty() {
            return Err(anyhow::anyhow!(
                "No repositories configured. Use --repo, GH_REPOSITORIES or {}/{}.",
                PROJECT_CONFIG_DIR,
                PROJECT_CONFIG_FILENAME
            ));
        }

        Ok(Settings {
            repositories,
            account: string_value(config, ConfigKey::Account)?,
            pause_labels: PauseLabels::new(
                string_list(config, ConfigKey::PausingLabels)?,
                !bool_value(config, ConfigKey::IgnoreLabelCase)?,
            ),
            api_url: string_value(config, ConfigKey::ApiUrl)?
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: string_value(config, ConfigKey::Token)?,
        })
    }
}
