//! Configuration management for `todo_lists`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`TODO_*`)
//! 3. Data-dir config (`<data dir>/config.yaml`)
//! 4. User config (`~/.config/todo/config.yaml`)
//! 5. Defaults
//!
//! The data directory is `$TODO_DIR` when set, otherwise `~/.todo`.

use crate::error::{Result, TodoError};
use crate::model::CANONICAL_DATE_FORMAT;
use crate::storage::SqliteStore;
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default database filename inside the data directory.
pub const DEFAULT_DB_FILENAME: &str = "tasks.db";
/// Directory under `$HOME` used when `TODO_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = ".todo";
/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "TODO_DIR";

const ENV_PREFIX: &str = "TODO_";

/// Locate the data directory.
///
/// # Errors
///
/// Returns an error if neither `TODO_DIR` nor `HOME` is set.
pub fn data_dir() -> Result<PathBuf> {
    let dir_override = env::var_os(DATA_DIR_ENV).map(PathBuf::from);
    let home = env::var_os("HOME").map(PathBuf::from);
    data_dir_with_env(dir_override.as_deref(), home.as_deref())
}

fn data_dir_with_env(dir_override: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = dir_override {
        if !dir.as_os_str().is_empty() {
            return Ok(dir.to_path_buf());
        }
    }
    home.map(|home| home.join(DEFAULT_DATA_DIR))
        .ok_or_else(|| TodoError::Config("neither TODO_DIR nor HOME is set".to_string()))
}

/// A flat layer of configuration values keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from `TODO_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_vars(env::vars())
    }

    fn from_env_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut layer = Self::default();
        for (key, value) in vars {
            if key == DATA_DIR_ENV {
                continue;
            }
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layer.insert(stripped, value);
            }
        }
        layer
    }

    pub fn insert(&mut self, key: &str, value: String) {
        self.values.insert(normalize_key(key), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(&normalize_key(key))
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub json: Option<bool>,
    pub today: Option<String>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(path) = &self.db {
            layer.insert("db", path.to_string_lossy().to_string());
        }
        if let Some(json) = self.json {
            layer.insert("json", json.to_string());
        }
        if let Some(today) = &self.today {
            layer.insert("today", today.clone());
        }

        layer
    }
}

/// Load user config (~/.config/todo/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Some(home) = env::var_os("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("todo")
        .join("config.yaml");
    ConfigLayer::from_yaml(&path)
}

/// Load `<data dir>/config.yaml`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_data_dir_config(data_dir: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&data_dir.join("config.yaml"))
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.insert("json", "false".to_string());
    layer
}

/// Load configuration with the full precedence order.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed.
pub fn load_config(data_dir: &Path, cli: &CliOverrides) -> Result<ConfigLayer> {
    Ok(ConfigLayer::merge_layers(&[
        default_config_layer(),
        load_user_config()?,
        load_data_dir_config(data_dir)?,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]))
}

/// Settings resolved from a merged layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub json: bool,
    pub today: NaiveDate,
}

impl Settings {
    /// Resolve typed settings.
    ///
    /// # Errors
    ///
    /// Returns a config error if `json` or `today` hold unparseable values.
    pub fn from_layer(layer: &ConfigLayer, data_dir: &Path) -> Result<Self> {
        let db_path = layer.get("db").map_or_else(
            || data_dir.join(DEFAULT_DB_FILENAME),
            |raw| {
                let candidate = PathBuf::from(raw);
                if candidate.is_absolute() {
                    candidate
                } else {
                    data_dir.join(candidate)
                }
            },
        );

        let json = match layer.get("json") {
            Some(raw) => parse_bool(raw)
                .ok_or_else(|| TodoError::Config(format!("json: expected a boolean, got '{raw}'")))?,
            None => false,
        };

        let today = match layer.get("today") {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), CANONICAL_DATE_FORMAT)
                .map_err(|_| TodoError::Config(format!("today: expected YYYY-MM-DD, got '{raw}'")))?,
            None => Local::now().date_naive(),
        };

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            db_path,
            json,
            today,
        })
    }

    /// Load all layers and resolve settings in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the data dir cannot be located or config is invalid.
    pub fn load(cli: &CliOverrides) -> Result<Self> {
        let data_dir = data_dir()?;
        let layer = load_config(&data_dir, cli)?;
        Self::from_layer(&layer, &data_dir)
    }
}

/// Open the store at the configured path, creating its directory if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the database cannot be opened.
pub fn open_store(settings: &Settings) -> Result<SqliteStore> {
    if let Some(parent) = settings.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    debug!(db = %settings.db_path.display(), "Opening store");
    SqliteStore::open(&settings.db_path)
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    for (key, value) in flat {
        layer.insert(&key, value);
    }

    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
