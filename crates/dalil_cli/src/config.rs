//! Dalil configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use dalil_storage::{COMPARE_CAPACITY, Locale, RECENTLY_VIEWED_CAPACITY};
use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Contents written by `dalil init`.
pub const DEFAULT_CONFIG: &str = r#"{
  // Deployed site; the dataset is read from <base_url>/data/<dataset>.json
  "base_url": "http://localhost:8080/",
  "dataset": "tools",
  // "storage_dir": ".dalil-data",
  "timeout_secs": 10,
  "allow_local": true,
  "locale": "en",
  "recently_viewed_capacity": 10,
  "compare_capacity": 3
}
"#;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    #[diagnostic(code(dalil::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config syntax: {0}")]
    #[diagnostic(code(dalil::config::syntax))]
    Syntax(String),

    #[error("Config validation failed: {0}")]
    #[diagnostic(
        code(dalil::config::schema),
        help("run `dalil init --force` to write a valid default config")
    )]
    Schema(String),

    #[error("Invalid config: {0}")]
    #[diagnostic(code(dalil::config::invalid))]
    Invalid(String),
}

/// Settings for the dataset source and the persisted lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DalilConfig {
    pub base_url: String,
    pub dataset: String,
    /// Directory for the persisted lists. Relative paths resolve against the
    /// directory of the config file.
    pub storage_dir: Option<PathBuf>,
    pub timeout_secs: u64,
    pub allow_local: bool,
    pub locale: Locale,
    pub recently_viewed_capacity: usize,
    pub compare_capacity: usize,

    /// Directory containing the loaded config file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Default for DalilConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            dataset: "tools".to_string(),
            storage_dir: None,
            timeout_secs: 10,
            allow_local: true,
            locale: Locale::En,
            recently_viewed_capacity: RECENTLY_VIEWED_CAPACITY,
            compare_capacity: COMPARE_CAPACITY,
            base_dir: None,
        }
    }
}

impl DalilConfig {
    /// Config file names, in lookup order.
    pub const CONFIG_FILES: &'static [&'static str] = &[".dalil.jsonc", ".dalil.json"];

    /// Finds the first config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads `explicit`, else the config discovered in the current directory,
    /// else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::discover(Path::new(".")) {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_json(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses JSON with comments and validates it against the schema.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| ConfigError::Syntax(e.to_string()))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            return Err(ConfigError::Schema(format!("{} at {}", e, e.instance_path())));
        }

        serde_json::from_value(value).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured storage directory, resolved against the config location.
    pub fn resolved_storage_dir(&self) -> Option<PathBuf> {
        let dir = self.storage_dir.as_ref()?;
        match &self.base_dir {
            Some(base) if dir.is_relative() => Some(base.join(dir)),
            _ => Some(dir.clone()),
        }
    }
}
