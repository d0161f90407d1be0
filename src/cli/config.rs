//! Server configuration
//!
//! A JSON file. Every field is optional:
//!
//! ```json
//! {
//!   "admission_plugins": ["PizzaSize", "PizzaToppings"],
//!   "storage_version": "v2alpha1",
//!   "fixtures": "fixtures.json",
//!   "start_synced": true
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admission::DEFAULT_PLUGIN_ORDER;
use crate::apis::{Pizza, RuntimeObject, SchemaVersion, Topping};
use crate::conversion::Scheme;

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Admission plugins, in chain order
    #[serde(default = "default_admission_plugins")]
    pub admission_plugins: Vec<String>,

    /// Version objects are persisted in
    #[serde(default = "default_storage_version")]
    pub storage_version: String,

    /// JSON array of wire objects loaded into the mirror at boot.
    /// Relative paths resolve against the config file's directory.
    #[serde(default)]
    pub fixtures: Option<PathBuf>,

    /// When false the mirror never reports synced
    #[serde(default = "default_start_synced")]
    pub start_synced: bool,
}

fn default_admission_plugins() -> Vec<String> {
    DEFAULT_PLUGIN_ORDER.iter().map(|s| s.to_string()).collect()
}
fn default_storage_version() -> String {
    SchemaVersion::V2alpha1.as_str().to_string()
}
fn default_start_synced() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admission_plugins: default_admission_plugins(),
            storage_version: default_storage_version(),
            fixtures: None,
            start_synced: default_start_synced(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        if let Some(fixtures) = config.fixtures.as_mut() {
            if fixtures.is_relative() {
                if let Some(dir) = path.parent() {
                    *fixtures = dir.join(&*fixtures);
                }
            }
        }

        Ok(config)
    }

    /// Rejects unknown versions and empty or repeated plugin lists
    pub fn validate(&self) -> CliResult<()> {
        if SchemaVersion::parse(&self.storage_version).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid storage_version: '{}'. Must be one of: {}",
                self.storage_version,
                SchemaVersion::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        if self.admission_plugins.is_empty() {
            return Err(CliError::config_error("admission_plugins must not be empty"));
        }

        for (i, name) in self.admission_plugins.iter().enumerate() {
            if self.admission_plugins[..i].contains(name) {
                return Err(CliError::config_error(format!(
                    "admission plugin '{}' listed twice",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Parsed storage version
    pub fn storage_version(&self) -> CliResult<SchemaVersion> {
        SchemaVersion::parse(&self.storage_version).ok_or_else(|| {
            CliError::config_error(format!("Invalid storage_version: '{}'", self.storage_version))
        })
    }

    /// Decodes the fixture file, if any, into canonical objects
    pub fn load_fixtures(&self, scheme: &Scheme) -> CliResult<Fixtures> {
        let mut fixtures = Fixtures::default();
        let Some(path) = &self.fixtures else {
            return Ok(fixtures);
        };

        let content = fs::read_to_string(path).map_err(|e| {
            CliError::fixture_error(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let values: Vec<Value> = serde_json::from_str(&content).map_err(|e| {
            CliError::fixture_error(format!("{} is not a JSON array: {}", path.display(), e))
        })?;

        for (i, value) in values.into_iter().enumerate() {
            let (_, obj) = scheme
                .decode(value)
                .map_err(|e| CliError::fixture_error(format!("fixture [{}]: {}", i, e)))?;
            match obj {
                RuntimeObject::Pizza(pizza) => fixtures.pizzas.push(pizza),
                RuntimeObject::Topping(topping) => fixtures.toppings.push(topping),
            }
        }

        Ok(fixtures)
    }
}

/// Canonical objects read from a fixture file
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub pizzas: Vec<Pizza>,
    pub toppings: Vec<Topping>,
}
