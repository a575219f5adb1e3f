//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/vampire-lineage/vampire-lineage.toml`
//! 3. Local config: `<dir>/.vampire-lineage.toml`
//! 4. Environment variables: `VAMPIRE_LINEAGE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::MILLENNIAL_YEAR;

const APP_NAME: &str = "vampire-lineage";
const ENV_PREFIX: &str = "VAMPIRE_LINEAGE";

/// Errors while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {message}")]
    Config { message: String },
}

/// Unified configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Lineage file used when `--file` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineage_file: Option<PathBuf>,
    /// Default threshold for `converted-after`
    pub millennial_year: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lineage_file: None,
            millennial_year: MILLENNIAL_YEAR,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub lineage_file: Option<PathBuf>,
    pub millennial_year: Option<i32>,
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(format!(".{APP_NAME}.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand `~` and `$VAR` in the lineage file path.
    fn expand_paths(&mut self) {
        if let Some(path) = &self.lineage_file {
            let raw = path.to_string_lossy();
            let expanded = shellexpand::full(raw.as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.lineage_file = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins where it specifies a value.
    /// A relative `lineage_file` is resolved against `base_dir` when given.
    fn merge_with(&self, overlay: &RawSettings, base_dir: Option<&Path>) -> Self {
        let lineage_file = overlay.lineage_file.clone().map(|path| match base_dir {
            Some(dir) if path.is_relative() && !path.starts_with("~") => dir.join(path),
            _ => path,
        });
        Self {
            lineage_file: lineage_file.or_else(|| self.lineage_file.clone()),
            millennial_year: overlay.millennial_year.unwrap_or(self.millennial_year),
        }
    }

    /// Load settings with layered precedence from the real XDG config and process environment.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.vampire-lineage.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_layers(global_config_path().as_deref(), local_dir, None)
    }

    /// Load settings from explicit layers.
    ///
    /// # Arguments
    /// * `global_path` - Global config file, skipped when absent or missing
    /// * `local_dir` - Optional directory holding a `.vampire-lineage.toml`
    /// * `env_vars` - Environment to read `VAMPIRE_LINEAGE_*` from; `None` reads the process environment
    #[instrument(level = "debug", skip(env_vars))]
    pub fn load_layers(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
        env_vars: Option<Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw, None);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw, Some(dir));
            }
        }

        current = Self::apply_env_overrides(current, env_source().source(env_vars))?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, source: Environment) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_err)?;

        match config.get_string("lineage_file") {
            Ok(val) => settings.lineage_file = Some(PathBuf::from(val)),
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }
        match config.get_int("millennial_year") {
            Ok(val) => {
                settings.millennial_year = i32::try_from(val).map_err(|e| SettingsError::Config {
                    message: format!("millennial_year {val}: {e}"),
                })?;
            }
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# vampire-lineage configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/{APP_NAME}/{APP_NAME}.toml
#   Local:  ./.{APP_NAME}.toml
#   Env:    {ENV_PREFIX}_* environment variables

# Lineage file queried when --file is not given
# lineage_file = "~/lineages/original.toml"

# Default threshold year for converted-after
# millennial_year = {MILLENNIAL_YEAR}
"#
        )
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn config_err(e: ConfigError) -> SettingsError {
    SettingsError::Config {
        message: e.to_string(),
    }
}
