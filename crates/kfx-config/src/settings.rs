use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the settings file location
pub const CONFIG_ENV: &str = "KFX_CONFIG";

/// Pointer file next to the default settings, holding an alternative path
pub const POINTER_FILE: &str = ".kfx_config_path";

pub const DEFAULT_JAR_BASE: &str = "file:";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// Keys accepted by [`Settings::get`] and [`Settings::set`]
pub const KEYS: &[&str] = &[
    "default-dir",
    "top-dir",
    "jar-base",
    "http-timeout",
    "max-include-depth",
    "installs-path",
];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar_base: Option<String>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_include_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installs_path: Option<String>,
}

/// Directory holding kfx settings, the log file and stores
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    #[cfg(not(target_os = "windows"))]
    let dir = dirs::home_dir()
        .ok_or(ConfigError::HomeDirNotFound)?
        .join(".config")
        .join("kfx");

    #[cfg(target_os = "windows")]
    let dir = dirs::config_dir()
        .ok_or(ConfigError::HomeDirNotFound)?
        .join("kfx");

    Ok(dir)
}

impl Settings {
    /// Resolve the settings file: `KFX_CONFIG`, then the pointer file, then
    /// `kfx.toml` in [`config_dir`].
    pub fn path() -> Result<PathBuf, ConfigError> {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        let dir = config_dir()?;
        let pointer = dir.join(POINTER_FILE);
        if let Ok(contents) = fs::read_to_string(&pointer) {
            let trimmed = contents.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        Ok(dir.join("kfx.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::path()?)
    }

    /// Load settings, treating a missing file as empty settings
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::path()?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(parent.to_path_buf(), e))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::Io(path.to_path_buf(), e))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default-dir" => self.default_dir.clone(),
            "top-dir" => self.top_dir.clone(),
            "jar-base" => self.jar_base.clone(),
            "http-timeout" => self.http_timeout.map(|v| v.to_string()),
            "max-include-depth" => self.max_include_depth.map(|v| v.to_string()),
            "installs-path" => self.installs_path.clone(),
            _ => None,
        }
    }

    /// Set a key from its string form.
    pub fn set(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "default-dir" => self.default_dir = Some(value),
            "top-dir" => self.top_dir = Some(value),
            "jar-base" => self.jar_base = Some(value),
            "http-timeout" => {
                let secs = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("http-timeout must be a number of seconds, got '{}'", value))?;
                self.http_timeout = Some(secs);
            }
            "max-include-depth" => {
                let depth = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("max-include-depth must be a number, got '{}'", value))?;
                self.max_include_depth = Some(depth);
            }
            "installs-path" => self.installs_path = Some(value),
            _ => {
                return Err(format!(
                    "Unknown config key: {}. Supported keys: {}",
                    key,
                    KEYS.join(", ")
                ))
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Settings::default()
    }

    /// Set keys with their values, in [`KEYS`] order
    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    pub fn default_dir(&self) -> Option<PathBuf> {
        self.default_dir.as_ref().map(PathBuf::from)
    }

    pub fn top_dir(&self) -> &str {
        self.top_dir.as_deref().unwrap_or("")
    }

    pub fn jar_base(&self) -> &str {
        self.jar_base.as_deref().unwrap_or(DEFAULT_JAR_BASE)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    pub fn max_include_depth(&self) -> usize {
        self.max_include_depth.unwrap_or(DEFAULT_MAX_INCLUDE_DEPTH)
    }

    /// File backing the framework install store
    pub fn installs_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.installs_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(config_dir()?.join("installs.toml")),
        }
    }
}
