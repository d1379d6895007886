//! Keyed persistence for small tool records
//!
//! [`Store`] is the repository seam; [`TomlStore`] keeps every record of one
//! kind as a table in a single TOML file.

use crate::errors::ConfigError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Repository of values of type `T` addressed by name
pub trait Store<T> {
    fn load(&self, key: &str) -> Result<Option<T>, ConfigError>;

    /// Insert or replace the value stored under `key`
    fn save(&self, key: &str, value: &T) -> Result<(), ConfigError>;

    /// Returns whether a value was removed
    fn remove(&self, key: &str) -> Result<bool, ConfigError>;

    /// Stored keys in sorted order
    fn keys(&self) -> Result<Vec<String>, ConfigError>;
}

/// A [`Store`] backed by one TOML file, one table per key
#[derive(Debug, Clone)]
pub struct TomlStore<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> TomlStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record, treating a missing file as an empty store
    pub fn read_all(&self) -> Result<BTreeMap<String, T>, ConfigError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| ConfigError::Io(self.path.clone(), e))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(self.path.clone(), e))
    }

    /// Replace the whole file with `records`
    pub fn write_all(&self, records: &BTreeMap<String, T>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(parent.to_path_buf(), e))?;
        }

        let content = toml::to_string_pretty(records)?;

        // Write to a sibling temp file then rename over the target
        let temp_path = self.path.with_extension("toml.tmp");
        let io_err = |e| ConfigError::Io(temp_path.clone(), e);
        {
            let file = fs::File::create(&temp_path).map_err(io_err)?;
            let mut writer = std::io::BufWriter::new(file);
            writer.write_all(content.as_bytes()).map_err(io_err)?;
            writer.flush().map_err(io_err)?;
        }
        fs::rename(&temp_path, &self.path).map_err(|e| ConfigError::Io(self.path.clone(), e))
    }
}

impl<T> Store<T> for TomlStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    fn load(&self, key: &str) -> Result<Option<T>, ConfigError> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let mut records = self.read_all()?;
        records.insert(key.to_string(), value.clone());
        self.write_all(&records)
    }

    fn remove(&self, key: &str) -> Result<bool, ConfigError> {
        let mut records = self.read_all()?;
        if records.remove(key).is_none() {
            return Ok(false);
        }
        self.write_all(&records)?;
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self.read_all()?.into_keys().collect())
    }
}
