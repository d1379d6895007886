use std::path::PathBuf;

/// Error type for settings and store persistence
#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing a file failed
    Io(PathBuf, std::io::Error),
    /// A settings or store file is not valid TOML for its schema
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    /// Neither `KFX_CONFIG` nor a home directory is available
    HomeDirNotFound,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "IO error on {}: {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Failed to parse {}: {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Failed to serialize: {}", e),
            ConfigError::HomeDirNotFound => write!(f, "Could not determine home directory"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(_, e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
            ConfigError::HomeDirNotFound => None,
        }
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}
