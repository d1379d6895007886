//! Error type for the kfx command line

use kfx_config::ConfigError;
use kfx_xargs::XArgsError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to import xargs file: {0}")]
    XArgs(#[from] XArgsError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("IO error on {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("Failed to serialize configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize configuration: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Framework install '{0}' not found")]
    UnknownInstall(String),

    #[error("{0}")]
    InvalidSetting(String),
}

#[cfg(test)]
mod tests {
    use crate::errors::*;

    #[test]
    fn test_xargs_error_display_starts_with_summary() {
        let err = CliError::from(XArgsError::FileNotFound("init.xargs".to_string()));
        assert!(err.to_string().starts_with(kfx_xargs::FAILED_SUMMARY));
    }

    #[test]
    fn test_unknown_install_display() {
        let err = CliError::UnknownInstall("kf7".to_string());
        assert_eq!(err.to_string(), "Framework install 'kf7' not found");
    }
}
