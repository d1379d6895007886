//! Common types and utilities shared across commands

use crate::errors::CliError;
use clap::{Args, Parser, ValueEnum};
use kfx_config::{FrameworkInstall, Settings, Store, TomlStore};
use kfx_logger as logger;
use kfx_xargs::url::has_scheme;
use kfx_xargs::{ParserOptions, XArgsParser};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Which xargs file to read and where its relative references point
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Xargs file path or URL
    pub file: String,

    /// Directory for include and `file:` location lookups
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Prefix for `file:jars/` locations
    #[arg(long)]
    pub top_dir: Option<String>,

    /// Use a stored framework install as the lookup directory
    #[arg(long, conflicts_with = "dir")]
    pub install: Option<String>,

    /// Do not probe remote bundle locations
    #[arg(long)]
    pub offline: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Toml,
}

/// Open the framework install store named by the settings
pub fn install_store(settings: &Settings) -> Result<TomlStore<FrameworkInstall>, CliError> {
    Ok(TomlStore::new(settings.installs_path()?))
}

/// Build a parser for `source` from command line flags and stored settings.
pub fn build_parser(source: &SourceArgs, settings: &Settings) -> Result<XArgsParser, CliError> {
    let default_dir = default_dir(source, settings)?;
    logger::debug(&format!("Lookup directory: {}", default_dir.display()));

    let mut options = ParserOptions::new(default_dir);
    options.top_dir = source
        .top_dir
        .clone()
        .unwrap_or_else(|| settings.top_dir().to_string());
    options.default_base = settings.jar_base().to_string();
    options.http_timeout = settings.http_timeout();
    options.max_include_depth = settings.max_include_depth();
    options.offline = source.offline;
    debug!("parser options: {:?}", options);

    Ok(XArgsParser::new(options))
}

/// `--dir`, then `--install`, then the `default-dir` setting, then the
/// directory of the file itself.
fn default_dir(source: &SourceArgs, settings: &Settings) -> Result<PathBuf, CliError> {
    if let Some(dir) = &source.dir {
        return Ok(dir.clone());
    }

    if let Some(name) = &source.install {
        let install = install_store(settings)?
            .load(name)?
            .ok_or_else(|| CliError::UnknownInstall(name.clone()))?;
        return Ok(install_dir(&install.location));
    }

    if let Some(dir) = settings.default_dir() {
        return Ok(dir);
    }

    if has_scheme(&source.file) {
        return Ok(PathBuf::from("."));
    }
    Ok(Path::new(&source.file)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf))
}

/// Installs may be stored as plain paths or `file:` URLs
fn install_dir(location: &str) -> PathBuf {
    PathBuf::from(location.strip_prefix("file:").unwrap_or(location))
}
