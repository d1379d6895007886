//! Known framework installations
//!
//! A framework install names a Knopflerfish directory (or URL) whose xargs
//! files are parsed relative to it. At most one install is the default.

use crate::errors::ConfigError;
use crate::store::Store;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrameworkInstall {
    pub location: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FrameworkInstall {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            default: false,
            description: None,
        }
    }
}

/// Store `install` under `name`; a default install clears the flag on all others.
pub fn add_install<S>(store: &S, name: &str, install: &FrameworkInstall) -> Result<(), ConfigError>
where
    S: Store<FrameworkInstall> + ?Sized,
{
    if install.default {
        clear_default(store, Some(name))?;
    }
    store.save(name, install)
}

/// All installs in key order
pub fn list_installs<S>(store: &S) -> Result<Vec<(String, FrameworkInstall)>, ConfigError>
where
    S: Store<FrameworkInstall> + ?Sized,
{
    let mut installs = Vec::new();
    for name in store.keys()? {
        if let Some(install) = store.load(&name)? {
            installs.push((name, install));
        }
    }
    Ok(installs)
}

pub fn default_install<S>(store: &S) -> Result<Option<(String, FrameworkInstall)>, ConfigError>
where
    S: Store<FrameworkInstall> + ?Sized,
{
    Ok(list_installs(store)?
        .into_iter()
        .find(|(_, install)| install.default))
}

fn clear_default<S>(store: &S, keep: Option<&str>) -> Result<(), ConfigError>
where
    S: Store<FrameworkInstall> + ?Sized,
{
    for (name, mut install) in list_installs(store)? {
        if install.default && keep != Some(name.as_str()) {
            install.default = false;
            store.save(&name, &install)?;
        }
    }
    Ok(())
}
