//! Configuration model produced by an xargs parse
//!
//! The model is assembled by the interpreter and read-only afterwards;
//! consumers copy values out through the accessors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Start level given to bundles installed before any `-initlevel`
pub const DEFAULT_INITIAL_START_LEVEL: i32 = 1;

/// Which property namespace a `-D`/`-F` line writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    System,
    Framework,
}

impl PropertyKind {
    /// The xargs line prefix for this namespace
    pub fn prefix(self) -> &'static str {
        match self {
            PropertyKind::System => "-D",
            PropertyKind::Framework => "-F",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::System => write!(f, "system"),
            PropertyKind::Framework => write!(f, "framework"),
        }
    }
}

/// A single named property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub kind: PropertyKind,
}

/// What happens to a bundle after it is installed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    #[default]
    Install,
    Start,
    StartEagerly,
    StartEagerlyTransiently,
    StartTransiently,
}

impl StartMode {
    /// The `-start*` directive selecting this mode, if any
    pub fn start_directive(self) -> Option<&'static str> {
        match self {
            StartMode::Install => None,
            StartMode::Start => Some("-start"),
            StartMode::StartEagerly => Some("-start_e"),
            StartMode::StartEagerlyTransiently => Some("-start_et"),
            StartMode::StartTransiently => Some("-start_pt"),
        }
    }
}

impl fmt::Display for StartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StartMode::Install => "install",
            StartMode::Start => "start",
            StartMode::StartEagerly => "start_eagerly",
            StartMode::StartEagerlyTransiently => "start_eagerly_transiently",
            StartMode::StartTransiently => "start_transiently",
        };
        write!(f, "{}", name)
    }
}

/// Install/start instruction for one bundle, identified by its resolved location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDirective {
    pub location: String,
    pub start_level: i32,
    #[serde(default)]
    pub start_mode: StartMode,
}

/// Result of interpreting an xargs file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_level: Option<i32>,
    #[serde(default)]
    clear_persistent_data: bool,
    #[serde(default)]
    system_properties: IndexMap<String, String>,
    #[serde(default)]
    framework_properties: IndexMap<String, String>,
    #[serde(default)]
    bundles: IndexMap<String, BundleDirective>,
}

impl Configuration {
    /// System property names in definition order
    pub fn system_property_names(&self) -> impl Iterator<Item = &str> {
        self.system_properties.keys().map(String::as_str)
    }

    pub fn system_property(&self, name: &str) -> Option<&str> {
        self.system_properties.get(name).map(String::as_str)
    }

    /// Framework property names in definition order
    pub fn framework_property_names(&self) -> impl Iterator<Item = &str> {
        self.framework_properties.keys().map(String::as_str)
    }

    pub fn framework_property(&self, name: &str) -> Option<&str> {
        self.framework_properties.get(name).map(String::as_str)
    }

    /// Look a property up in one namespace
    pub fn property(&self, kind: PropertyKind, name: &str) -> Option<&str> {
        match kind {
            PropertyKind::System => self.system_property(name),
            PropertyKind::Framework => self.framework_property(name),
        }
    }

    /// All properties, system namespace first
    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        let system = self.system_properties.iter().map(|(name, value)| Property {
            name: name.clone(),
            value: value.clone(),
            kind: PropertyKind::System,
        });
        let framework = self.framework_properties.iter().map(|(name, value)| Property {
            name: name.clone(),
            value: value.clone(),
            kind: PropertyKind::Framework,
        });
        system.chain(framework)
    }

    /// Bundle directives in installation order
    pub fn bundles(&self) -> impl Iterator<Item = &BundleDirective> {
        self.bundles.values()
    }

    pub fn bundle(&self, location: &str) -> Option<&BundleDirective> {
        self.bundles.get(location)
    }

    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    /// Overall framework start level, if `-startlevel` was given
    pub fn start_level(&self) -> Option<i32> {
        self.start_level
    }

    /// Whether `-init` asked for the persistent framework data to be cleared
    pub fn clear_persistent_data(&self) -> bool {
        self.clear_persistent_data
    }

    pub(crate) fn set_property(&mut self, kind: PropertyKind, name: &str, value: &str) {
        let table = match kind {
            PropertyKind::System => &mut self.system_properties,
            PropertyKind::Framework => &mut self.framework_properties,
        };
        // Last definition wins but keeps the slot of the first one
        table.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn install(&mut self, bundle: BundleDirective) {
        self.bundles.insert(bundle.location.clone(), bundle);
    }

    pub(crate) fn bundle_mut(&mut self, location: &str) -> Option<&mut BundleDirective> {
        self.bundles.get_mut(location)
    }

    pub(crate) fn set_start_level(&mut self, level: i32) {
        self.start_level = Some(level);
    }

    pub(crate) fn set_clear_persistent_data(&mut self) {
        self.clear_persistent_data = true;
    }
}
