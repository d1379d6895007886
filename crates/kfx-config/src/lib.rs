//! Settings and persistent stores for the kfx tools
//!
//! - [`settings`]: the `kfx.toml` file with parser defaults
//! - [`store`]: keyed TOML persistence behind the [`Store`] trait
//! - [`installs`]: framework installs kept in a store

pub mod errors;
pub mod installs;
pub mod settings;
pub mod store;

pub use errors::ConfigError;
pub use installs::FrameworkInstall;
pub use settings::Settings;
pub use store::{Store, TomlStore};
