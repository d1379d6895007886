use crate::errors::CliError;
use crate::GlobalOpts;
use clap::Subcommand;
use colored::Colorize;
use kfx_config::settings::{config_dir, POINTER_FILE};
use kfx_config::Settings;
use kfx_logger as logger;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    Show,
    Set {
        key: String,
        value: String,
    },
    /// Get or set the path to the settings file.
    /// With `new_path`, later runs read settings from that file.
    Path {
        /// Optional new settings path to set
        new_path: Option<String>,
    },
}

pub fn handle_config(action: Option<ConfigAction>, opts: GlobalOpts) -> Result<(), CliError> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let settings = Settings::load()?;
            println!("{}", "Configuration:".bold().green());
            if settings.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in settings.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load()?;
            settings
                .set(&key, value.clone())
                .map_err(CliError::InvalidSetting)?;
            settings.save()?;
            logger::success(&format!("Set {} = {}", key, value));
        }
        ConfigAction::Path { new_path } => {
            let settings_path = Settings::path()?;
            logger::debug(&format!("Reading settings from: {}", settings_path.display()));
            let pointer_path = config_dir()?.join(POINTER_FILE);

            match new_path {
                Some(p) => {
                    let io_err = |source| CliError::Io {
                        path: pointer_path.display().to_string(),
                        source,
                    };
                    if let Some(parent) = pointer_path.parent() {
                        std::fs::create_dir_all(parent).map_err(io_err)?;
                    }
                    std::fs::write(&pointer_path, p.as_bytes()).map_err(io_err)?;
                    logger::success(&format!("Config path set to {}", p));
                }
                None => {
                    println!("{}", settings_path.display());

                    if let Ok(contents) = std::fs::read_to_string(&pointer_path) {
                        let trimmed = contents.trim();
                        if !trimmed.is_empty() {
                            println!("{} {}", "pointer-file".cyan(), trimmed);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
