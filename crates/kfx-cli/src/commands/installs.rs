//! `kfx installs`: manage known framework installations

use crate::common::install_store;
use crate::errors::CliError;
use crate::GlobalOpts;
use clap::Subcommand;
use colored::Colorize;
use kfx_config::installs::{add_install, list_installs};
use kfx_config::{FrameworkInstall, Settings, Store};
use kfx_logger as logger;

#[derive(Subcommand, Debug, Clone)]
pub enum InstallsAction {
    /// List stored installs
    List,
    /// Add or replace an install
    Add {
        name: String,
        /// Framework directory or `file:` URL
        location: String,
        /// Make this the default install
        #[arg(long)]
        default: bool,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove an install
    Remove { name: String },
}

pub fn handle_installs(action: InstallsAction, opts: GlobalOpts) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let store = install_store(&settings)?;

    match action {
        InstallsAction::List => {
            let installs = list_installs(&store)?;
            println!("{}", "Framework installs:".bold().green());
            if installs.is_empty() && opts.verbosity_level() > 0 {
                println!("  {}", "(none)".yellow());
            }
            for (name, install) in installs {
                let marker = if install.default { "*" } else { " " };
                print!("{} {}: {}", marker, name.cyan(), install.location);
                match install.description {
                    Some(description) => println!(" ({})", description),
                    None => println!(),
                }
            }
        }
        InstallsAction::Add {
            name,
            location,
            default,
            description,
        } => {
            let install = FrameworkInstall {
                location,
                default,
                description,
            };
            add_install(&store, &name, &install)?;
            logger::success(&format!("Added install {} -> {}", name, install.location));
        }
        InstallsAction::Remove { name } => {
            if !store.remove(&name)? {
                return Err(CliError::UnknownInstall(name));
            }
            logger::success(&format!("Removed install {}", name));
        }
    }
    Ok(())
}
