//! `kfx export`: write a resolved configuration back out as an xargs file

use crate::commands::parse::parse_source;
use crate::common::{GlobalOpts, SourceArgs};
use crate::errors::CliError;
use clap::Args;
use kfx_config::Settings;
use kfx_logger as logger;
use kfx_xargs::writer::render;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ExportCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn handle_export(cmd: ExportCommand, _opts: GlobalOpts) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let outcome = parse_source(&cmd.source, &settings)?;
    let text = render(&outcome.configuration);

    match cmd.output {
        Some(path) => {
            std::fs::write(&path, text).map_err(|source| CliError::Io {
                path: path.display().to_string(),
                source,
            })?;
            logger::success(&format!("Wrote {}", path.display()));
        }
        None => print!("{}", text),
    }
    Ok(())
}
