//! `kfx parse`: resolve an xargs file and print the resulting configuration

use crate::common::{build_parser, GlobalOpts, OutputFormat, SourceArgs};
use crate::errors::CliError;
use clap::Args;
use colored::Colorize;
use kfx_config::Settings;
use kfx_logger as logger;
use kfx_xargs::writer::render_properties;
use kfx_xargs::{Configuration, ParseOutcome, PropertyKind};
use std::fmt::Write;

#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn handle_parse(cmd: ParseCommand, _opts: GlobalOpts) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let outcome = parse_source(&cmd.source, &settings)?;
    print!("{}", format_configuration(&outcome.configuration, cmd.format)?);
    Ok(())
}

/// Parse `source` with a progress spinner, reporting skipped directives as warnings.
pub fn parse_source(source: &SourceArgs, settings: &Settings) -> Result<ParseOutcome, CliError> {
    let parser = build_parser(source, settings)?;

    logger::step(&format!("Parsing {}", source.file));
    logger::spinner_start(&format!("Resolving bundles in {}", source.file));
    let result = parser.parse_file(&source.file);
    logger::spinner_stop();
    let outcome = result?;

    for diagnostic in &outcome.diagnostics {
        logger::warn(&diagnostic.to_string());
    }
    if let Some(summary) = outcome.summary() {
        logger::warn(summary);
        if !logger::is_quiet() {
            logger::show_log_path();
        }
    } else {
        logger::debug(&format!(
            "Resolved {} bundles from {}",
            outcome.configuration.bundle_count(),
            source.file
        ));
    }

    Ok(outcome)
}

pub fn format_configuration(
    config: &Configuration,
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(format_text(config)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)? + "\n"),
        OutputFormat::Toml => Ok(toml::to_string_pretty(config)?),
    }
}

fn format_text(config: &Configuration) -> String {
    let mut out = String::new();

    let start_level = config
        .start_level()
        .map_or_else(|| "unset".to_string(), |level| level.to_string());
    let _ = writeln!(out, "{} {}", "Start level:".bold(), start_level);
    let _ = writeln!(
        out,
        "{} {}",
        "Clear persistent data:".bold(),
        if config.clear_persistent_data() { "yes" } else { "no" }
    );

    for (title, kind) in [
        ("System properties:", PropertyKind::System),
        ("Framework properties:", PropertyKind::Framework),
    ] {
        let _ = writeln!(out, "{}", title.bold().green());
        for line in render_properties(config, kind).lines() {
            let _ = writeln!(out, "  {}", line);
        }
    }

    let _ = writeln!(out, "{}", "Bundles:".bold().green());
    for bundle in config.bundles() {
        let _ = writeln!(
            out,
            "  {:>3} {:<26} {}",
            bundle.start_level,
            bundle.start_mode.to_string().cyan(),
            bundle.location
        );
    }

    out
}
