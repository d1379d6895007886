//! Rendering a [`Configuration`] back into xargs text

use crate::types::{Configuration, PropertyKind, StartMode, DEFAULT_INITIAL_START_LEVEL};
use std::fmt::Write;

/// Render `config` as an xargs file that parses back to an equal configuration.
///
/// Property values ending in `\` would be folded into the next line on
/// re-parse; nothing in the format can escape that.
pub fn render(config: &Configuration) -> String {
    let mut out = String::new();
    out.push_str("# Generated by kfx\n");

    for property in config.properties() {
        let _ = writeln!(
            out,
            "{}{}={}",
            property.kind.prefix(),
            property.name,
            property.value
        );
    }

    if config.clear_persistent_data() {
        out.push_str("-init\n");
    }

    let mut level = DEFAULT_INITIAL_START_LEVEL;
    for bundle in config.bundles() {
        if bundle.start_level != level {
            level = bundle.start_level;
            let _ = writeln!(out, "-initlevel {}", level);
        }
        match bundle.start_mode {
            StartMode::Install => {
                let _ = writeln!(out, "-install {}", bundle.location);
            }
            StartMode::Start => {
                let _ = writeln!(out, "-istart {}", bundle.location);
            }
            mode => {
                let _ = writeln!(out, "-install {}", bundle.location);
                if let Some(directive) = mode.start_directive() {
                    let _ = writeln!(out, "{} {}", directive, bundle.location);
                }
            }
        }
    }

    if let Some(start_level) = config.start_level() {
        let _ = writeln!(out, "-startlevel {}", start_level);
    }

    out
}

/// Render only the properties of one namespace, one per line
pub fn render_properties(config: &Configuration, kind: PropertyKind) -> String {
    config
        .properties()
        .filter(|p| p.kind == kind)
        .map(|p| format!("{}{}={}\n", kind.prefix(), p.name, p.value))
        .collect()
}
