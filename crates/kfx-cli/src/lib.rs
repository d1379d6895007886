//! kfx library - expose command modules for testing

pub mod commands;
pub mod common;
pub mod errors;

pub use common::GlobalOpts;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Route library `tracing` events to stderr.
///
/// `RUST_LOG` wins; otherwise the filter follows `-v`/`-vv`.
pub fn init_tracing(verbosity: u8) {
    let fallback = match verbosity {
        0 => "error",
        1 => "kfx_xargs=debug,kfx=debug",
        _ => "kfx_xargs=trace,kfx_config=trace,kfx=trace",
    };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
