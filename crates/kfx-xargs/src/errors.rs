use std::io;
use std::num::ParseIntError;
use thiserror::Error;

/// Errors that abort an xargs parse
#[derive(Error, Debug)]
pub enum XArgsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("xargs file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to fetch {url}: {message}")]
    Remote { url: String, message: String },

    #[error("Missing argument for {directive} in {origin}")]
    MissingArgument { directive: String, origin: String },

    #[error("Invalid number '{value}' for {directive} in {origin}")]
    NumberFormat {
        directive: String,
        value: String,
        origin: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Circular include: {chain}")]
    CircularInclude { chain: String },

    #[error("Include depth exceeds {limit} at {reference}")]
    IncludeTooDeep { limit: usize, reference: String },

    #[error("Parse cancelled")]
    Cancelled,
}

impl XArgsError {
    /// Whether a `--xargs` include may swallow this error.
    ///
    /// Missing or unreadable files and broken nested content are dropped;
    /// cycles, runaway nesting and cancellation always propagate.
    pub fn is_ignorable_load_failure(&self) -> bool {
        !matches!(
            self,
            XArgsError::CircularInclude { .. }
                | XArgsError::IncludeTooDeep { .. }
                | XArgsError::Cancelled
        )
    }
}
