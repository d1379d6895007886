//! Knopflerfish xargs parsing
//!
//! Reads `.xargs` launch files, expands `-xargs`/`--xargs` includes,
//! completes bundle locations against the configured jar bases and produces
//! a read-only [`Configuration`]: system and framework properties, bundle
//! install/start directives, the framework start level and the `-init` flag.
//!
//! The pipeline is `lines` -> `tokens` -> `include` -> `interpreter`, with
//! `location` used by the interpreter to complete bundle locations.
//! [`XArgsParser`] wires the stages together.

pub mod cancel;
pub mod diagnostics;
pub mod errors;
pub mod include;
pub mod interpreter;
pub mod lines;
pub mod location;
pub mod parser;
pub mod source;
pub mod tokens;
pub mod types;
pub mod url;
pub mod writer;

#[cfg(test)]
mod testing;

pub use cancel::CancelToken;
pub use diagnostics::{Diagnostic, DiagnosticSink, FAILED_SUMMARY, INCOMPLETE_SUMMARY};
pub use errors::XArgsError;
pub use location::{HttpProbe, LocationResolver, OfflineProbe, Probe, JARS_PROPERTY};
pub use parser::{ParseOutcome, ParserOptions, XArgsParser};
pub use source::{FsSourceLoader, LoadedSource, SourceLoader};
pub use tokens::Token;
pub use types::{BundleDirective, Configuration, Property, PropertyKind, StartMode};
