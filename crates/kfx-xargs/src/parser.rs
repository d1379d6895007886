//! Entry point tying loading, expansion and interpretation together
//!
//! Every call starts from fresh state, so parsing the same file twice gives
//! equal results.

use crate::cancel::CancelToken;
use crate::diagnostics::{Diagnostic, INCOMPLETE_SUMMARY};
use crate::errors::XArgsError;
use crate::include::{IncludeExpander, DEFAULT_MAX_INCLUDE_DEPTH};
use crate::interpreter::DirectiveInterpreter;
use crate::location::{HttpProbe, LocationResolver, OfflineProbe, Probe, DEFAULT_JAR_BASE};
use crate::source::{FsSourceLoader, LoadedSource, SourceLoader, DEFAULT_HTTP_TIMEOUT};
use crate::tokens::Token;
use crate::types::Configuration;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Knobs for a parser instance
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Root for include lookups and relative `file:` locations
    pub default_dir: PathBuf,
    /// Prefix for the `file:jars/` rewrite; empty disables it
    pub top_dir: String,
    /// Base URL used when the jars property is not set
    pub default_base: String,
    pub http_timeout: Duration,
    pub max_include_depth: usize,
    /// Never touch the network while resolving locations
    pub offline: bool,
}

impl ParserOptions {
    pub fn new(default_dir: impl Into<PathBuf>) -> Self {
        ParserOptions {
            default_dir: default_dir.into(),
            top_dir: String::new(),
            default_base: DEFAULT_JAR_BASE.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            offline: false,
        }
    }
}

/// A parsed configuration together with the recoverable problems met on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub configuration: Configuration,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Soft summary for the user when some directives were skipped
    pub fn summary(&self) -> Option<&'static str> {
        (!self.is_complete()).then_some(INCOMPLETE_SUMMARY)
    }
}

pub struct XArgsParser {
    loader: Box<dyn SourceLoader>,
    resolver: LocationResolver,
    max_include_depth: usize,
    cancel: Option<CancelToken>,
}

impl XArgsParser {
    pub fn new(options: ParserOptions) -> Self {
        let probe: Box<dyn Probe> = if options.offline {
            Box::new(OfflineProbe)
        } else {
            Box::new(HttpProbe::new(options.http_timeout))
        };
        let loader =
            FsSourceLoader::new(options.default_dir.clone()).with_timeout(options.http_timeout);
        let resolver = LocationResolver::new(options.default_dir)
            .with_top_dir(options.top_dir)
            .with_default_base(options.default_base)
            .with_probe(probe);

        XArgsParser {
            loader: Box::new(loader),
            resolver,
            max_include_depth: options.max_include_depth,
            cancel: None,
        }
    }

    pub fn with_loader(mut self, loader: Box<dyn SourceLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_probe(mut self, probe: Box<dyn Probe>) -> Self {
        self.resolver = self.resolver.with_probe(probe);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Load, expand and interpret the file or URL named by `reference`.
    pub fn parse_file(&self, reference: &str) -> Result<ParseOutcome, XArgsError> {
        let tokens = self.expand_file(reference)?;
        self.interpret(tokens)
    }

    /// Parse xargs text that is already in memory.
    pub fn parse_str(&self, text: &str, origin: &str) -> Result<ParseOutcome, XArgsError> {
        let tokens = self.expander().expand_source(LoadedSource {
            origin: origin.to_string(),
            text: text.to_string(),
        })?;
        self.interpret(tokens)
    }

    /// The fully expanded token stream of a file, before interpretation.
    pub fn expand_file(&self, reference: &str) -> Result<Vec<Token>, XArgsError> {
        let source = self.loader.load(reference)?;
        info!("Parsing xargs file {}", source.origin);
        self.expander().expand_source(source)
    }

    /// Interpret an already expanded token stream.
    pub fn interpret(&self, tokens: Vec<Token>) -> Result<ParseOutcome, XArgsError> {
        let mut diagnostics = Vec::new();
        let mut interpreter = DirectiveInterpreter::new(&self.resolver, &mut diagnostics);
        if let Some(cancel) = &self.cancel {
            interpreter = interpreter.with_cancel(cancel);
        }
        let configuration = interpreter.run(tokens)?;

        Ok(ParseOutcome {
            configuration,
            diagnostics,
        })
    }

    fn expander(&self) -> IncludeExpander<'_> {
        IncludeExpander::new(self.loader.as_ref()).with_max_depth(self.max_include_depth)
    }
}
