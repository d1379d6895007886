//! Splitting logical lines into directive tokens

use crate::lines::logical_lines;
use crate::types::{PropertyKind, StartMode};
use std::sync::Arc;

/// Origin used for tokens that were not read from a file
pub const DETACHED_ORIGIN: &str = "<tokens>";

/// A single xargs token together with where it came from.
///
/// `index` is the ordinal of the token within its origin, which is what
/// diagnostics report as the directive position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub origin: Arc<str>,
    pub index: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, origin: Arc<str>, index: usize) -> Self {
        Token {
            text: text.into(),
            origin,
            index,
        }
    }

    /// Build a token stream with no file behind it.
    pub fn detached<I, S>(texts: I) -> Vec<Token>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let origin: Arc<str> = Arc::from(DETACHED_ORIGIN);
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Token::new(text, Arc::clone(&origin), index))
            .collect()
    }

    /// A token can serve as a directive argument unless it is itself a directive.
    pub fn is_argument(&self) -> bool {
        !self.text.starts_with('-')
    }
}

/// Split one logical line into a command and an optional argument.
///
/// Property lines (`-D`, `-F`) are never split. Other directives are split
/// at the first space; an argument that is empty after trimming is dropped.
pub fn split_line(line: &str) -> (&str, Option<&str>) {
    if line.starts_with("-D") || line.starts_with("-F") {
        return (line, None);
    }
    if line.starts_with('-') {
        if let Some((command, argument)) = line.split_once(' ') {
            let argument = argument.trim();
            return (command, (!argument.is_empty()).then_some(argument));
        }
    }
    (line, None)
}

/// Tokenize a whole xargs text.
pub fn tokenize(text: &str, origin: &Arc<str>) -> Vec<Token> {
    let mut tokens = Vec::new();
    for line in logical_lines(text) {
        let (command, argument) = split_line(&line);
        tokens.push(Token::new(command, Arc::clone(origin), tokens.len()));
        if let Some(argument) = argument {
            tokens.push(Token::new(argument, Arc::clone(origin), tokens.len()));
        }
    }
    tokens
}

/// How an include directive treats a target that cannot be loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeMode {
    /// `-xargs`: load failures abort the parse
    Strict,
    /// `--xargs`: load failures drop the include
    Lenient,
}

/// Recognized directive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `-D`/`-F` line, carrying the `name=value` body
    Property(PropertyKind, &'a str),
    Include(IncludeMode),
    Init,
    Install,
    InstallAndStart,
    Start(StartMode),
    InitLevel,
    StartLevel,
    /// Bare arguments and directives this parser does not handle
    Other,
}

impl<'a> Directive<'a> {
    pub fn parse(text: &'a str) -> Self {
        if let Some(body) = text.strip_prefix("-D") {
            return Directive::Property(PropertyKind::System, body);
        }
        if let Some(body) = text.strip_prefix("-F") {
            return Directive::Property(PropertyKind::Framework, body);
        }
        match text {
            "-xargs" => Directive::Include(IncludeMode::Strict),
            "--xargs" => Directive::Include(IncludeMode::Lenient),
            "-init" => Directive::Init,
            "-install" => Directive::Install,
            "-istart" => Directive::InstallAndStart,
            "-start" => Directive::Start(StartMode::Start),
            "-start_e" => Directive::Start(StartMode::StartEagerly),
            "-start_et" => Directive::Start(StartMode::StartEagerlyTransiently),
            "-start_pt" => Directive::Start(StartMode::StartTransiently),
            "-initlevel" => Directive::InitLevel,
            "-startlevel" => Directive::StartLevel,
            _ => Directive::Other,
        }
    }
}
