//! Single pass over an expanded token stream building the [`Configuration`]

use crate::cancel::CancelToken;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::XArgsError;
use crate::location::{LocationResolver, JARS_PROPERTY};
use crate::tokens::{Directive, Token};
use crate::types::{
    BundleDirective, Configuration, PropertyKind, StartMode, DEFAULT_INITIAL_START_LEVEL,
};
use tracing::{debug, trace};

pub struct DirectiveInterpreter<'a> {
    resolver: &'a LocationResolver,
    sink: &'a mut dyn DiagnosticSink,
    cancel: Option<&'a CancelToken>,
    /// Start level for bundles installed from here on
    initial_start_level: i32,
    config: Configuration,
}

impl<'a> DirectiveInterpreter<'a> {
    pub fn new(resolver: &'a LocationResolver, sink: &'a mut dyn DiagnosticSink) -> Self {
        DirectiveInterpreter {
            resolver,
            sink,
            cancel: None,
            initial_start_level: DEFAULT_INITIAL_START_LEVEL,
            config: Configuration::default(),
        }
    }

    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Interpret `tokens`; only malformed start levels and cancellation are fatal.
    pub fn run(mut self, tokens: Vec<Token>) -> Result<Configuration, XArgsError> {
        let mut tokens = tokens.into_iter().peekable();

        while let Some(token) = tokens.next() {
            if self.cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(XArgsError::Cancelled);
            }

            match Directive::parse(&token.text) {
                Directive::Property(kind, body) => self.define(kind, body, &token),
                Directive::Init => self.config.set_clear_persistent_data(),
                Directive::Install => {
                    let location = tokens.next_if(Token::is_argument);
                    self.install(&token, location.as_ref(), StartMode::Install);
                }
                Directive::InstallAndStart => {
                    let location = tokens.next_if(Token::is_argument);
                    self.install(&token, location.as_ref(), StartMode::Start);
                }
                Directive::Start(mode) => {
                    let location = tokens.next_if(Token::is_argument);
                    self.start(&token, location.as_ref(), mode);
                }
                Directive::InitLevel => {
                    let argument = tokens.next_if(Token::is_argument);
                    if let Some(level) = self.level(&token, argument.as_ref())? {
                        self.initial_start_level = level;
                    }
                }
                Directive::StartLevel => {
                    let argument = tokens.next_if(Token::is_argument);
                    if let Some(level) = self.level(&token, argument.as_ref())? {
                        self.config.set_start_level(level);
                    }
                }
                Directive::Include(_) => {
                    debug!("Ignoring unexpanded {} in {}", token.text, token.origin);
                }
                Directive::Other => trace!("Ignoring {}", token.text),
            }
        }

        Ok(self.config)
    }

    fn define(&mut self, kind: PropertyKind, body: &str, token: &Token) {
        let (name, value) = body.split_once('=').unwrap_or((body, ""));
        if name.is_empty() {
            self.report(token, format!("Missing property name in {}", token.text));
            return;
        }
        self.config.set_property(kind, name, value);
    }

    fn install(&mut self, token: &Token, location: Option<&Token>, mode: StartMode) {
        let Some(location) = location else {
            self.report(token, format!("Missing location for {}", token.text));
            return;
        };

        let resolved = self.resolve(&location.text);
        debug!("{} {} at level {}", token.text, resolved, self.initial_start_level);
        self.config.install(BundleDirective {
            location: resolved,
            start_level: self.initial_start_level,
            start_mode: mode,
        });
    }

    fn start(&mut self, token: &Token, location: Option<&Token>, mode: StartMode) {
        let Some(location) = location else {
            self.report(token, format!("Missing bundle for {}", token.text));
            return;
        };

        let resolved = self.resolve(&location.text);
        match self.config.bundle_mut(&resolved) {
            Some(bundle) => bundle.start_mode = mode,
            None => self.report(
                token,
                format!(
                    "Bundle '{}' does not match any installed bundles",
                    location.text
                ),
            ),
        }
    }

    fn level(&mut self, token: &Token, argument: Option<&Token>) -> Result<Option<i32>, XArgsError> {
        let Some(argument) = argument else {
            self.report(token, format!("Missing start level for {}", token.text));
            return Ok(None);
        };
        argument
            .text
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|source| XArgsError::NumberFormat {
                directive: token.text.clone(),
                value: argument.text.clone(),
                origin: argument.origin.to_string(),
                source,
            })
    }

    fn resolve(&self, location: &str) -> String {
        let jars = self
            .config
            .framework_property(JARS_PROPERTY)
            .or_else(|| self.config.system_property(JARS_PROPERTY));
        let bases = self.resolver.base_urls(jars);
        self.resolver.resolve(location, &bases)
    }

    fn report(&mut self, token: &Token, message: String) {
        let diagnostic = Diagnostic {
            origin: token.origin.to_string(),
            index: token.index,
            message,
        };
        debug!("{}", diagnostic);
        self.sink.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::OfflineProbe;

    fn resolver() -> LocationResolver {
        LocationResolver::new("/nonexistent-kfx-root").with_probe(Box::new(OfflineProbe))
    }

    fn interpret(texts: &[&str]) -> (Result<Configuration, XArgsError>, Vec<Diagnostic>) {
        let resolver = resolver();
        let mut diagnostics = Vec::new();
        let result =
            DirectiveInterpreter::new(&resolver, &mut diagnostics).run(Token::detached(texts.iter().copied()));
        (result, diagnostics)
    }

    #[test]
    fn test_properties() {
        let (result, diagnostics) = interpret(&["-Da=1", "-Fb=x=y", "-Dc", "-Da=2"]);
        assert!(diagnostics.is_empty());
        let Ok(config) = result else {
            assert!(false, "properties should interpret cleanly");
            return;
        };
        assert_eq!(config.system_property("a"), Some("2"));
        assert_eq!(config.framework_property("b"), Some("x=y"));
        assert_eq!(config.system_property("c"), Some(""));
    }

    #[test]
    fn test_empty_property_name_is_reported() {
        let (result, diagnostics) = interpret(&["-D=oops"]);
        assert!(result.is_ok_and(|c| c.properties().count() == 0));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_install_start_and_levels() {
        let (result, diagnostics) = interpret(&[
            "-init",
            "-install",
            "a.jar",
            "-initlevel",
            "3",
            "-istart",
            "b.jar",
            "-start_e",
            "a.jar",
            "-startlevel",
            "6",
        ]);
        assert!(diagnostics.is_empty());
        let Ok(config) = result else {
            assert!(false, "install and start directives should interpret cleanly");
            return;
        };
        assert!(config.clear_persistent_data());
        assert_eq!(config.start_level(), Some(6));
        assert!(config
            .bundle("a.jar")
            .is_some_and(|b| b.start_level == 1 && b.start_mode == StartMode::StartEagerly));
        assert!(config
            .bundle("b.jar")
            .is_some_and(|b| b.start_level == 3 && b.start_mode == StartMode::Start));
    }

    #[test]
    fn test_initlevel_is_not_retroactive() {
        let (result, _) = interpret(&["-install", "a.jar", "-initlevel", "5", "-start", "a.jar"]);
        assert!(result.is_ok_and(|c| c.bundle("a.jar").is_some_and(|b| b.start_level == 1)));
    }

    #[test]
    fn test_reinstall_overwrites() {
        let (result, _) = interpret(&["-istart", "a.jar", "-initlevel", "2", "-install", "a.jar"]);
        assert!(result.is_ok_and(|c| c
            .bundle("a.jar")
            .is_some_and(|b| b.start_level == 2 && b.start_mode == StartMode::Install)));
    }

    #[test]
    fn test_start_unknown_bundle_is_recoverable() {
        let (result, diagnostics) = interpret(&["-start", "foo.jar", "-startlevel", "2"]);
        assert!(result.is_ok_and(|c| c.bundle_count() == 0 && c.start_level() == Some(2)));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0]
            .message
            .contains("does not match any installed bundles"));
        assert_eq!(diagnostics[0].index, 0);
    }

    #[test]
    fn test_unknown_bundle_is_reported_at_start_directive() {
        let (result, diagnostics) = interpret(&["-init", "-start", "foo.jar"]);
        assert!(result.is_ok());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].index, 1);
        assert!(diagnostics[0].message.contains("'foo.jar'"));
    }

    #[test]
    fn test_missing_locations_are_recoverable() {
        let (result, diagnostics) = interpret(&["-install", "-istart", "-start_pt", "-init"]);
        assert!(result.is_ok_and(|c| c.bundle_count() == 0 && c.clear_persistent_data()));
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_bad_level_is_fatal() {
        let (result, _) = interpret(&["-install", "a.jar", "-startlevel", "high"]);
        assert!(matches!(result, Err(XArgsError::NumberFormat { .. })));

        let (result, _) = interpret(&["-initlevel", "1.5"]);
        assert!(matches!(result, Err(XArgsError::NumberFormat { .. })));
    }

    #[test]
    fn test_missing_level_is_recoverable() {
        let (result, diagnostics) = interpret(&["-startlevel"]);
        assert!(result.is_ok_and(|c| c.start_level().is_none()));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_unknown_directives_are_ignored() {
        let (result, diagnostics) = interpret(&["-launch", "-uninstall", "7", "-shutdown"]);
        assert!(result.is_ok_and(|c| c == Configuration::default()));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_jars_property_drives_bases() {
        let (result, _) = interpret(&["-Forg.knopflerfish.gosg.jars=http://repo/jars/", "-install", "log.jar"]);
        // Offline: the candidate is rejected and the location stays as written
        assert!(result.is_ok_and(|c| c.bundle("log.jar").is_some()));
    }

    #[test]
    fn test_cancelled_before_next_directive() {
        let resolver = resolver();
        let mut diagnostics = Vec::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = DirectiveInterpreter::new(&resolver, &mut diagnostics)
            .with_cancel(&cancel)
            .run(Token::detached(["-init"]));
        assert!(matches!(result, Err(XArgsError::Cancelled)));
    }
}
