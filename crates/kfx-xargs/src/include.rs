//! Recursive `-xargs` / `--xargs` expansion
//!
//! An include directive takes the next token as its path (a following
//! directive token does not count), loads and tokenizes the target, expands
//! it recursively and splices the result in place of the directive. Because
//! the splice happens at the directive's position, a property redefined after
//! the include overrides whatever the included file set.

use crate::errors::XArgsError;
use crate::source::{LoadedSource, SourceLoader};
use crate::tokens::{tokenize, Directive, IncludeMode, Token};
use std::sync::Arc;
use tracing::{debug, info};

/// Default nesting limit for includes
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

pub struct IncludeExpander<'a> {
    loader: &'a dyn SourceLoader,
    max_depth: usize,
    /// Origins currently being expanded, outermost first
    stack: Vec<String>,
}

impl<'a> IncludeExpander<'a> {
    pub fn new(loader: &'a dyn SourceLoader) -> Self {
        IncludeExpander {
            loader,
            max_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            stack: Vec::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand a token stream that has no source file of its own.
    pub fn expand(&mut self, tokens: Vec<Token>) -> Result<Vec<Token>, XArgsError> {
        let mut out = Vec::with_capacity(tokens.len());
        self.expand_into(tokens, &mut out)?;
        Ok(out)
    }

    /// Tokenize and expand a loaded source, tracking it for cycle detection.
    pub fn expand_source(&mut self, source: LoadedSource) -> Result<Vec<Token>, XArgsError> {
        let origin: Arc<str> = Arc::from(source.origin.as_str());
        let tokens = tokenize(&source.text, &origin);

        self.stack.push(source.origin);
        let mut out = Vec::with_capacity(tokens.len());
        let result = self.expand_into(tokens, &mut out);
        self.stack.pop();

        result.map(|()| out)
    }

    fn expand_into(&mut self, tokens: Vec<Token>, out: &mut Vec<Token>) -> Result<(), XArgsError> {
        let mut tokens = tokens.into_iter().peekable();

        while let Some(token) = tokens.next() {
            let Directive::Include(mode) = Directive::parse(&token.text) else {
                out.push(token);
                continue;
            };

            let Some(path) = tokens.next_if(Token::is_argument) else {
                if mode == IncludeMode::Lenient {
                    debug!(
                        "Dropping {} without a path in {}",
                        token.text, token.origin
                    );
                    continue;
                }
                return Err(XArgsError::MissingArgument {
                    directive: token.text,
                    origin: token.origin.to_string(),
                });
            };

            // Expanded into a scratch buffer so a dropped include leaves no partial tokens
            match self.include(&path.text) {
                Ok(expanded) => out.extend(expanded),
                Err(err) if mode == IncludeMode::Lenient && err.is_ignorable_load_failure() => {
                    info!("Ignoring optional include {}: {}", path.text, err);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }

    fn include(&mut self, reference: &str) -> Result<Vec<Token>, XArgsError> {
        if self.stack.len() > self.max_depth {
            return Err(XArgsError::IncludeTooDeep {
                limit: self.max_depth,
                reference: reference.to_string(),
            });
        }

        let source = self.loader.load(reference)?;
        if self.stack.contains(&source.origin) {
            let mut chain = self.stack.clone();
            chain.push(source.origin);
            return Err(XArgsError::CircularInclude {
                chain: chain.join(" -> "),
            });
        }

        debug!("Including {}", source.origin);
        self.expand_source(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory loader keyed by reference
    struct MapLoader(HashMap<&'static str, &'static str>);

    impl SourceLoader for MapLoader {
        fn load(&self, reference: &str) -> Result<LoadedSource, XArgsError> {
            self.0
                .get(reference)
                .map(|text| LoadedSource {
                    origin: reference.to_string(),
                    text: (*text).to_string(),
                })
                .ok_or_else(|| XArgsError::FileNotFound(reference.to_string()))
        }
    }

    fn loader(files: &[(&'static str, &'static str)]) -> MapLoader {
        MapLoader(files.iter().copied().collect())
    }

    fn expand_root(loader: &MapLoader, root: &'static str) -> Result<Vec<String>, XArgsError> {
        let source = loader.load(root)?;
        let tokens = IncludeExpander::new(loader).expand_source(source)?;
        Ok(tokens.into_iter().map(|t| t.text).collect())
    }

    #[test]
    fn test_include_is_spliced_in_place() {
        let files = loader(&[("a", "-Dx=1\n-xargs b\n-Dx=3\n"), ("b", "-Dx=2\n")]);
        let tokens = expand_root(&files, "a");
        assert!(tokens.is_ok_and(|t| t == vec!["-Dx=1", "-Dx=2", "-Dx=3"]));
    }

    #[test]
    fn test_path_on_following_line() {
        let files = loader(&[("a", "-xargs\nb\n-init\n"), ("b", "-Dy=1\n")]);
        let tokens = expand_root(&files, "a");
        assert!(tokens.is_ok_and(|t| t == vec!["-Dy=1", "-init"]));
    }

    #[test]
    fn test_nested_origins_are_kept() {
        let files = loader(&[("a", "-xargs b\n"), ("b", "-xargs c\n-init\n"), ("c", "-Dz=1\n")]);
        let Ok(source) = files.load("a") else {
            return;
        };
        let tokens = IncludeExpander::new(&files).expand_source(source);
        assert!(tokens.is_ok_and(|t| {
            t.iter().map(|tok| tok.origin.as_ref()).collect::<Vec<_>>() == vec!["c", "b"]
        }));
    }

    #[test]
    fn test_strict_missing_target_fails() {
        let files = loader(&[("a", "-xargs missing\n")]);
        assert!(matches!(
            expand_root(&files, "a"),
            Err(XArgsError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_lenient_missing_target_is_dropped() {
        let files = loader(&[("a", "--xargs missing\n-init\n")]);
        assert!(expand_root(&files, "a").is_ok_and(|t| t == vec!["-init"]));
    }

    #[test]
    fn test_lenient_drops_broken_include_entirely() {
        let files = loader(&[("a", "--xargs b\n-init\n"), ("b", "-Dx=1\n-xargs gone\n")]);
        assert!(expand_root(&files, "a").is_ok_and(|t| t == vec!["-init"]));
    }

    #[test]
    fn test_missing_path_argument() {
        let files = loader(&[("a", "-Dx=1\n-xargs\n")]);
        assert!(matches!(
            expand_root(&files, "a"),
            Err(XArgsError::MissingArgument { .. })
        ));

        let files = loader(&[("a", "--xargs\n-init\n")]);
        assert!(expand_root(&files, "a").is_ok_and(|t| t == vec!["-init"]));
    }

    #[test]
    fn test_directive_is_not_taken_as_path() {
        let files = loader(&[("a", "-xargs\n-init\n")]);
        assert!(matches!(
            expand_root(&files, "a"),
            Err(XArgsError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_cycle_is_reported() {
        let files = loader(&[("a", "-xargs b\n"), ("b", "--xargs a\n")]);
        let result = expand_root(&files, "a");
        assert!(matches!(
            result,
            Err(XArgsError::CircularInclude { ref chain }) if chain == "a -> b -> a"
        ));
    }

    #[test]
    fn test_depth_limit() {
        let files = loader(&[("a", "-xargs b\n"), ("b", "-xargs c\n"), ("c", "-init\n")]);
        let Ok(source) = files.load("a") else {
            return;
        };
        let result = IncludeExpander::new(&files)
            .with_max_depth(1)
            .expand_source(source);
        assert!(matches!(result, Err(XArgsError::IncludeTooDeep { limit: 1, .. })));
    }

    #[test]
    fn test_detached_tokens_expand() {
        let files = loader(&[("b", "-Dq=1\n")]);
        let tokens = IncludeExpander::new(&files).expand(Token::detached(["-xargs", "b", "-init"]));
        assert!(tokens.is_ok_and(|t| t.len() == 2 && t[0].text == "-Dq=1"));
    }
}
