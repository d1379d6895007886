//! Minimal URL handling for bundle locations
//!
//! Bundle locations are loose strings: `jars/log.jar`, `file:jars/log.jar`,
//! `http://host/bundles/log.jar`. A string has a scheme only when a colon
//! appears at index 2 or later and before the first slash, which keeps
//! Windows drive letters (`C:\...`) scheme-less. Relative references resolve
//! against a base the way `java.net.URL` does, including a relative path
//! under a matching scheme (`file:` + `file:jars/a.jar`).

use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    scheme: String,
    authority: Option<String>,
    path: String,
}

/// Position of the scheme separator, if the string has a scheme
pub fn scheme_end(s: &str) -> Option<usize> {
    let colon = s.find(':')?;
    if colon < 2 {
        return None;
    }
    if s.find('/').is_some_and(|slash| slash < colon) {
        return None;
    }
    let scheme = &s[..colon];
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    (starts_alpha && valid).then_some(colon)
}

pub fn has_scheme(s: &str) -> bool {
    scheme_end(s).is_some()
}

impl Url {
    /// Parse a string that carries a scheme; scheme-less strings yield `None`.
    pub fn parse(s: &str) -> Option<Url> {
        let colon = scheme_end(s)?;
        let scheme = s[..colon].to_ascii_lowercase();
        let rest = &s[colon + 1..];
        let (authority, path) = split_authority(rest);
        Some(Url {
            scheme,
            authority,
            path: path.to_string(),
        })
    }

    /// `file:` URL for a local path
    pub fn from_file_path(path: &Path) -> Url {
        let mut text = path.to_string_lossy().replace('\\', "/");
        if !text.starts_with('/') {
            text.insert(0, '/');
        }
        Url {
            scheme: "file".to_string(),
            authority: None,
            path: text,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_file(&self) -> bool {
        self.scheme == "file"
    }

    pub fn is_http(&self) -> bool {
        self.scheme == "http" || self.scheme == "https"
    }

    /// Whether the path is relative and still needs a base to be located
    pub fn has_relative_path(&self) -> bool {
        self.authority.is_none() && !self.path.starts_with('/')
    }

    /// Resolve `reference` against this URL.
    pub fn resolve(&self, reference: &str) -> Url {
        if let Some(parsed) = Url::parse(reference) {
            if parsed.scheme != self.scheme || !parsed.has_relative_path() {
                return parsed;
            }
            return self.with_path(self.merge(&parsed.path));
        }

        if reference.starts_with("//") {
            let (authority, path) = split_authority(reference);
            return Url {
                scheme: self.scheme.clone(),
                authority,
                path: remove_dot_segments(&path),
            };
        }

        if reference.starts_with('/') {
            return self.with_path(remove_dot_segments(reference));
        }

        self.with_path(self.merge(reference))
    }

    fn with_path(&self, path: String) -> Url {
        Url {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            path,
        }
    }

    fn merge(&self, relative: &str) -> String {
        let merged = if self.authority.is_some() && self.path.is_empty() {
            format!("/{}", relative)
        } else {
            match self.path.rfind('/') {
                Some(slash) => format!("{}{}", &self.path[..=slash], relative),
                None => relative.to_string(),
            }
        };
        remove_dot_segments(&merged)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(authority) = &self.authority {
            write!(f, "//{}", authority)?;
        }
        write!(f, "{}", self.path)
    }
}

fn split_authority(rest: &str) -> (Option<String>, String) {
    match rest.strip_prefix("//") {
        Some(after) => match after.find('/') {
            Some(slash) => (
                Some(after[..slash].to_string()),
                after[slash..].to_string(),
            ),
            None => (Some(after.to_string()), String::new()),
        },
        None => (None, rest.to_string()),
    }
}

fn remove_dot_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    let body = if absolute { &path[1..] } else { path };

    let mut segments: Vec<&str> = Vec::new();
    let mut trailing_slash = false;
    for segment in body.split('/') {
        trailing_slash = false;
        match segment {
            "." => trailing_slash = true,
            ".." => {
                match segments.last() {
                    Some(&last) if last != ".." => {
                        segments.pop();
                    }
                    _ if !absolute => segments.push(".."),
                    _ => {}
                }
                trailing_slash = true;
            }
            _ => segments.push(segment),
        }
    }

    let mut result = if absolute { String::from("/") } else { String::new() };
    result.push_str(&segments.join("/"));
    if trailing_slash && !segments.is_empty() {
        result.push('/');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(base: &str, reference: &str) -> Option<String> {
        Url::parse(base).map(|b| b.resolve(reference).to_string())
    }

    #[test]
    fn test_scheme_detection() {
        assert!(has_scheme("file:jars/a.jar"));
        assert!(has_scheme("http://host/a.jar"));
        assert!(!has_scheme("jars/a.jar"));
        assert!(!has_scheme("C:\\bundles\\a.jar"));
        assert!(!has_scheme("jars/odd:name.jar"));
        assert!(!has_scheme("x:y"));
    }

    #[test]
    fn test_parse_and_display() {
        let url = Url::parse("HTTP://example.org/kf/jars/");
        assert!(url.as_ref().is_some_and(|u| u.is_http() && u.path() == "/kf/jars/"));
        assert_eq!(
            url.map(|u| u.to_string()),
            Some("http://example.org/kf/jars/".to_string())
        );
        assert_eq!(Url::parse("file:").map(|u| u.to_string()), Some("file:".to_string()));
    }

    #[test]
    fn test_resolve_relative_against_file_base() {
        assert_eq!(resolve("file:", "jars/a.jar"), Some("file:jars/a.jar".to_string()));
        assert_eq!(
            resolve("file:/opt/kf/", "jars/a.jar"),
            Some("file:/opt/kf/jars/a.jar".to_string())
        );
        assert_eq!(
            resolve("file:/opt/kf/init.xargs", "../lib/a.jar"),
            Some("file:/opt/lib/a.jar".to_string())
        );
    }

    #[test]
    fn test_resolve_same_scheme_relative() {
        assert_eq!(
            resolve("file:/opt/kf/", "file:jars/a.jar"),
            Some("file:/opt/kf/jars/a.jar".to_string())
        );
    }

    #[test]
    fn test_resolve_keeps_foreign_scheme() {
        assert_eq!(
            resolve("http://host/jars/", "file:jars/a.jar"),
            Some("file:jars/a.jar".to_string())
        );
    }

    #[test]
    fn test_resolve_against_http_base() {
        assert_eq!(
            resolve("http://host/kf/jars/", "log/log.jar"),
            Some("http://host/kf/jars/log/log.jar".to_string())
        );
        assert_eq!(
            resolve("http://host", "log.jar"),
            Some("http://host/log.jar".to_string())
        );
        assert_eq!(
            resolve("http://host/kf/jars/", "/root.jar"),
            Some("http://host/root.jar".to_string())
        );
    }

    #[test]
    fn test_from_file_path() {
        let url = Url::from_file_path(Path::new("/tmp/kf/jars/a.jar"));
        assert_eq!(url.to_string(), "file:/tmp/kf/jars/a.jar");
        assert!(!url.has_relative_path());
    }

    #[test]
    fn test_remove_dot_segments() {
        assert_eq!(remove_dot_segments("/a/b/../c/./d"), "/a/c/d");
        assert_eq!(remove_dot_segments("../a"), "../a");
        assert_eq!(remove_dot_segments("/../a"), "/a");
        assert_eq!(remove_dot_segments("a/b/.."), "a/");
    }
}
