//! Completing bundle locations against candidate base URLs
//!
//! A location without a scheme (or a `file:` location with a relative path)
//! is tried against each base URL in order. The first candidate that can be
//! reached wins; when none can, the location is returned unchanged so the
//! framework can still try it at launch time.

use crate::source::{absolute, DEFAULT_HTTP_TIMEOUT};
use crate::url::Url;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};

/// Property holding the `;`-separated list of jar base URLs
pub const JARS_PROPERTY: &str = "org.knopflerfish.gosg.jars";

/// Base used when the jars property is not set
pub const DEFAULT_JAR_BASE: &str = "file:";

/// Reachability check for candidates that are not local files
pub trait Probe {
    fn reachable(&self, url: &Url) -> bool;
}

/// Probe issuing a HEAD request and accepting only `200 OK`.
///
/// Only `http` and `https` candidates are checked. Any other scheme
/// (`ftp:`, `jar:`, ...) is reported unreachable without a connection attempt.
pub struct HttpProbe {
    client: Option<Client>,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Self {
        let client = match Client::builder().timeout(timeout).build() {
            Ok(client) => Some(client),
            Err(e) => {
                debug!("HTTP client unavailable, remote locations will not resolve: {}", e);
                None
            }
        };
        HttpProbe { client }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        HttpProbe::new(DEFAULT_HTTP_TIMEOUT)
    }
}

impl Probe for HttpProbe {
    fn reachable(&self, url: &Url) -> bool {
        if !url.is_http() {
            return false;
        }
        let Some(client) = &self.client else {
            return false;
        };
        match client.head(url.to_string()).send() {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                trace!("{} unreachable: {}", url, e);
                false
            }
        }
    }
}

/// Probe that rejects every remote candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProbe;

impl Probe for OfflineProbe {
    fn reachable(&self, _url: &Url) -> bool {
        false
    }
}

pub struct LocationResolver {
    default_dir: PathBuf,
    top_dir: String,
    default_base: String,
    probe: Box<dyn Probe>,
}

impl LocationResolver {
    pub fn new(default_dir: impl Into<PathBuf>) -> Self {
        LocationResolver {
            default_dir: absolute(&default_dir.into()),
            top_dir: String::new(),
            default_base: DEFAULT_JAR_BASE.to_string(),
            probe: Box::new(HttpProbe::default()),
        }
    }

    /// Prefix substituted for `file:jars/` locations
    pub fn with_top_dir(mut self, top_dir: impl Into<String>) -> Self {
        self.top_dir = top_dir.into();
        self
    }

    pub fn with_default_base(mut self, base: impl Into<String>) -> Self {
        self.default_base = base.into();
        self
    }

    pub fn with_probe(mut self, probe: Box<dyn Probe>) -> Self {
        self.probe = probe;
        self
    }

    /// Base URLs from the jars property value, or the default base.
    ///
    /// Entries are normalized through [`Url`]; entries without a scheme are
    /// kept as they are and will not match any candidate.
    pub fn base_urls(&self, jars_property: Option<&str>) -> Vec<String> {
        match jars_property.filter(|value| !value.trim().is_empty()) {
            Some(value) => value
                .split(';')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(normalize_base)
                .collect(),
            None => vec![normalize_base(&self.default_base)],
        }
    }

    /// Complete `raw` against `bases`, returning the first reachable candidate.
    pub fn resolve(&self, raw: &str, bases: &[String]) -> String {
        let location = self.rewrite_top_dir(raw);

        if let Some(url) = Url::parse(&location) {
            if !(url.is_file() && url.has_relative_path()) {
                return location;
            }
        }

        for base in bases {
            let Some(base_url) = Url::parse(base) else {
                trace!("Skipping base without scheme: {}", base);
                continue;
            };
            let candidate = base_url.resolve(&location);
            trace!("Trying {} for {}", candidate, location);
            if let Some(found) = self.validate(candidate) {
                debug!("Resolved {} to {}", raw, found);
                return found.to_string();
            }
        }

        debug!("Could not resolve {}, keeping it as is", raw);
        location
    }

    fn rewrite_top_dir(&self, raw: &str) -> String {
        if self.top_dir.is_empty() {
            return raw.to_string();
        }
        match raw.strip_prefix("file:") {
            Some(rest) if rest.starts_with("jars/") => {
                let top = self.top_dir.trim_end_matches(|c| c == '/' || c == '\\');
                format!("file:{}/{}", top, rest).replace('\\', "/")
            }
            _ => raw.to_string(),
        }
    }

    fn validate(&self, candidate: Url) -> Option<Url> {
        if candidate.is_file() {
            return self.find_local(candidate.path());
        }
        self.probe.reachable(&candidate).then_some(candidate)
    }

    fn find_local(&self, path: &str) -> Option<Url> {
        if path.is_empty() {
            return None;
        }
        let path = Path::new(path);
        let candidates = if path.is_absolute() {
            vec![path.to_path_buf()]
        } else {
            vec![self.default_dir.join(path), absolute(path)]
        };
        candidates
            .into_iter()
            .find(|p| is_readable(p))
            .map(|p| Url::from_file_path(&canonical(&p)))
    }
}

/// Resolve symlinks and dot segments so equal files give equal locations
fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|e| {
        trace!("Cannot canonicalize {}: {}", path.display(), e);
        lexical_normalize(path)
    })
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` is `/`
                if normalized.has_root() && normalized.parent().is_none() {
                    continue;
                }
                let ends_with_up = matches!(
                    normalized.components().next_back(),
                    None | Some(Component::ParentDir)
                );
                if ends_with_up || !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn normalize_base(entry: &str) -> String {
    Url::parse(entry).map_or_else(|| entry.to_string(), |url| url.to_string())
}

fn is_readable(path: &Path) -> bool {
    if path.is_dir() {
        fs::read_dir(path).is_ok()
    } else {
        fs::File::open(path).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_once;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Probe accepting a fixed set of URLs and counting calls
    struct FakeProbe {
        reachable: Vec<&'static str>,
        calls: Rc<Cell<usize>>,
    }

    impl Probe for FakeProbe {
        fn reachable(&self, url: &Url) -> bool {
            self.calls.set(self.calls.get() + 1);
            let text = url.to_string();
            self.reachable.iter().any(|r| *r == text)
        }
    }

    fn fixture() -> Option<TempDir> {
        let dir = TempDir::new().ok()?;
        fs::create_dir_all(dir.path().join("jars")).ok()?;
        fs::write(dir.path().join("jars").join("test.jar"), b"PK").ok()?;
        Some(dir)
    }

    fn offline(dir: &Path) -> LocationResolver {
        LocationResolver::new(dir).with_probe(Box::new(OfflineProbe))
    }

    fn bases(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    /// The temp dir as the resolver reports it (`/var` is a symlink on macOS)
    fn real_path(dir: &Path) -> PathBuf {
        dunce::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
    }

    #[test]
    fn test_relative_file_location_becomes_absolute() {
        let Some(dir) = fixture() else {
            return;
        };
        let expected = Url::from_file_path(&real_path(dir.path()).join("jars").join("test.jar")).to_string();
        let resolver = offline(dir.path());

        assert_eq!(resolver.resolve("file:jars/test.jar", &bases(&["file:"])), expected);
        assert_eq!(resolver.resolve("jars/test.jar", &bases(&["file:"])), expected);
        assert_eq!(resolver.resolve("test.jar", &bases(&["file:jars/"])), expected);
    }

    #[test]
    fn test_parent_segments_are_removed_from_resolved_file() {
        let Some(dir) = fixture() else {
            return;
        };
        if fs::create_dir_all(dir.path().join("osgi")).is_err() {
            return;
        }
        let expected = Url::from_file_path(&real_path(dir.path()).join("jars").join("test.jar")).to_string();
        let resolver = offline(&dir.path().join("osgi"));

        let resolved = resolver.resolve("../jars/test.jar", &bases(&["file:"]));
        assert_eq!(resolved, expected);
        assert!(!resolved.contains(".."));
        assert_eq!(resolver.resolve("./../jars/./test.jar", &bases(&["file:"])), expected);
    }

    #[test]
    fn test_lexical_normalize() {
        assert_eq!(lexical_normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(lexical_normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(lexical_normalize(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(lexical_normalize(Path::new("../../a")), PathBuf::from("../../a"));
    }

    #[test]
    fn test_unresolvable_location_is_unchanged() {
        let Some(dir) = fixture() else {
            return;
        };
        let resolver = offline(dir.path());
        assert_eq!(resolver.resolve("foo.jar", &bases(&["file:", "http://host/"])), "foo.jar");
    }

    #[test]
    fn test_schemed_location_is_not_checked() {
        let Some(dir) = fixture() else {
            return;
        };
        let calls = Rc::new(Cell::new(0));
        let resolver = LocationResolver::new(dir.path()).with_probe(Box::new(FakeProbe {
            reachable: vec![],
            calls: Rc::clone(&calls),
        }));

        assert_eq!(
            resolver.resolve("http://host/a.jar", &bases(&["http://other/"])),
            "http://host/a.jar"
        );
        assert_eq!(resolver.resolve("file:/abs/a.jar", &bases(&["file:"])), "file:/abs/a.jar");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_first_reachable_base_wins() {
        let Some(dir) = fixture() else {
            return;
        };
        let calls = Rc::new(Cell::new(0));
        let resolver = LocationResolver::new(dir.path()).with_probe(Box::new(FakeProbe {
            reachable: vec!["http://b/jars/log.jar", "http://c/jars/log.jar"],
            calls: Rc::clone(&calls),
        }));

        let resolved = resolver.resolve(
            "log.jar",
            &bases(&["http://a/jars/", "http://b/jars/", "http://c/jars/"]),
        );
        assert_eq!(resolved, "http://b/jars/log.jar");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_local_file_beats_later_remote_base() {
        let Some(dir) = fixture() else {
            return;
        };
        let resolver = offline(dir.path());
        let resolved = resolver.resolve("test.jar", &bases(&["http://a/", "file:jars/"]));
        assert!(resolved.starts_with("file:/"));
        assert!(resolved.ends_with("jars/test.jar"));
    }

    #[test]
    fn test_top_dir_rewrite() {
        let Some(dir) = fixture() else {
            return;
        };
        let top = dir.path().display().to_string();
        let resolver = offline(Path::new("/nonexistent")).with_top_dir(format!("{}/", top));
        let resolved = resolver.resolve("file:jars/test.jar", &bases(&["file:"]));
        assert_eq!(resolved, format!("file:{}/jars/test.jar", top).replace('\\', "/"));
    }

    #[test]
    fn test_base_urls() {
        let resolver = offline(Path::new("."));
        assert_eq!(resolver.base_urls(None), vec!["file:".to_string()]);
        assert_eq!(resolver.base_urls(Some("  ")), vec!["file:".to_string()]);
        assert_eq!(
            resolver.base_urls(Some("FILE:jars/; http://host/kf/;;relative/")),
            bases(&["file:jars/", "http://host/kf/", "relative/"])
        );

        let custom = offline(Path::new(".")).with_default_base("http://repo/jars/");
        assert_eq!(custom.base_urls(None), bases(&["http://repo/jars/"]));
    }

    #[test]
    fn test_http_check_ignores_other_schemes() {
        let probe = HttpProbe::new(Duration::from_millis(50));
        let Some(url) = Url::parse("ftp://host/a.jar") else {
            return;
        };
        assert!(!probe.reachable(&url));
    }

    #[test]
    fn test_http_check_requires_ok_status() {
        let probe = HttpProbe::new(Duration::from_secs(5));

        let Some(found) = serve_once("200 OK", "").and_then(|base| Url::parse(&format!("{}/jars/a.jar", base))) else {
            return;
        };
        assert!(probe.reachable(&found));

        let Some(missing) =
            serve_once("404 Not Found", "").and_then(|base| Url::parse(&format!("{}/jars/a.jar", base)))
        else {
            return;
        };
        assert!(!probe.reachable(&missing));
    }

    #[test]
    fn test_remote_base_resolves_over_http() {
        let Some(dir) = fixture() else {
            return;
        };
        let Some(base) = serve_once("200 OK", "") else {
            return;
        };
        let jars = format!("{}/jars/", base);
        let resolver = LocationResolver::new(dir.path()).with_probe(Box::new(HttpProbe::new(Duration::from_secs(5))));
        let resolved = resolver.resolve("log.jar", &bases(&[jars.as_str()]));
        assert_eq!(resolved, format!("{}/jars/log.jar", base));
    }
}
