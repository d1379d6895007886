//! Loading xargs text for the top-level file and for includes

use crate::errors::XArgsError;
use crate::url::Url;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};

/// Default timeout for remote fetches and reachability checks
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Text of one xargs source and the canonical name it was loaded under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub origin: String,
    pub text: String,
}

/// Reads xargs files referenced by path or URL
pub trait SourceLoader {
    fn load(&self, reference: &str) -> Result<LoadedSource, XArgsError>;
}

/// Loader searching the default directory, then the current directory,
/// then treating the reference as a URL.
#[derive(Debug, Clone)]
pub struct FsSourceLoader {
    default_dir: PathBuf,
    timeout: Duration,
}

impl FsSourceLoader {
    pub fn new(default_dir: impl Into<PathBuf>) -> Self {
        FsSourceLoader {
            default_dir: absolute(&default_dir.into()),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn default_dir(&self) -> &Path {
        &self.default_dir
    }

    fn fetch(&self, url: &Url) -> Result<LoadedSource, XArgsError> {
        let url_text = url.to_string();
        let remote = |message: String| XArgsError::Remote {
            url: url_text.clone(),
            message,
        };

        debug!("Fetching xargs from {}", url_text);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| remote(e.to_string()))?;
        let response = client
            .get(&url_text)
            .send()
            .map_err(|e| remote(e.to_string()))?;
        if !response.status().is_success() {
            return Err(remote(format!("HTTP {}", response.status())));
        }
        let text = response.text().map_err(|e| remote(e.to_string()))?;

        Ok(LoadedSource {
            origin: url_text.clone(),
            text,
        })
    }
}

impl SourceLoader for FsSourceLoader {
    fn load(&self, reference: &str) -> Result<LoadedSource, XArgsError> {
        let in_default_dir = self.default_dir.join(reference);
        if in_default_dir.is_file() {
            trace!("Found {} in default directory", reference);
            return read_file(&in_default_dir);
        }

        let as_given = Path::new(reference);
        if as_given.is_file() {
            trace!("Found {} relative to current directory", reference);
            return read_file(&absolute(as_given));
        }

        match Url::parse(reference) {
            Some(url) if url.is_file() => {
                let path = Path::new(url.path());
                if path.is_file() {
                    read_file(&absolute(path))
                } else {
                    Err(XArgsError::FileNotFound(reference.to_string()))
                }
            }
            Some(url) if url.is_http() => self.fetch(&url),
            _ => Err(XArgsError::FileNotFound(reference.to_string())),
        }
    }
}

fn read_file(path: &Path) -> Result<LoadedSource, XArgsError> {
    let origin = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| XArgsError::Io {
        path: origin.clone(),
        source,
    })?;
    Ok(LoadedSource { origin, text })
}

/// Anchor a relative path at the current directory
pub(crate) fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_once;
    use tempfile::TempDir;

    #[test]
    fn test_loads_from_default_dir() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        if fs::write(dir.path().join("init.xargs"), "-init\n").is_err() {
            return;
        }

        let loader = FsSourceLoader::new(dir.path());
        let loaded = loader.load("init.xargs");
        assert!(loaded.is_ok_and(|s| s.text == "-init\n" && s.origin.ends_with("init.xargs")));
    }

    #[test]
    fn test_loads_file_url() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let path = dir.path().join("remote.xargs");
        if fs::write(&path, "-Dx=1\n").is_err() {
            return;
        }

        let loader = FsSourceLoader::new(dir.path().join("elsewhere"));
        let reference = Url::from_file_path(&path).to_string();
        assert!(loader.load(&reference).is_ok_and(|s| s.text == "-Dx=1\n"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let loader = FsSourceLoader::new(dir.path());
        assert!(matches!(
            loader.load("missing.xargs"),
            Err(XArgsError::FileNotFound(_))
        ));
        assert!(matches!(
            loader.load("jar:file:/x.jar!/init.xargs"),
            Err(XArgsError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_fetches_remote_include() {
        let Some(base) = serve_once("200 OK", "-Dremote=1\n") else {
            return;
        };
        let loader = FsSourceLoader::new(".");
        let reference = format!("{}/x.xargs", base);
        let loaded = loader.load(&reference);
        assert!(loaded.is_ok_and(|s| s.text == "-Dremote=1\n" && s.origin == reference));
    }

    #[test]
    fn test_remote_error_status_is_reported() {
        let Some(base) = serve_once("404 Not Found", "") else {
            return;
        };
        let loader = FsSourceLoader::new(".");
        let result = loader.load(&format!("{}/x.xargs", base));
        assert!(matches!(
            result,
            Err(XArgsError::Remote { ref message, .. }) if message.contains("404")
        ));
    }
}
