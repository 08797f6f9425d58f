//! Resource loading: locations, relative resolution, and wildcard expansion.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use globset::GlobBuilder;
use regex::Regex;

use crate::error::{LoaderError, Result};

/// URL-style scheme prefix, e.g. `file:` or `classpath:`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SCHEME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").expect("valid regex"));

/// Classify a location as absolute or relative.
///
/// Absolute means it either carries a URL-style scheme prefix or is an
/// absolute filesystem path. Everything else resolves against the
/// importing document's location.
///
/// # Examples
/// ```
/// use wirecfg::resource::is_absolute_location;
///
/// assert!(is_absolute_location("file:/etc/app/conf.xml"));
/// assert!(is_absolute_location("/etc/app/conf.xml"));
/// assert!(!is_absolute_location("includes/db.xml"));
/// ```
#[must_use]
pub fn is_absolute_location(location: &str) -> bool {
    SCHEME_PATTERN.is_match(location) || Path::new(location).is_absolute()
}

/// Check whether a location contains a wildcard pattern.
#[must_use]
pub fn has_wildcard(location: &str) -> bool {
    location.contains(['*', '?', '['])
}

/// Compose a relative path against a base location string.
///
/// Replaces the final segment of `base` with `relative`. This is the
/// string-level fallback used when direct relative resolution finds no
/// existing resource.
#[must_use]
pub fn apply_relative_path(base: &str, relative: &str) -> String {
    match base.rfind('/') {
        Some(idx) => format!("{}/{}", &base[..idx], relative),
        None => relative.to_string(),
    }
}

/// Collaborator that turns location strings into document content.
///
/// The loader core only depends on this contract; the filesystem
/// implementation below is what the CLI wires in. Tests substitute an
/// in-memory implementation.
pub trait ResourceLoader {
    /// Read the content of a single resource.
    fn load(&self, location: &str) -> Result<String>;

    /// Whether the location resolves to an existing resource.
    fn exists(&self, location: &str) -> bool;

    /// Expand a location into concrete resource locations.
    ///
    /// Wildcard patterns may expand to any number of locations (including
    /// zero); a plain location expands to itself or fails if missing.
    fn expand(&self, location: &str) -> Result<Vec<String>>;

    /// Resolve a relative location against the current resource.
    fn resolve_relative(&self, current: &str, relative: &str) -> String {
        apply_relative_path(current, relative)
    }

    /// Canonical form of a location, used for import-cycle tracking.
    fn canonical(&self, location: &str) -> String {
        location.to_string()
    }
}

/// Filesystem-backed resource loader rooted at a base directory.
pub struct FsResourceLoader {
    base: PathBuf,
}

impl FsResourceLoader {
    /// Create a loader resolving relative locations against `base`.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Create a loader rooted at the current working directory.
    pub fn current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let stripped = location.strip_prefix("file:").unwrap_or(location);
        let path = Path::new(stripped);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }

    /// Expand a wildcard in the final path segment by listing the parent
    /// directory. Patterns deeper in the path are not supported.
    fn expand_pattern(&self, location: &str) -> Result<Vec<String>> {
        let path = self.resolve(location);
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| self.base.clone(), Path::to_path_buf);
        let file_pattern = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| LoaderError::ResourceNotFound {
                location: location.to_string(),
            })?;

        let glob = GlobBuilder::new(&file_pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| LoaderError::InvalidPattern {
                pattern: location.to_string(),
                source,
            })?
            .compile_matcher();

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&parent)? {
            let entry = entry?;
            if entry.file_type()?.is_file() && glob.is_match(entry.file_name().to_string_lossy().as_ref()) {
                matches.push(entry.path().to_string_lossy().to_string());
            }
        }
        matches.sort();
        Ok(matches)
    }
}

impl ResourceLoader for FsResourceLoader {
    fn load(&self, location: &str) -> Result<String> {
        let path = self.resolve(location);
        std::fs::read_to_string(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                LoaderError::ResourceNotFound {
                    location: location.to_string(),
                }
            } else {
                LoaderError::Io(err)
            }
        })
    }

    fn exists(&self, location: &str) -> bool {
        self.resolve(location).is_file()
    }

    fn expand(&self, location: &str) -> Result<Vec<String>> {
        if has_wildcard(location) {
            return self.expand_pattern(location);
        }
        if self.exists(location) {
            Ok(vec![location.to_string()])
        } else {
            Err(LoaderError::ResourceNotFound {
                location: location.to_string(),
            })
        }
    }

    fn canonical(&self, location: &str) -> String {
        let path = self.resolve(location);
        std::fs::canonicalize(&path)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| path.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_absolute_location() {
        assert!(is_absolute_location("file:/conf/app.xml"));
        assert!(is_absolute_location("classpath:conf/app.xml"));
        assert!(is_absolute_location("/conf/app.xml"));
        assert!(!is_absolute_location("conf/app.xml"));
        assert!(!is_absolute_location("app.xml"));
    }

    #[test]
    fn test_has_wildcard() {
        assert!(has_wildcard("conf/*.xml"));
        assert!(has_wildcard("conf/app-?.xml"));
        assert!(!has_wildcard("conf/app.xml"));
    }

    #[test]
    fn test_apply_relative_path() {
        assert_eq!(
            apply_relative_path("conf/app.xml", "db.xml"),
            "conf/db.xml"
        );
        assert_eq!(apply_relative_path("app.xml", "db.xml"), "db.xml");
        assert_eq!(
            apply_relative_path("a/b/app.xml", "sub/db.xml"),
            "a/b/sub/db.xml"
        );
    }

    #[test]
    fn test_fs_loader_load_and_exists() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.xml"), "<definitions/>").unwrap();

        let loader = FsResourceLoader::new(dir.path());
        assert!(loader.exists("app.xml"));
        assert!(!loader.exists("missing.xml"));
        assert_eq!(loader.load("app.xml").unwrap(), "<definitions/>");
    }

    #[test]
    fn test_fs_loader_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsResourceLoader::new(dir.path());

        let err = loader.load("missing.xml").unwrap_err();
        assert!(matches!(err, LoaderError::ResourceNotFound { .. }));
    }

    #[test]
    fn test_fs_loader_expand_plain() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.xml"), "<definitions/>").unwrap();

        let loader = FsResourceLoader::new(dir.path());
        assert_eq!(loader.expand("app.xml").unwrap(), vec!["app.xml"]);
        assert!(loader.expand("missing.xml").is_err());
    }

    #[test]
    fn test_fs_loader_expand_wildcard() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.xml"), "<definitions/>").unwrap();
        fs::write(dir.path().join("b.xml"), "<definitions/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let loader = FsResourceLoader::new(dir.path());
        let expanded = loader.expand("*.xml").unwrap();
        assert_eq!(expanded.len(), 2);
        assert!(expanded[0].ends_with("a.xml"));
        assert!(expanded[1].ends_with("b.xml"));
    }

    #[test]
    fn test_fs_loader_expand_wildcard_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsResourceLoader::new(dir.path());
        assert!(loader.expand("*.xml").unwrap().is_empty());
    }

    #[test]
    fn test_fs_loader_canonical_stable_across_spellings() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/app.xml"), "<definitions/>").unwrap();

        let loader = FsResourceLoader::new(dir.path());
        let direct = loader.canonical("sub/app.xml");
        let dotted = loader.canonical("./sub/app.xml");
        assert_eq!(direct, dotted);
    }
}
