//! Request target to filesystem path resolution
//!
//! A target is first normalised as a URL path (query and fragment dropped,
//! dot segments collapsed, percent-escapes decoded), then joined onto the
//! document root. Directory targets get the index file appended; directory
//! targets without a trailing slash are flagged for a redirect.

use crate::config::StaticFilesConfig;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use url::Url;

/// Outcome of resolving one request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Final candidate file
    pub path: PathBuf,
    /// The target named a directory without a trailing slash
    pub redirect: bool,
    /// `path` is a regular file inside the document root
    pub exists: bool,
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    /// `root` with symlinks resolved; `None` when the root was not accessible
    /// at construction.
    canonical_root: Option<PathBuf>,
    index_file: String,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        let root = root.into();
        let canonical_root = match std::fs::canonicalize(&root) {
            Ok(canonical) => Some(canonical),
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "Document root is not accessible");
                None
            }
        };

        Self {
            root,
            canonical_root,
            index_file: index_file.into(),
        }
    }

    pub fn from_config(cfg: &StaticFilesConfig) -> Self {
        Self::new(cfg.root.clone(), cfg.index_file.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn canonical_root(&self) -> Option<&Path> {
        self.canonical_root.as_deref()
    }

    /// Resolves `target` to a file beneath the document root.
    ///
    /// Never fails: a target that cannot be normalised, escapes the root, or
    /// names nothing on disk comes back with `exists == false`.
    pub async fn resolve(&self, target: &str) -> ResolvedTarget {
        let Some((relative, trailing_slash)) = normalize_target(target) else {
            tracing::debug!(uri = target, "Target could not be normalised");
            return ResolvedTarget {
                path: self.root.clone(),
                redirect: false,
                exists: false,
            };
        };

        let mut candidate = self.root.join(&relative);
        let mut redirect = false;

        if !trailing_slash && !is_file(&candidate).await {
            redirect = is_dir(&candidate).await && self.is_contained(&candidate).await;
        }

        // A target ending in a slash never names a regular file.
        if trailing_slash || !is_file(&candidate).await {
            candidate.push(&self.index_file);
        }

        let exists = is_file(&candidate).await && self.is_contained(&candidate).await;

        ResolvedTarget {
            path: candidate,
            redirect,
            exists,
        }
    }

    /// Whether `path`, once symlinks are followed, still lies under the root.
    async fn is_contained(&self, path: &Path) -> bool {
        let Some(root) = &self.canonical_root else {
            tracing::warn!(root = %self.root.display(), "Document root is not accessible");
            return false;
        };
        let Ok(resolved) = fs::canonicalize(path).await else {
            return false;
        };

        if resolved.starts_with(root) {
            true
        } else {
            tracing::warn!(
                path = %path.display(),
                resolved = %resolved.display(),
                "Path escapes the document root"
            );
            false
        }
    }
}

/// Normalises a request target into a root-relative path plus a flag telling
/// whether the target ended in a slash.
///
/// Returns `None` for targets that cannot be expressed as a local path, or
/// whose decoded form still contains `..` components.
fn normalize_target(target: &str) -> Option<(PathBuf, bool)> {
    let base = Url::parse("file:///").ok()?;
    let url = base.join(target).ok()?;

    let trailing_slash = url.path().ends_with('/');
    let absolute = url.to_file_path().ok()?;

    let mut relative = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::RootDir => {}
            Component::Normal(part) => relative.push(part),
            // A decoded %2F can smuggle these back in.
            _ => return None,
        }
    }

    Some((relative, trailing_slash))
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_query_and_dots() {
        let (path, slash) = normalize_target("/a/./b/../c.html?x=1#top").unwrap();
        assert_eq!(path, PathBuf::from("a/c.html"));
        assert!(!slash);
    }

    #[test]
    fn normalize_keeps_trailing_slash() {
        let (path, slash) = normalize_target("/docs/").unwrap();
        assert_eq!(path, PathBuf::from("docs"));
        assert!(slash);

        let (path, slash) = normalize_target("/").unwrap();
        assert_eq!(path, PathBuf::new());
        assert!(slash);
    }

    #[test]
    fn normalize_cannot_climb_above_root() {
        let (path, _) = normalize_target("/../../etc/passwd").unwrap();
        assert_eq!(path, PathBuf::from("etc/passwd"));
    }

    #[test]
    fn normalize_decodes_escapes() {
        let (path, _) = normalize_target("/my%20page.html").unwrap();
        assert_eq!(path, PathBuf::from("my page.html"));
    }

    #[test]
    fn normalize_rejects_encoded_parent_segments() {
        assert!(normalize_target("/..%2F..%2Fetc/passwd").is_none());
    }
}
