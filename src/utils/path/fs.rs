//! Filesystem path helpers.
//!
//! - `normalize_path`: absolute form of a path (canonicalize with fallback)
//! - `resolve_path`: user-supplied path, tried against cwd then a fallback dir

use std::path::{Path, PathBuf};

/// Absolute form of `path`.
///
/// Uses `canonicalize()` when the path exists. Otherwise a relative path is
/// joined onto the current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a path given on the command line.
///
/// Absolute paths are used as-is. A relative path that exists from the
/// current directory wins; otherwise it is taken relative to `fallback_dir`
/// (the configured content directory).
#[inline]
pub fn resolve_path(path: &Path, fallback_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    if path.exists() {
        return normalize_path(path);
    }
    normalize_path(&fallback_dir.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative_becomes_absolute() {
        let normalized = normalize_path(Path::new("redirects/static/docs.json"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("redirects/static/docs.json"));
    }

    #[test]
    fn test_resolve_path_absolute() {
        let resolved = resolve_path(Path::new("/srv/docs/index.mdx"), Path::new("/fallback"));
        assert_eq!(resolved, PathBuf::from("/srv/docs/index.mdx"));
    }

    #[test]
    fn test_resolve_path_uses_fallback_dir() {
        let resolved = resolve_path(Path::new("guides/missing.mdx"), Path::new("/content"));
        assert_eq!(resolved, PathBuf::from("/content/guides/missing.mdx"));
    }
}
