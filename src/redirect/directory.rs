//! Set of published URLs that a redirect may land on.

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::core::{LoadError, read_json};
use crate::utils::path::route::strip_fragment;

/// One entry of the site directory file.
#[derive(Debug, Clone, Deserialize)]
struct DirectoryEntry {
    /// Source file of the page (unused here).
    #[serde(default)]
    #[allow(dead_code)]
    path: String,
    url: String,
}

/// Known-valid URLs, expanded to both trailing-slash forms.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    urls: FxHashSet<String>,
}

impl Directory {
    /// Build from raw URLs.
    ///
    /// Each URL is accepted with and without a trailing slash. The root `/`
    /// is never stripped and the bare `base_path` never gains a slash.
    pub fn from_urls<I, S>(urls: I, base_path: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut expanded = FxHashSet::default();
        for url in urls {
            let url = url.as_ref();
            expanded.insert(url.to_string());

            if url == "/" {
                continue;
            }
            if let Some(stripped) = url.strip_suffix('/') {
                expanded.insert(stripped.to_string());
            } else if url != base_path {
                expanded.insert(format!("{url}/"));
            }
        }
        Self { urls: expanded }
    }

    /// Load the directory file: `[{ "path": ..., "url": ... }]`.
    pub fn load(path: &Path, base_path: &str) -> Result<Self, LoadError> {
        let entries: Vec<DirectoryEntry> = read_json(path, str::to_owned)?;
        Ok(Self::from_urls(entries.into_iter().map(|e| e.url), base_path))
    }

    /// Check if `url` (fragment ignored) is published.
    #[inline]
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(strip_fragment(url))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
