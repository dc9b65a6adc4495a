//! Documentation manifest: the published pages a link may point to.

use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use crate::core::{LoadError, read_json};
use crate::utils::path::route::trim_trailing_slash;

/// One published documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    /// Canonical page path (`/docs/guides/setup`).
    pub url: String,
    /// Anchor ids of the page headings.
    #[serde(default)]
    pub headings_hashes: FxHashSet<String>,
    /// SDKs the page is scoped to; `None` means platform-agnostic.
    #[serde(default)]
    pub sdk: Option<Vec<String>>,
}

impl DocumentEntry {
    #[cfg(test)]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headings_hashes: FxHashSet::default(),
            sdk: None,
        }
    }

    #[cfg(test)]
    pub fn with_headings<I, S>(mut self, hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headings_hashes = hashes.into_iter().map(Into::into).collect();
        self
    }

    #[cfg(test)]
    pub fn with_sdk<I, S>(mut self, sdks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sdk = Some(sdks.into_iter().map(Into::into).collect());
        self
    }

    #[inline]
    pub fn has_heading(&self, hash: &str) -> bool {
        self.headings_hashes.contains(hash)
    }
}

/// Read-only lookup of pages by canonical path.
#[derive(Debug, Clone, Default)]
pub struct DocManifest {
    docs: FxHashMap<String, DocumentEntry>,
}

impl DocManifest {
    pub fn from_entries(entries: impl IntoIterator<Item = DocumentEntry>) -> Self {
        let docs = entries
            .into_iter()
            .map(|entry| (trim_trailing_slash(&entry.url).to_string(), entry))
            .collect();
        Self { docs }
    }

    /// Load the manifest file: a JSON array of entries.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let entries: Vec<DocumentEntry> = read_json(path, str::to_owned)?;
        Ok(Self::from_entries(entries))
    }

    /// Page for `url` (no fragment). A trailing slash is ignored.
    #[inline]
    pub fn get(&self, url: &str) -> Option<&DocumentEntry> {
        self.docs.get(trim_trailing_slash(url))
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_trailing_slash() {
        let manifest = DocManifest::from_entries([DocumentEntry::new("/docs/a/")]);
        assert!(manifest.get("/docs/a").is_some());
        assert!(manifest.get("/docs/a/").is_some());
        assert!(manifest.get("/docs/b").is_none());
    }

    #[test]
    fn test_load_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(
            &path,
            r#"[
                {"url": "/docs/quickstart", "headingsHashes": ["install", "run"]},
                {"url": "/docs/hooks/use-auth", "headingsHashes": [], "sdk": ["react", "nextjs"]},
                {"url": "/docs"}
            ]"#,
        )
        .unwrap();

        let manifest = DocManifest::load(&path).unwrap();
        assert_eq!(manifest.len(), 3);

        let quickstart = manifest.get("/docs/quickstart").unwrap();
        assert!(quickstart.has_heading("install"));
        assert!(!quickstart.has_heading("deploy"));
        assert_eq!(quickstart.sdk, None);

        let hook = manifest.get("/docs/hooks/use-auth").unwrap();
        assert_eq!(hook.sdk.as_deref(), Some(&["react".to_string(), "nextjs".to_string()][..]));
        assert!(manifest.get("/docs").unwrap().headings_hashes.is_empty());
    }
}
