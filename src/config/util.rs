//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find the config file by searching upward from `start`.
///
/// An absolute `config_name` is returned as-is when it exists.
///
/// ```text
/// /home/user/site/docs/guides/   ← start
/// /home/user/site/docroute.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs/guides");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("docroute.toml"), "").unwrap();

        let found = find_config_file(Path::new("docroute.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("docroute.toml"));
    }

    #[test]
    fn test_find_config_nearest_wins() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("docroute.toml"), "").unwrap();
        fs::write(nested.join("docroute.toml"), "").unwrap();

        let found = find_config_file(Path::new("docroute.toml"), &nested).unwrap();
        assert_eq!(found, nested.join("docroute.toml"));
    }

    #[test]
    fn test_find_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file(Path::new("no-such-config.toml"), dir.path()).is_none());
        assert!(find_config_file(&dir.path().join("absent.toml"), dir.path()).is_none());
    }
}
