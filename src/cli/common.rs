//! Common utilities shared across CLI commands.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::Result;
use jwalk::WalkDir;

use crate::utils::path::resolve_path;

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect document files from CLI paths.
///
/// No paths means everything under `content_dir`; a single `-` reads paths
/// from stdin. Directories are walked for files accepted by `is_document`.
pub fn collect_documents<F>(paths: &[PathBuf], content_dir: &Path, is_document: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let paths: Vec<PathBuf> = if paths.len() == 1 && paths[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        paths.to_vec()
    };

    if paths.is_empty() {
        let mut files = collect_all_files(content_dir);
        files.retain(|p| is_document(p));
        return Ok(files);
    }

    let mut all_files = Vec::new();
    for path in &paths {
        let resolved = resolve_path(path, content_dir);

        if resolved.is_file() {
            if is_document(&resolved) {
                all_files.push(resolved);
            } else {
                anyhow::bail!("Not a supported document: {}", path.display());
            }
        } else if resolved.is_dir() {
            all_files.extend(
                collect_all_files(&resolved)
                    .into_iter()
                    .filter(|p| is_document(p)),
            );
        } else {
            let content_relative = content_dir.join(path);
            anyhow::bail!(
                "Path not found: {}\n  Tried:\n    - {}\n    - {}",
                path.display(),
                path.display(),
                content_relative.display()
            );
        }
    }

    all_files.sort();
    all_files.dedup();
    Ok(all_files)
}

/// Collect all files from a directory recursively, sorted.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .collect()
}

/// Read file paths from stdin, one per line
pub fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    let stdin = io::stdin();
    let mut paths = Vec::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn is_mdx(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "mdx")
    }

    #[test]
    fn test_collect_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guides")).unwrap();
        fs::write(root.join("index.mdx"), "").unwrap();
        fs::write(root.join("guides/setup.mdx"), "").unwrap();
        fs::write(root.join("guides/notes.txt"), "").unwrap();
        fs::write(root.join(".DS_Store"), "").unwrap();

        let files = collect_documents(&[], root, is_mdx).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| is_mdx(p)));
    }

    #[test]
    fn test_collect_explicit_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guides")).unwrap();
        fs::write(root.join("guides/setup.mdx"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let files = collect_documents(&[PathBuf::from("guides")], root, is_mdx).unwrap();
        assert_eq!(files, vec![root.join("guides/setup.mdx").canonicalize().unwrap()]);

        assert!(collect_documents(&[PathBuf::from("notes.txt")], root, is_mdx).is_err());
        assert!(collect_documents(&[PathBuf::from("missing")], root, is_mdx).is_err());
    }
}
