//! Link validation command.

mod report;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use parking_lot::RwLock;
use rayon::prelude::*;

use super::common::collect_documents;
use crate::cli::LinksArgs;
use crate::config::{Config, LinkLevel};
use crate::links::{DocManifest, LinkValidator, check_document, ignore_prefixes};
use crate::logger::ProgressLine;
use crate::mdast::Node;
use crate::utils::plural_count;
use crate::{debug, log};

use report::LinkReport;

/// Check every selected document against the manifest.
pub fn run_links(args: &LinksArgs, config: &Config) -> Result<()> {
    let settings = &config.links;
    let files = collect_documents(&args.paths, &settings.content, |path| {
        settings.is_document(path)
    })?;

    if files.is_empty() {
        log!("links"; "no documents found");
        return Ok(());
    }

    let manifest =
        DocManifest::load(&settings.manifest).context("failed to load documentation manifest")?;
    debug!("links"; "manifest lists {}", plural_count(manifest.len(), "page"));
    if manifest.is_empty() {
        log!("warning"; "manifest `{}` lists no pages", settings.manifest.display());
    }

    let base_path = config.base_path();
    let validator = LinkValidator::new(&manifest, base_path, ignore_prefixes(settings.ignore.clone()))
        .check_fragments(settings.fragments);

    if let Some(dir) = &args.emit_ast {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create `{}`", dir.display()))?;
    }

    log!("links"; "checking {}", plural_count(files.len(), "file"));

    let report = RwLock::new(LinkReport::default());
    let progress = ProgressLine::new("links", &[("files", files.len())]);

    files.par_iter().try_for_each(|file| -> Result<()> {
        let source = fs::read_to_string(file)
            .with_context(|| format!("failed to read `{}`", file.display()))?;
        let document = check_document(&source, &validator, base_path);
        let relative = config.root_relative(file);

        if let Some(dir) = &args.emit_ast {
            write_tree(&ast_output_path(dir, &relative), &document.tree)?;
        }

        report.write().add(
            relative.to_string_lossy().into_owned(),
            document.diagnostics,
            &document.link_counts,
        );
        progress.inc("files");
        Ok(())
    })?;

    progress.finish();

    let report = report.into_inner();
    report.print();
    log!(
        "links";
        "checked {} in {}",
        plural_count(report.docs_links(), "docs link"),
        plural_count(report.checked, "file")
    );

    finish(&report, settings.level)
}

fn finish(report: &LinkReport, level: LinkLevel) -> Result<()> {
    if report.error_count() == 0 {
        log!("links"; "{}", report);
        return Ok(());
    }
    match level {
        LinkLevel::Error => bail!(
            "{} with broken links",
            plural_count(report.file_count(), "file")
        ),
        LinkLevel::Warn => {
            log!("warning"; "{}", report);
            Ok(())
        }
    }
}

/// `<dir>/<relative>.json`; paths outside the project keep only their file name.
fn ast_output_path(dir: &Path, relative: &Path) -> PathBuf {
    let relative = if relative.is_absolute() {
        relative.file_name().map(PathBuf::from).unwrap_or_default()
    } else {
        relative.to_path_buf()
    };
    let mut name = relative.into_os_string();
    name.push(".json");
    dir.join(name)
}

fn write_tree(path: &Path, tree: &Node) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(tree)?;
    fs::write(path, json).with_context(|| format!("failed to write `{}`", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::{Diagnostic, DiagnosticCode};
    use rustc_hash::FxHashMap;

    #[test]
    fn test_ast_output_path() {
        let dir = Path::new("/out");
        assert_eq!(
            ast_output_path(dir, Path::new("docs/guides/setup.mdx")),
            PathBuf::from("/out/docs/guides/setup.mdx.json")
        );
        assert_eq!(
            ast_output_path(dir, Path::new("/elsewhere/a.md")),
            PathBuf::from("/out/a.md.json")
        );
    }

    #[test]
    fn test_write_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/a.mdx.json");
        write_tree(&path, &crate::mdast::parse("[a](/docs/a)")).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["type"], "root");
    }

    #[test]
    fn test_finish_respects_level() {
        let mut report = LinkReport::default();
        assert!(finish(&report, LinkLevel::Error).is_ok());

        report.add(
            "a.mdx".into(),
            vec![Diagnostic {
                code: DiagnosticCode::DocNotFound,
                url: "/docs/x".into(),
                fragment: None,
                position: None,
            }],
            &FxHashMap::default(),
        );
        assert!(finish(&report, LinkLevel::Error).is_err());
        assert!(finish(&report, LinkLevel::Warn).is_ok());
        // Broken links only warn unless `level = "error"` is configured
        assert!(finish(&report, LinkLevel::default()).is_ok());
    }
}
