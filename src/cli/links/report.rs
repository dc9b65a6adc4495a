//! Link report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::Style;
use rustc_hash::FxHashMap;

use crate::links::{Diagnostic, DiagnosticCode};
use crate::logger::Paint;
use crate::utils::plural_s;

/// Diagnostics of a whole run, grouped by source file.
#[derive(Debug, Default)]
pub struct LinkReport {
    pub files: BTreeMap<String, Vec<Diagnostic>>,
    /// Documents checked, with or without findings.
    pub checked: usize,
    /// Links seen, by kind label.
    pub link_counts: FxHashMap<&'static str, usize>,
}

impl LinkReport {
    /// Record the outcome of one document.
    pub fn add(
        &mut self,
        source: String,
        diagnostics: Vec<Diagnostic>,
        link_counts: &FxHashMap<&'static str, usize>,
    ) {
        self.checked += 1;
        for (kind, count) in link_counts {
            *self.link_counts.entry(*kind).or_default() += count;
        }
        if !diagnostics.is_empty() {
            self.files.entry(source).or_default().extend(diagnostics);
        }
    }

    /// Count of files with at least one diagnostic.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn error_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn count_code(&self, code: DiagnosticCode) -> usize {
        self.files
            .values()
            .flatten()
            .filter(|d| d.code == code)
            .count()
    }

    /// Links seen under the docs base path.
    pub fn docs_links(&self) -> usize {
        self.link_counts.get("docs").copied().unwrap_or_default()
    }

    /// Print every diagnostic to stderr, grouped by file.
    pub fn print(&self) {
        if self.files.is_empty() {
            return;
        }
        eprintln!();
        eprint!("{}", self.render());
    }

    fn render(&self) -> String {
        let mut out = String::new();
        let file_count = self.file_count();
        let error_count = self.error_count();
        let dim = Style::new().dimmed();
        let red = Style::new().red();

        out.push_str(&format!(
            "{} {}\n",
            "links".paint(red.bold()),
            format!(
                "({file_count} file{}, {error_count} problem{})",
                plural_s(file_count),
                plural_s(error_count)
            )
            .paint(dim)
        ));

        for (path, diagnostics) in &self.files {
            out.push_str(&format!(
                "{}{}{}\n",
                "[".paint(dim),
                path.paint(Style::new().cyan()),
                "]".paint(dim)
            ));
            for d in diagnostics {
                let location = d.position.map(|p| format!("{p} ")).unwrap_or_default();
                out.push_str(&format!(
                    "{} {}{} {}\n",
                    "→".paint(red),
                    location.paint(dim),
                    d.message(),
                    format!("({})", d.code).paint(dim)
                ));
            }
        }
        out
    }
}

impl fmt::Display for LinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.error_count();
        if total == 0 {
            write!(f, "{}", "all links valid".paint(Style::new().green()))
        } else {
            let docs = self.count_code(DiagnosticCode::DocNotFound);
            let hashes = self.count_code(DiagnosticCode::HashNotFound);
            let dim = Style::new().dimmed();
            write!(
                f,
                "{} {} {}",
                "found".paint(dim),
                format!("{docs} broken link{}", plural_s(docs)).paint(Style::new().red().bold()),
                format!("and {hashes} broken anchor{}", plural_s(hashes)).paint(dim)
            )
        }
    }
}
