//! Link diagnostics and where they go.

use std::fmt;

use serde::Serialize;

use crate::mdast::Position;

/// Stable identifier of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    #[serde(rename = "link-doc-not-found")]
    DocNotFound,
    #[serde(rename = "link-hash-not-found")]
    HashNotFound,
}

impl DiagnosticCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DocNotFound => "link-doc-not-found",
            Self::HashNotFound => "link-hash-not-found",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broken link or anchor found while rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    /// Page path the link points to (extension stripped, no fragment).
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Diagnostic {
    /// Human-readable reason.
    pub fn message(&self) -> String {
        match (self.code, &self.fragment) {
            (DiagnosticCode::DocNotFound, _) => format!("doc `{}` not found", self.url),
            (DiagnosticCode::HashNotFound, Some(fragment)) => {
                format!("anchor `#{fragment}` not found on `{}`", self.url)
            }
            (DiagnosticCode::HashNotFound, None) => format!("anchor not found on `{}`", self.url),
        }
    }
}

/// Receives diagnostics as the rewriter produces them.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
