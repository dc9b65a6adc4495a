//! Redirect rule matching.
//!
//! Dynamic rules are tried first, in configured order; the static table is
//! the fallback. Matching is pure over the immutable [`RuleSet`].

use serde::Serialize;

use super::pattern::Capture;
use super::rule::{RedirectRule, RuleSet};

/// Outcome of matching one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult<'a> {
    /// Destination with placeholders filled in.
    pub destination: String,
    /// Source pattern of the rule that matched.
    pub matched_rule: &'a str,
    /// The rule itself.
    #[serde(skip)]
    pub rule: &'a RedirectRule,
}

impl MatchResult<'_> {
    #[inline]
    pub fn permanent(&self) -> bool {
        self.rule.permanent
    }
}

impl RuleSet {
    /// Find the redirect for `url` (a path without fragment).
    pub fn find(&self, url: &str) -> Option<MatchResult<'_>> {
        let dynamic = self.dynamic_rules().iter().find_map(|dynamic| {
            let captures = dynamic.pattern.captures(url)?;
            Some(MatchResult {
                destination: fill_destination(&dynamic.rule.destination, &captures),
                matched_rule: &dynamic.rule.source,
                rule: &dynamic.rule,
            })
        });

        dynamic.or_else(|| {
            self.static_rule(url).map(|rule| MatchResult {
                destination: rule.destination.clone(),
                matched_rule: &rule.source,
                rule,
            })
        })
    }
}

/// Substitute every capture into a destination template.
pub fn fill_destination(template: &str, captures: &[Capture]) -> String {
    captures.iter().fold(template.to_string(), |acc, capture| {
        let catch_all = format!(":{}*", capture.name);
        let bare = format!(":{}", capture.name);
        let acc = replace_token(&acc, &catch_all, &capture.value);
        replace_token(&acc, &bare, &capture.value)
    })
}

/// Replace `token` with `value` where it ends on an identifier boundary.
///
/// An empty value for a catch-all also drops the `/` in front of it, so
/// `/docs/new/:path*` becomes `/docs/new` rather than `/docs/new/`.
fn replace_token(template: &str, token: &str, value: &str) -> String {
    let catch_all = token.ends_with('*');
    let mut out = String::with_capacity(template.len() + value.len());
    let mut rest = template;

    while let Some(pos) = rest.find(token) {
        let after = &rest[pos + token.len()..];
        let at_boundary = catch_all
            || after
                .chars()
                .next()
                .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'));

        if at_boundary {
            let head = &rest[..pos];
            let head = match head.strip_suffix('/') {
                Some(trimmed) if catch_all && value.is_empty() && !trimmed.is_empty() => trimmed,
                _ => head,
            };
            out.push_str(head);
            out.push_str(value);
        } else {
            out.push_str(&rest[..pos + token.len()]);
        }
        rest = after;
    }

    out.push_str(rest);
    out
}
