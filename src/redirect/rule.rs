//! Redirect rules and the loaded rule set.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::jsonc::strip_jsonc;
use super::pattern::RoutePattern;
use crate::core::{LoadError, read_json};

/// One configured redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    /// Exact path or pattern (`/docs/old/:path*`).
    pub source: String,
    /// Target path or absolute URL, may contain `:name` placeholders.
    pub destination: String,
    /// Permanent (308) or temporary (307). Reporting only.
    #[serde(default)]
    pub permanent: bool,
}

impl RedirectRule {
    pub fn new(source: impl Into<String>, destination: impl Into<String>, permanent: bool) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            permanent,
        }
    }
}

/// A dynamic rule with its source pattern resolved at load time.
#[derive(Debug, Clone)]
pub struct DynamicRule {
    pub rule: RedirectRule,
    pub pattern: RoutePattern,
}

impl From<RedirectRule> for DynamicRule {
    fn from(rule: RedirectRule) -> Self {
        let pattern = RoutePattern::parse(&rule.source);
        Self { rule, pattern }
    }
}

/// A dynamic rule that can never match because its pattern failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDiagnostic {
    /// Position of the rule in the dynamic list.
    pub index: usize,
    pub source: String,
    pub reason: String,
}

/// Immutable set of static and dynamic redirect rules.
///
/// Dynamic rules keep their configured order: the first match wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    static_rules: FxHashMap<String, RedirectRule>,
    dynamic_rules: Vec<DynamicRule>,
}

impl RuleSet {
    pub fn new(
        static_rules: FxHashMap<String, RedirectRule>,
        dynamic_rules: impl IntoIterator<Item = RedirectRule>,
    ) -> Self {
        Self {
            static_rules,
            dynamic_rules: dynamic_rules.into_iter().map(DynamicRule::from).collect(),
        }
    }

    /// Build a rule set from plain lists (static rules keyed by their source).
    #[cfg(test)]
    pub fn from_rules(
        static_rules: impl IntoIterator<Item = RedirectRule>,
        dynamic_rules: impl IntoIterator<Item = RedirectRule>,
    ) -> Self {
        let static_rules = static_rules
            .into_iter()
            .map(|rule| (rule.source.clone(), rule))
            .collect();
        Self::new(static_rules, dynamic_rules)
    }

    /// Load both rule files. The two reads run in parallel and both must succeed.
    pub fn load(static_path: &Path, dynamic_path: &Path) -> Result<Self, LoadError> {
        let (static_rules, dynamic_rules) = rayon::join(
            || read_static_rules(static_path),
            || read_dynamic_rules(dynamic_path),
        );
        Ok(Self::new(static_rules?, dynamic_rules?))
    }

    /// Exact-match rule for `source`.
    #[inline]
    pub fn static_rule(&self, source: &str) -> Option<&RedirectRule> {
        self.static_rules.get(source)
    }

    /// All static rules, in unspecified order.
    pub fn static_rules(&self) -> impl Iterator<Item = &RedirectRule> {
        self.static_rules.values()
    }

    /// Dynamic rules in configured order.
    #[inline]
    pub fn dynamic_rules(&self) -> &[DynamicRule] {
        &self.dynamic_rules
    }

    pub fn len(&self) -> usize {
        self.static_rules.len() + self.dynamic_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dynamic rules whose pattern failed to compile.
    pub fn diagnostics(&self) -> Vec<RuleDiagnostic> {
        self.dynamic_rules
            .iter()
            .enumerate()
            .filter_map(|(index, dynamic)| {
                dynamic
                    .pattern
                    .never_matches_reason()
                    .map(|reason| RuleDiagnostic {
                        index,
                        source: dynamic.rule.source.clone(),
                        reason: reason.to_string(),
                    })
            })
            .collect()
    }
}

/// Read the static table: `{ "<source>": { source, destination, permanent } }`.
pub fn read_static_rules(path: &Path) -> Result<FxHashMap<String, RedirectRule>, LoadError> {
    read_json(path, str::to_owned)
}

/// Read the dynamic list (JSON with comments), preserving order.
pub fn read_dynamic_rules(path: &Path) -> Result<Vec<RedirectRule>, LoadError> {
    read_json(path, strip_jsonc)
}
