//! Redirect chain resolution.
//!
//! Follows hops from an input URL until no rule matches, an external URL is
//! reached, a URL repeats, or the hop ceiling is hit. Loops and missing
//! destinations are fields of [`TraceResult`], never errors.

use rustc_hash::FxHashSet;
use serde::Serialize;

use super::directory::Directory;
use super::rule::RuleSet;
use crate::utils::path::route::{is_http, strip_fragment, with_base_path};

/// Hard ceiling on recorded hops.
pub const MAX_HOPS: usize = 50;

/// One recorded hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectStep {
    /// 1-based position in the chain.
    pub step_index: usize,
    pub from: String,
    pub to: String,
    pub permanent: bool,
    pub matched_rule: String,
}

/// Complete outcome of tracing one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceResult {
    pub input_url: String,
    pub steps: Vec<RedirectStep>,
    pub final_destination: String,
    pub is_loop: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_detected_at: Option<usize>,
    pub destination_exists: bool,
}

impl TraceResult {
    /// No loop and the destination exists.
    #[inline]
    pub fn is_clean(&self) -> bool {
        !self.is_loop && self.destination_exists
    }

    /// Final destination is an absolute HTTP(S) URL.
    #[inline]
    pub fn is_external(&self) -> bool {
        is_http(&self.final_destination)
    }
}

/// Drives the matcher across a chain of redirects.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    rules: &'a RuleSet,
    directory: &'a Directory,
    base_path: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(rules: &'a RuleSet, directory: &'a Directory, base_path: &'a str) -> Self {
        Self {
            rules,
            directory,
            base_path,
        }
    }

    /// Normalize a caller-supplied URL: trim, drop the fragment, add the base path.
    pub fn normalize(&self, url: &str) -> String {
        with_base_path(strip_fragment(url.trim()), self.base_path)
    }

    /// Trace `url` through the rule set.
    pub fn trace(&self, url: &str) -> TraceResult {
        let input_url = self.normalize(url);
        let mut visited = FxHashSet::default();
        let mut steps = Vec::new();
        let mut step = 1;
        let mut current = input_url.clone();
        let mut loop_detected_at = None;

        loop {
            if visited.contains(&current) {
                loop_detected_at = Some(step);
                break;
            }
            visited.insert(current.clone());

            let Some(found) = self.rules.find(&current) else {
                break;
            };

            let record = |from: &str, to: &str| RedirectStep {
                step_index: step,
                from: from.to_string(),
                to: to.to_string(),
                permanent: found.permanent(),
                matched_rule: found.matched_rule.to_string(),
            };

            if is_http(&found.destination) {
                steps.push(record(&current, &found.destination));
                current = found.destination;
                break;
            }

            if visited.contains(&found.destination) {
                loop_detected_at = Some(step);
                break;
            }

            steps.push(record(&current, &found.destination));
            current = found.destination;
            step += 1;

            if step > MAX_HOPS {
                loop_detected_at = Some(step);
                break;
            }
        }

        let is_loop = loop_detected_at.is_some();
        let destination_exists = if is_http(&current) {
            true
        } else {
            !is_loop && self.directory.contains(&current)
        };

        TraceResult {
            input_url,
            steps,
            final_destination: current,
            is_loop,
            loop_detected_at,
            destination_exists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::RedirectRule;

    fn rule(source: &str, destination: &str, permanent: bool) -> RedirectRule {
        RedirectRule::new(source, destination, permanent)
    }

    #[test]
    fn test_no_match_returns_input() {
        let rules = RuleSet::default();
        let directory = Directory::from_urls(["/docs/a"], "/docs");
        let result = Resolver::new(&rules, &directory, "/docs").trace("/docs/a");

        assert!(result.steps.is_empty());
        assert_eq!(result.final_destination, result.input_url);
        assert!(!result.is_loop);
        assert!(result.destination_exists);
        assert!(result.is_clean());
    }

    #[test]
    fn test_base_path_added_and_fragment_dropped() {
        let rules = RuleSet::from_rules([rule("/docs/a", "/docs/b", true)], []);
        let directory = Directory::from_urls(["/docs/b"], "/docs");
        let result = Resolver::new(&rules, &directory, "/docs").trace("/a#intro");

        assert_eq!(result.input_url, "/docs/a");
        assert_eq!(result.final_destination, "/docs/b");
        assert_eq!(result.steps.len(), 1);
    }

    #[test]
    fn test_catch_all_scenario() {
        let rules = RuleSet::from_rules([], [rule("/docs/old/:path*", "/docs/new/:path*", true)]);
        let directory = Directory::from_urls(["/docs/new/a/b"], "/docs");
        let result = Resolver::new(&rules, &directory, "/docs").trace("/docs/old/a/b");

        assert_eq!(
            result.steps,
            vec![RedirectStep {
                step_index: 1,
                from: "/docs/old/a/b".into(),
                to: "/docs/new/a/b".into(),
                permanent: true,
                matched_rule: "/docs/old/:path*".into(),
            }]
        );
        assert!(result.is_clean());
    }

    #[test]
    fn test_normalize_prefixes_on_segment_boundary() {
        let rules = RuleSet::default();
        let directory = Directory::default();
        let resolver = Resolver::new(&rules, &directory, "/docs");

        assert_eq!(resolver.normalize(" /docs/a#top "), "/docs/a");
        assert_eq!(resolver.normalize("/users"), "/docs/users");
        assert_eq!(resolver.normalize("/docsearch"), "/docs/docsearch");
    }

    #[test]
    fn test_multi_hop_chain() {
        let rules = RuleSet::from_rules(
            [rule("/docs/a", "/docs/b", true), rule("/docs/b", "/docs/c", false)],
            [],
        );
        let directory = Directory::from_urls(["/docs/c/"], "/docs");
        let result = Resolver::new(&rules, &directory, "/docs").trace("/docs/a");

        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[1].step_index, 2);
        assert!(!result.steps[1].permanent);
        assert_eq!(result.final_destination, "/docs/c");
        assert!(result.destination_exists);
    }

    #[test]
    fn test_two_rule_cycle() {
        let rules = RuleSet::from_rules(
            [rule("/docs/x", "/docs/y", true), rule("/docs/y", "/docs/x", true)],
            [],
        );
        let directory = Directory::from_urls(["/docs/x", "/docs/y"], "/docs");
        let result = Resolver::new(&rules, &directory, "/docs").trace("/docs/x");

        assert!(result.is_loop);
        assert_eq!(result.loop_detected_at, Some(2));
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].from, "/docs/x");
        assert_eq!(result.steps[0].to, "/docs/y");
        assert!(!result.destination_exists);
    }

    #[test]
    fn test_self_redirect_is_loop() {
        let rules = RuleSet::from_rules([rule("/docs/x", "/docs/x", true)], []);
        let directory = Directory::from_urls(["/docs/x"], "/docs");
        let result = Resolver::new(&rules, &directory, "/docs").trace("/docs/x");

        assert!(result.is_loop);
        assert_eq!(result.loop_detected_at, Some(1));
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_hop_ceiling() {
        let chain = (0..=MAX_HOPS).map(|i| rule(&format!("/docs/p{i}"), &format!("/docs/p{}", i + 1), true));
        let rules = RuleSet::from_rules(chain, []);
        let all: Vec<String> = (0..=MAX_HOPS + 1).map(|i| format!("/docs/p{i}")).collect();
        let directory = Directory::from_urls(&all, "/docs");
        let result = Resolver::new(&rules, &directory, "/docs").trace("/docs/p0");

        assert!(result.is_loop);
        assert_eq!(result.loop_detected_at, Some(MAX_HOPS + 1));
        assert_eq!(result.steps.len(), MAX_HOPS);
        // Every recorded hop is distinct, so the ceiling fired, not the visited set
        let targets: FxHashSet<_> = result.steps.iter().map(|s| s.to.as_str()).collect();
        assert_eq!(targets.len(), MAX_HOPS);
        assert!(!result.destination_exists);
    }

    #[test]
    fn test_external_destination_stops() {
        let rules = RuleSet::from_rules(
            [rule("/docs/blog", "https://example.com/blog", false)],
            // Would loop back if followed
            [rule("https://example.com/:path*", "/docs/blog", false)],
        );
        let directory = Directory::default();
        let result = Resolver::new(&rules, &directory, "/docs").trace("/docs/blog");

        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.final_destination, "https://example.com/blog");
        assert!(result.is_external());
        assert!(result.destination_exists);
        assert!(!result.is_loop);
    }

    #[test]
    fn test_missing_destination() {
        let rules = RuleSet::from_rules([rule("/docs/a", "/docs/gone", true)], []);
        let directory = Directory::from_urls(["/docs/a"], "/docs");
        let result = Resolver::new(&rules, &directory, "/docs").trace("/docs/a");

        assert!(!result.is_loop);
        assert!(!result.destination_exists);
        assert!(!result.is_clean());
    }

    #[test]
    fn test_serialize_camel_case() {
        let rules = RuleSet::default();
        let directory = Directory::default();
        let result = Resolver::new(&rules, &directory, "/docs").trace("/docs/a");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["inputUrl"], "/docs/a");
        assert_eq!(json["finalDestination"], "/docs/a");
        assert_eq!(json["destinationExists"], false);
        assert!(json.get("loopDetectedAt").is_none());
    }
}
