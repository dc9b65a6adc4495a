//! Redirect source patterns.
//!
//! Every dynamic rule's `source` is classified once at load time into a
//! [`RoutePattern`]; matching is then a dispatch over the precomputed variant.
//!
//! | Pattern                       | Variant          |
//! |-------------------------------|------------------|
//! | `/docs/old/:path*`            | `CatchAllPrefix` |
//! | `/docs/:sdk/setup/:rest*`     | `Segments`       |
//! | `/docs/:id(\\d+)`, `/a/:b?`   | `General`        |

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::Regex;

use crate::utils::path::route::trim_trailing_slash;

/// Characters escaped when a captured value is re-encoded for a destination.
///
/// Same unreserved set as JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters that turn a segment into something other than a literal.
const SPECIAL_CHARS: [char; 8] = [':', '*', '(', ')', '?', '+', '{', '}'];

/// A value captured from the matched URL, ready for substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub name: String,
    pub value: String,
}

impl Capture {
    fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// One slash-delimited segment of a positional pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the URL segment exactly.
    Literal(String),
    /// `:name`, captures one URL segment.
    Param(String),
    /// `:name*`, captures every remaining segment. Always last.
    CatchAll(String),
}

/// Outcome of compiling a general pattern.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    Compiled { regex: Regex, names: Vec<String> },
    /// The pattern could not be compiled; it never matches any URL.
    NeverMatches { reason: String },
}

/// Precomputed matcher for a dynamic rule's source.
#[derive(Debug, Clone)]
pub enum RoutePattern {
    /// Literal prefix followed by a trailing catch-all (`/docs/old/:path*`).
    CatchAllPrefix { prefix: String, param: String },
    /// Positional segment match.
    Segments(Vec<Segment>),
    /// Anything else, compiled to a case-insensitive regex.
    General(CompiledPattern),
}

impl RoutePattern {
    /// Classify a rule source.
    pub fn parse(source: &str) -> Self {
        let Some(segments) = parse_segments(source) else {
            return Self::General(compile_general(source));
        };

        match segments.split_last() {
            Some((Segment::CatchAll(param), head))
                if head.iter().all(|s| matches!(s, Segment::Literal(_))) =>
            {
                let prefix = source
                    .rfind(':')
                    .map(|idx| source[..idx].to_string())
                    .unwrap_or_default();
                Self::CatchAllPrefix {
                    prefix,
                    param: param.clone(),
                }
            }
            _ => Self::Segments(segments),
        }
    }

    /// Match `url` and return the captured values, or `None`.
    pub fn captures(&self, url: &str) -> Option<Vec<Capture>> {
        match self {
            Self::CatchAllPrefix { prefix, param } => {
                if let Some(rest) = url.strip_prefix(prefix.as_str()) {
                    Some(vec![Capture::new(param, rest)])
                } else if url == trim_trailing_slash(prefix) {
                    Some(vec![Capture::new(param, "")])
                } else {
                    None
                }
            }
            Self::Segments(segments) => match_segments(segments, url),
            Self::General(compiled) => compiled.captures(url),
        }
    }

    /// Why this pattern can never match, if it failed to compile.
    pub fn never_matches_reason(&self) -> Option<&str> {
        match self {
            Self::General(CompiledPattern::NeverMatches { reason }) => Some(reason),
            _ => None,
        }
    }
}

impl CompiledPattern {
    fn captures(&self, url: &str) -> Option<Vec<Capture>> {
        let Self::Compiled { regex, names } = self else {
            return None;
        };
        let caps = regex.captures(url)?;

        let captured = names
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| {
                let raw = caps.get(idx + 1)?.as_str();
                let decoded = percent_decode_str(raw).decode_utf8_lossy();
                let encoded = utf8_percent_encode(&decoded, COMPONENT).to_string();
                Some(Capture::new(name, encoded))
            })
            .collect();
        Some(captured)
    }
}

// ============================================================================
// Positional segments
// ============================================================================

/// Split a path into segments (leading `/` dropped).
fn split_segments(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

/// Parse a source into positional segments.
///
/// A trailing `/` is dropped, as it is for matched URLs. Returns `None` when
/// any segment needs the general matcher.
fn parse_segments(source: &str) -> Option<Vec<Segment>> {
    let raw = split_segments(trim_trailing_slash(source));
    let last = raw.len() - 1;
    let mut segments = Vec::with_capacity(raw.len());

    for (idx, segment) in raw.into_iter().enumerate() {
        if !segment.contains(SPECIAL_CHARS) {
            segments.push(Segment::Literal(segment.to_string()));
            continue;
        }

        let name = segment.strip_prefix(':')?;
        if let Some(name) = name.strip_suffix('*') {
            if idx != last || !is_ident(name) {
                return None;
            }
            segments.push(Segment::CatchAll(name.to_string()));
        } else if is_ident(name) {
            segments.push(Segment::Param(name.to_string()));
        } else {
            return None;
        }
    }

    Some(segments)
}

fn match_segments(segments: &[Segment], url: &str) -> Option<Vec<Capture>> {
    let parts = split_segments(trim_trailing_slash(url));
    let mut captured = Vec::new();

    for (idx, segment) in segments.iter().enumerate() {
        match segment {
            Segment::CatchAll(name) => {
                let rest = parts.get(idx..).map(|p| p.join("/")).unwrap_or_default();
                captured.push(Capture::new(name, rest));
                return Some(captured);
            }
            Segment::Literal(literal) => {
                if parts.get(idx)? != literal {
                    return None;
                }
            }
            Segment::Param(name) => captured.push(Capture::new(name, *parts.get(idx)?)),
        }
    }

    // Without a catch-all the URL must not have extra segments
    (parts.len() == segments.len()).then_some(captured)
}

// ============================================================================
// General patterns
// ============================================================================

enum Token {
    Literal(String),
    Param {
        name: String,
        pattern: String,
        optional: bool,
    },
}

/// Compile a general pattern, failing closed.
fn compile_general(source: &str) -> CompiledPattern {
    let compiled = tokenize(source).and_then(|tokens| {
        let names = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Param { name, .. } => Some(name.clone()),
                Token::Literal(_) => None,
            })
            .collect();
        let regex = Regex::new(&to_regex(&tokens)).map_err(|err| err.to_string())?;
        Ok((regex, names))
    });

    match compiled {
        Ok((regex, names)) => CompiledPattern::Compiled { regex, names },
        Err(reason) => CompiledPattern::NeverMatches { reason },
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut unnamed = 0usize;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        let name = match c {
            '\\' => {
                literal.extend(chars.next());
                continue;
            }
            ':' => {
                let mut name = String::new();
                while let Some(&next) = chars.peek().filter(|c| is_ident_char(**c)) {
                    name.push(next);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(format!("missing parameter name at `:` in `{source}`"));
                }
                name
            }
            '(' => {
                let name = unnamed.to_string();
                unnamed += 1;
                name
            }
            '*' | '+' | '?' | '{' | '}' | ')' => {
                return Err(format!("unexpected `{c}` in `{source}`"));
            }
            _ => {
                literal.push(c);
                continue;
            }
        };

        // `(` opens a custom group for both `:name(...)` and unnamed groups
        let pattern = if c == '(' || chars.peek() == Some(&'(') {
            if c != '(' {
                chars.next();
            }
            read_group(&mut chars, source)?
        } else {
            "[^/#?]+?".to_string()
        };

        let optional = match chars.peek() {
            Some('?') => {
                chars.next();
                true
            }
            Some(m @ ('*' | '+')) => {
                return Err(format!(
                    "repeating parameter `{name}{m}` is not supported in `{source}`"
                ));
            }
            _ => false,
        };

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(Token::Param {
            name,
            pattern,
            optional,
        });
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

/// Read a balanced `( ... )` group; the opening paren is already consumed.
///
/// Nested groups must be non-capturing (`(?:...)`), since captures are read
/// back by position.
fn read_group(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    source: &str,
) -> Result<String, String> {
    let mut depth = 1usize;
    let mut group = String::new();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                group.push(c);
                group.extend(chars.next());
            }
            '(' => {
                let ahead: String = chars.clone().take(3).collect();
                let capturing = !ahead.starts_with('?')
                    || ahead.starts_with("?P<")
                    || ahead.starts_with("?<");
                if capturing {
                    return Err(format!("capturing group inside parameter in `{source}`"));
                }
                depth += 1;
                group.push(c);
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if group.is_empty() {
                        return Err(format!("empty group in `{source}`"));
                    }
                    return Ok(group);
                }
                group.push(c);
            }
            _ => group.push(c),
        }
    }

    Err(format!("unbalanced `(` in `{source}`"))
}

fn to_regex(tokens: &[Token]) -> String {
    let mut body = String::from("(?i)^");

    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::Literal(text) => {
                // An optional param swallows the slash in front of it
                let next_optional = matches!(
                    tokens.get(idx + 1),
                    Some(Token::Param { optional: true, .. })
                );
                let text = if next_optional {
                    text.strip_suffix('/').unwrap_or(text)
                } else {
                    text
                };
                body.push_str(&regex::escape(text));
            }
            Token::Param {
                pattern, optional, ..
            } => {
                let prev_slash = idx > 0
                    && matches!(&tokens[idx - 1], Token::Literal(t) if t.ends_with('/'));
                if *optional && prev_slash {
                    body.push_str(&format!("(?:/({pattern}))?"));
                } else if *optional {
                    body.push_str(&format!("({pattern})?"));
                } else {
                    body.push_str(&format!("({pattern})"));
                }
            }
        }
    }

    body.push_str("/?$");
    body
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_ident(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_ident_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pattern: &RoutePattern, url: &str) -> Option<Vec<(String, String)>> {
        pattern
            .captures(url)
            .map(|caps| caps.into_iter().map(|c| (c.name, c.value)).collect())
    }

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_classify_catch_all_prefix() {
        let pattern = RoutePattern::parse("/docs/old/:path*");
        assert!(matches!(
            &pattern,
            RoutePattern::CatchAllPrefix { prefix, param }
                if prefix == "/docs/old/" && param == "path"
        ));
    }

    #[test]
    fn test_classify_segments() {
        let pattern = RoutePattern::parse("/docs/:sdk/setup/:rest*");
        let RoutePattern::Segments(segments) = pattern else {
            panic!("expected segments");
        };
        assert_eq!(
            segments,
            vec![
                Segment::Literal("docs".into()),
                Segment::Param("sdk".into()),
                Segment::Literal("setup".into()),
                Segment::CatchAll("rest".into()),
            ]
        );
    }

    #[test]
    fn test_classify_general() {
        assert!(matches!(
            RoutePattern::parse("/docs/:id(\\d+)"),
            RoutePattern::General(CompiledPattern::Compiled { .. })
        ));
        // Catch-all in the middle is not positional
        assert!(matches!(
            RoutePattern::parse("/docs/:rest*/tail"),
            RoutePattern::General(_)
        ));
    }

    #[test]
    fn test_catch_all_prefix_captures_tail() {
        let pattern = RoutePattern::parse("/docs/old/:path*");
        assert_eq!(
            values(&pattern, "/docs/old/a/b"),
            Some(vec![pair("path", "a/b")])
        );
        assert_eq!(values(&pattern, "/docs/old"), Some(vec![pair("path", "")]));
        assert_eq!(values(&pattern, "/docs/older"), None);
        assert_eq!(values(&pattern, "/docs/new/a"), None);
    }

    #[test]
    fn test_segments_positional_match() {
        let pattern = RoutePattern::parse("/docs/:sdk/setup/:rest*");
        assert_eq!(
            values(&pattern, "/docs/react/setup/a/b"),
            Some(vec![pair("sdk", "react"), pair("rest", "a/b")])
        );
        // Literal mismatch
        assert_eq!(values(&pattern, "/docs/react/install/a"), None);
        // Pattern longer than URL
        assert_eq!(values(&pattern, "/docs/react"), None);
    }

    #[test]
    fn test_segments_without_catch_all_need_exact_length() {
        let pattern = RoutePattern::parse("/docs/:sdk/overview");
        assert_eq!(
            values(&pattern, "/docs/nextjs/overview"),
            Some(vec![pair("sdk", "nextjs")])
        );
        assert_eq!(
            values(&pattern, "/docs/nextjs/overview/"),
            Some(vec![pair("sdk", "nextjs")])
        );
        assert_eq!(values(&pattern, "/docs/nextjs/overview/extra"), None);
    }

    #[test]
    fn test_general_case_insensitive_and_decoded() {
        let pattern = RoutePattern::parse("/docs/users/:id(\\d+)");
        assert_eq!(
            values(&pattern, "/DOCS/Users/42"),
            Some(vec![pair("id", "42")])
        );
        assert_eq!(values(&pattern, "/docs/users/abc"), None);

        let pattern = RoutePattern::parse("/docs/tag/:name?");
        assert_eq!(
            values(&pattern, "/docs/tag/hello%20world"),
            Some(vec![pair("name", "hello%20world")])
        );
        assert_eq!(values(&pattern, "/docs/tag"), Some(vec![]));
    }

    #[test]
    fn test_general_reencodes_component() {
        let pattern = RoutePattern::parse("/docs/q/:term?");
        // `%2F` decodes to `/`, which is then re-encoded as a component
        assert_eq!(
            values(&pattern, "/docs/q/a%2Fb"),
            Some(vec![pair("term", "a%2Fb")])
        );
    }

    #[test]
    fn test_malformed_pattern_never_matches() {
        let pattern = RoutePattern::parse("/docs/:id(\\d+");
        assert!(pattern.never_matches_reason().is_some());
        assert_eq!(pattern.captures("/docs/1"), None);
        assert_eq!(pattern.captures("/docs/:id(\\d+"), None);

        let pattern = RoutePattern::parse("/docs/:id([)");
        assert!(pattern.never_matches_reason().is_some());
        assert_eq!(pattern.captures("/docs/x"), None);
    }

    #[test]
    fn test_segments_trailing_slash_in_source() {
        let pattern = RoutePattern::parse("/docs/:sdk/");
        let RoutePattern::Segments(segments) = &pattern else {
            panic!("expected segments");
        };
        assert_eq!(
            segments,
            &vec![Segment::Literal("docs".into()), Segment::Param("sdk".into())]
        );
        assert_eq!(values(&pattern, "/docs/react"), Some(vec![pair("sdk", "react")]));
        assert_eq!(values(&pattern, "/docs/react/"), Some(vec![pair("sdk", "react")]));
    }

    #[test]
    fn test_nested_capturing_group_never_matches() {
        let pattern = RoutePattern::parse("/docs/:kind(guides|(ref))/:page");
        assert!(
            pattern
                .never_matches_reason()
                .is_some_and(|reason| reason.contains("capturing group"))
        );
        assert_eq!(pattern.captures("/docs/guides/x"), None);

        let pattern = RoutePattern::parse("/docs/:kind(guides|(?P<inner>ref))/:page");
        assert!(pattern.never_matches_reason().is_some());
    }

    #[test]
    fn test_nested_non_capturing_group_keeps_positions() {
        let pattern = RoutePattern::parse("/docs/:kind(guides|(?:ref))/:page");
        assert!(pattern.never_matches_reason().is_none());
        assert_eq!(
            values(&pattern, "/docs/ref/x"),
            Some(vec![pair("kind", "ref"), pair("page", "x")])
        );
    }

    #[test]
    fn test_repeating_general_param_never_matches() {
        let pattern = RoutePattern::parse("/docs/:id(\\d+)+");
        assert!(pattern.never_matches_reason().is_some());
    }
}
