//! URL path helpers.
//!
//! Redirect sources, directory entries and manifest keys are all plain
//! site-root paths (`/docs/guides/setup`). These helpers keep their
//! normalization in one place.

/// Check if a link has a URL scheme (`https:`, `mailto:`, ...).
///
/// A valid scheme is at least one character of ASCII alphanumerics or
/// `+`, `-`, `.` before the colon.
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Check if a link is an absolute HTTP(S) URL.
#[inline]
pub fn is_http(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// Split a URL into path and fragment (fragment is `""` when absent).
#[inline]
pub fn split_path_fragment(url: &str) -> (&str, &str) {
    url.split_once('#').unwrap_or((url, ""))
}

/// Drop a `#fragment` suffix.
#[inline]
pub fn strip_fragment(url: &str) -> &str {
    split_path_fragment(url).0
}

/// Prefix `url` with `base_path` unless it already lives under it.
///
/// `/users` -> `/docs/users`, `users` -> `/docs/users`, `/docs/users` unchanged.
pub fn with_base_path(url: &str, base_path: &str) -> String {
    if is_under_base(url, base_path) {
        return url.to_string();
    }
    if url.starts_with('/') {
        format!("{base_path}{url}")
    } else {
        format!("{base_path}/{url}")
    }
}

/// Check if `url` is `base_path` itself or a path below it.
///
/// `/docsearch` is not under `/docs`.
pub fn is_under_base(url: &str, base_path: &str) -> bool {
    match url.strip_prefix(base_path) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '#', '?']),
        None => false,
    }
}

/// Remove one trailing slash, keeping the root path `/` intact.
#[inline]
pub fn trim_trailing_slash(url: &str) -> &str {
    if url.len() > 1 {
        url.strip_suffix('/').unwrap_or(url)
    } else {
        url
    }
}
