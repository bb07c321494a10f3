//! `url(...)` reference extraction from stylesheets.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static CSS_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)url\(([^)]+)\)").expect("static regex"));

/// Strip surrounding whitespace and one layer of matching quotes.
pub(crate) fn unquote(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    trimmed
}

/// Every `url(...)` payload in `css`, unquoted, in source order.
pub(crate) fn css_url_payloads(css: &str) -> impl Iterator<Item = &str> {
    CSS_URL
        .captures_iter(css)
        .filter_map(|caps| caps.get(1))
        .map(|m| unquote(m.as_str()))
        .filter(|payload| !payload.is_empty())
}

/// Absolute URLs referenced by `url(...)` in `css`, resolved against `owner_url`.
///
/// `data:` URIs and references that do not resolve are dropped. The result is
/// de-duplicated and keeps first-seen order.
#[must_use]
pub fn resolve_css_urls(css: &str, owner_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    css_url_payloads(css)
        .filter(|payload| !payload.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:")))
        .filter_map(|payload| owner_url.join(payload).ok())
        .map(|url| url.to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
