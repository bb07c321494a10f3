//! Regex extraction of first-party asset references from saved HTML.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::css_resolver::css_url_payloads;

static SRC_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:src|href)=(?:"([^"'>]+)"|'([^"'>]+)')"#).expect("static regex")
});

static SRCSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bsrcset=(?:"([^"']+)"|'([^"']+)')"#).expect("static regex")
});

/// Value of whichever alternative of a quoted-attribute pattern matched.
fn quoted_value<'h>(caps: &regex::Captures<'h>) -> Option<&'h str> {
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Root-relative form of a reference, or `None` if it is not site-relative.
///
/// `./x` becomes `/x`, `/x` is kept. Bare relative paths, absolute URLs and
/// protocol-relative `//host/x` references are not site-relative.
fn site_relative(reference: &str) -> Option<&str> {
    if reference.starts_with("./") {
        return Some(&reference[1..]);
    }
    if reference.starts_with('/') && !reference.starts_with("//") {
        return Some(reference);
    }
    None
}

/// Site-relative asset references in `html` whose path contains `marker`.
///
/// Scans `src=`/`href=` attributes, every candidate of `srcset=` attributes
/// and inline `url(...)` values. References come back root-relative
/// (`/wp-content/...`), de-duplicated, in first-seen order.
#[must_use]
pub fn extract_asset_references(html: &str, marker: &str) -> Vec<String> {
    let attributes = SRC_HREF.captures_iter(html).filter_map(|c| quoted_value(&c));

    let srcset_candidates = SRCSET
        .captures_iter(html)
        .filter_map(|c| quoted_value(&c))
        .flat_map(|set| set.split(','))
        .filter_map(|candidate| candidate.split_whitespace().next());

    let inline_css = css_url_payloads(html);

    let mut seen = HashSet::new();
    attributes
        .chain(srcset_candidates)
        .chain(inline_css)
        .filter_map(site_relative)
        .filter(|reference| reference.contains(marker))
        .filter(|reference| seen.insert(*reference))
        .map(str::to_string)
        .collect()
}
