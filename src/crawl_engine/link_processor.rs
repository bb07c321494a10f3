//! Link filtering for the crawl queue
//!
//! Turns raw `<a href>` values from a rendered page into crawl targets:
//! resolved, same-origin, not administrative, fragment-free.

use url::Url;

use crate::config::MirrorConfig;
use crate::utils::Origin;

/// Whether `path` is an administrative endpoint excluded from traversal.
#[must_use]
pub fn is_administrative_path(path: &str, prefixes: &[String], suffixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
        || suffixes.iter().any(|suffix| path.ends_with(suffix.as_str()))
}

/// Resolve `href` against the page it appeared on and decide whether to crawl it.
///
/// Returns the normalized target, or `None` for unresolvable, cross-origin
/// and administrative links.
#[must_use]
pub fn filter_link(
    href: &str,
    page_url: &Url,
    origin: &Origin,
    config: &MirrorConfig,
) -> Option<String> {
    let mut target = page_url.join(href.trim()).ok()?;
    if !origin.contains(&target) {
        return None;
    }
    if is_administrative_path(
        target.path(),
        config.excluded_path_prefixes(),
        config.excluded_path_suffixes(),
    ) {
        return None;
    }
    target.set_fragment(None);
    Some(target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Url, Origin, MirrorConfig) {
        let config = MirrorConfig::builder()
            .output_root("out")
            .start_url("https://h.test/")
            .build()
            .unwrap();
        let origin = config.origin().unwrap();
        (Url::parse("https://h.test/blog/post/").unwrap(), origin, config)
    }

    #[test]
    fn resolves_relative_links_and_strips_fragments() {
        let (page, origin, config) = setup();
        assert_eq!(
            filter_link("../other/#comments", &page, &origin, &config).as_deref(),
            Some("https://h.test/blog/other/")
        );
        assert_eq!(
            filter_link("/about?x=1#top", &page, &origin, &config).as_deref(),
            Some("https://h.test/about?x=1")
        );
    }

    #[test]
    fn drops_cross_origin_and_non_http() {
        let (page, origin, config) = setup();
        assert_eq!(filter_link("https://other.test/", &page, &origin, &config), None);
        assert_eq!(filter_link("http://h.test/", &page, &origin, &config), None);
        assert_eq!(filter_link("mailto:me@h.test", &page, &origin, &config), None);
        assert_eq!(filter_link("javascript:void(0)", &page, &origin, &config), None);
    }

    #[test]
    fn drops_administrative_paths() {
        let (page, origin, config) = setup();
        assert_eq!(filter_link("/wp-admin/edit.php", &page, &origin, &config), None);
        assert_eq!(filter_link("/wp-json/wp/v2/posts", &page, &origin, &config), None);
        assert_eq!(filter_link("/xmlrpc.php", &page, &origin, &config), None);
        assert_eq!(filter_link("/blog/xmlrpc.php", &page, &origin, &config), None);
        assert!(filter_link("/wp-content/uploads/a.png", &page, &origin, &config).is_some());
    }

    #[test]
    fn administrative_rules_are_configurable() {
        let prefixes = vec!["/private".to_string()];
        assert!(is_administrative_path("/private/x", &prefixes, &[]));
        assert!(!is_administrative_path("/wp-admin/", &prefixes, &[]));
    }
}
