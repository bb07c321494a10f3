//! Deterministic URL → local file mapping for mirrored content.
//!
//! Every file the mirror writes goes through [`PathMapper::map`], which
//! places it at `<output_root>/<host>/<url path>[.ext]`. The mapping is pure:
//! no I/O, no state, the same inputs always give the same path.
//!
//! Query strings are ignored, so `/a?x=1` and `/a?x=2` land on the same file
//! and the last write wins.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::utils::Origin;

static REPEATED_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"/{2,}").expect("static regex"));

/// Maps same-origin URLs to paths under an output root.
#[derive(Debug, Clone)]
pub struct PathMapper {
    origin: Origin,
    output_root: PathBuf,
}

impl PathMapper {
    #[must_use]
    pub fn new(origin: Origin, output_root: impl Into<PathBuf>) -> Self {
        Self {
            origin,
            output_root: output_root.into(),
        }
    }

    #[must_use]
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Directory holding everything mirrored for this origin.
    #[must_use]
    pub fn host_dir(&self) -> PathBuf {
        self.output_root.join(self.origin.host())
    }

    /// Map `url` to its local path.
    ///
    /// Returns `None` for unparseable or cross-origin URLs. Directory-style
    /// paths get `index.html` (documents) or `index` (assets); extension-less
    /// documents get `.html`, extension-less assets get an extension inferred
    /// from `content_type` when it is one we recognise.
    #[must_use]
    pub fn map(&self, url: &str, is_document: bool, content_type: Option<&str>) -> Option<PathBuf> {
        let parsed = Url::parse(url).ok()?;
        if !self.origin.contains(&parsed) {
            return None;
        }

        let mut path = REPEATED_SLASHES.replace_all(parsed.path(), "/").into_owned();
        if path.ends_with('/') {
            path.push_str(if is_document { "index.html" } else { "index" });
        }

        if !has_extension(&path) {
            if is_document {
                path.push_str(".html");
            } else if let Some(ext) = content_type.and_then(extension_for_content_type) {
                path.push_str(&ext);
            }
        }

        Some(self.host_dir().join(path.trim_start_matches('/')))
    }
}

/// File extension (with leading dot) for a declared content type.
///
/// Parameters such as `; charset=utf-8` are ignored. Any `image/<subtype>`
/// maps to `.<subtype>` (`jpeg` becomes `jpg`). Unrecognised types return
/// `None` and the path is left without an extension.
#[must_use]
pub fn extension_for_content_type(content_type: &str) -> Option<String> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if let Some(subtype) = essence.strip_prefix("image/") {
        if subtype.is_empty() {
            return None;
        }
        return Some(format!(".{}", subtype.replace("jpeg", "jpg")));
    }

    let ext = match essence.as_str() {
        "text/css" => ".css",
        "application/javascript" | "text/javascript" => ".js",
        "font/woff2" => ".woff2",
        "font/woff" => ".woff",
        "font/ttf" => ".ttf",
        "application/json" => ".json",
        _ => return None,
    };
    Some(ext.to_string())
}

/// Whether the last path segment carries an extension.
///
/// A leading dot alone (`.htaccess`) does not count.
fn has_extension(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or_default();
    if file_name.chars().all(|c| c == '.') {
        return false;
    }
    matches!(file_name.rfind('.'), Some(idx) if idx > 0)
}
