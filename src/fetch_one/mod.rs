//! Single-resource download into the mirror layout.
//!
//! Fetches one URL through the raw-request capability (no page render) and
//! stores it where the crawler would have: `<output_root>/<host>/<path>[.ext]`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use url::Url;

use crate::http_client::{HttpClient, RawRequest};
use crate::path_mapper::PathMapper;
use crate::utils::Origin;

/// Download `url` into `output_root` over a fresh [`HttpClient`].
pub async fn fetch_one(url: &str, output_root: &Path) -> Result<PathBuf> {
    fetch_one_with(&HttpClient::new()?, url, output_root).await
}

/// Download `url` into `output_root` through `client` and return the written path.
///
/// The request carries `Referer: <origin>`. Any non-2xx status is an error.
pub async fn fetch_one_with<C: RawRequest + ?Sized>(
    client: &C,
    url: &str,
    output_root: &Path,
) -> Result<PathBuf> {
    let target = Url::parse(url).with_context(|| format!("Invalid URL: {url}"))?;
    let origin = Origin::from_url(&target)?;

    let response = client
        .download(target.as_str(), Some(&origin.to_string()))
        .await
        .with_context(|| format!("Failed to fetch {target}"))?;

    let mapper = PathMapper::new(origin, output_root);
    let dest = mapper
        .map(target.as_str(), false, response.content_type.as_deref())
        .with_context(|| format!("No local path for {target}"))?;

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&dest, &response.body)
        .await
        .with_context(|| format!("Failed to write {}", dest.display()))?;

    info!(
        target: "site_mirror::fetch",
        "Saved {} bytes from {target}",
        response.body.len()
    );
    Ok(dest)
}
