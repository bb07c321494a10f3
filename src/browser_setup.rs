//! Locating, downloading and launching Chromium.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

use crate::utils::constants::CHROME_USER_AGENT;

#[cfg(target_os = "windows")]
const INSTALL_LOCATIONS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files\Chromium\Application\chrome.exe",
];

#[cfg(target_os = "macos")]
const INSTALL_LOCATIONS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "~/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/opt/homebrew/bin/chromium",
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const INSTALL_LOCATIONS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    "/usr/local/bin/chromium",
    "/opt/google/chrome/chrome",
];

/// Executable names tried through `which` on Unix.
const PATH_COMMANDS: &[&str] = &["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Flags for an unattended, quiet browser that reports the mirror's identity.
const LAUNCH_ARGS: &[&str] = &[
    "--lang=en-US",
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-notifications",
    "--disable-dev-shm-usage",
    "--disable-setuid-sandbox",
    "--no-first-run",
    "--no-default-browser-check",
    "--no-sandbox",
    "--disable-extensions",
    "--disable-popup-blocking",
    "--disable-background-networking",
    "--disable-breakpad",
    "--password-store=basic",
    "--use-mock-keychain",
    "--mute-audio",
];

fn expand_home(location: &str) -> Option<PathBuf> {
    match location.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(location)),
    }
}

fn lookup_on_path(command: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(command).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!found.is_empty()).then(|| PathBuf::from(found))
}

/// Find an installed Chrome/Chromium.
///
/// `CHROMIUM_PATH` wins when it points at an existing file, then the usual
/// install locations for this platform, then `which` on Unix.
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(configured) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(&configured);
        if path.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!("CHROMIUM_PATH points to a missing file: {configured}");
    }

    if let Some(path) = INSTALL_LOCATIONS
        .iter()
        .filter_map(|location| expand_home(location))
        .find(|path| path.exists())
    {
        info!("Found browser at: {}", path.display());
        return Ok(path);
    }

    if cfg!(unix)
        && let Some(path) = PATH_COMMANDS.iter().find_map(|cmd| lookup_on_path(cmd))
    {
        info!("Found browser on PATH: {}", path.display());
        return Ok(path);
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download a Chromium build into the user cache and return its executable.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("site_mirror")
        .join("chromium");
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create {}", cache_dir.display()))?;

    info!("Downloading Chromium into {}", cache_dir.display());
    let options = BrowserFetcherOptions::builder()
        .with_path(&cache_dir)
        .build()
        .context("Failed to build fetcher options")?;
    let revision = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Failed to fetch browser")?;

    info!("Downloaded Chromium to: {}", revision.folder_path.display());
    Ok(revision.executable_path)
}

fn browser_config(
    executable: PathBuf,
    headless: bool,
    user_data_dir: PathBuf,
    request_timeout: Duration,
) -> Result<BrowserConfig> {
    let mut builder = BrowserConfigBuilder::default()
        .chrome_executable(executable)
        .user_data_dir(user_data_dir)
        .request_timeout(request_timeout)
        .window_size(1920, 1080)
        .arg(format!("--user-agent={CHROME_USER_AGENT}"));

    builder = if headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };
    for arg in LAUNCH_ARGS {
        builder = builder.arg(*arg);
    }

    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))
}

/// Find or download Chromium and launch it.
///
/// * `chrome_data_dir` - profile directory; a per-process temp dir when `None`
/// * `request_timeout` - upper bound for a single CDP command such as `Page.navigate`
///
/// Returns the browser, the task driving its CDP connection and the profile
/// directory in use. The caller owns all three and must release them.
pub async fn launch_browser(
    headless: bool,
    chrome_data_dir: Option<PathBuf>,
    request_timeout: Duration,
) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let executable = match find_browser_executable().await {
        Ok(path) => path,
        Err(e) => {
            warn!("{e}; falling back to a managed download");
            download_managed_browser().await?
        }
    };

    let user_data_dir = chrome_data_dir.unwrap_or_else(|| {
        std::env::temp_dir().join(format!("site_mirror_chrome_{}", std::process::id()))
    });
    std::fs::create_dir_all(&user_data_dir)
        .with_context(|| format!("Failed to create {}", user_data_dir.display()))?;

    let config = browser_config(executable, headless, user_data_dir.clone(), request_timeout)?;
    debug!("Launching browser with profile {}", user_data_dir.display());
    let (browser, mut handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            let Err(e) = event else { continue };
            let message = e.to_string();
            // CDP messages chromiumoxide has no type for
            if message.contains("did not match any variant of untagged enum Message")
                || message.contains("Failed to deserialize WS response")
            {
                trace!("Ignoring unrecognised CDP message: {message}");
            } else {
                error!("Browser handler error: {e:?}");
            }
        }
        debug!("Browser handler task completed");
    });

    Ok((browser, handler_task, user_data_dir))
}
