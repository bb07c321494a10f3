//! `mirror-crawl <start-url> [output-root] [max-pages]`
//!
//! Mirrors the start URL's origin and prints where the pages went. Per-page
//! failures never change the exit code; only a failure to start the browser does.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use site_mirror::utils::{DEFAULT_MAX_PAGES, DEFAULT_OUTPUT_ROOT, NAVIGATION_TIMEOUT_SECS};
use site_mirror::{MirrorConfig, init_logging, mirror_site};

#[derive(Debug, Parser)]
#[command(name = "mirror-crawl", version, about = "Mirror a same-origin site with Chromium")]
struct Cli {
    /// Page to start from; its origin bounds the crawl
    start_url: String,

    /// Directory that receives `<host>/...`
    #[arg(default_value = DEFAULT_OUTPUT_ROOT)]
    output_root: PathBuf,

    /// Stop after this many pages have been saved
    #[arg(default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Per-page navigation timeout in seconds
    #[arg(long, default_value_t = NAVIGATION_TIMEOUT_SECS)]
    timeout: u64,

    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("FAILED: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = MirrorConfig::builder()
        .output_root(cli.output_root)
        .start_url(cli.start_url)
        .max_pages(cli.max_pages)
        .navigation_timeout_secs(cli.timeout)
        .headless(!cli.headed)
        .build()?;

    let summary = mirror_site(&config).await?;

    if !summary.failed.is_empty() {
        println!("Skipped {} page(s):", summary.failed.len());
        for page in &summary.failed {
            println!("- {} -> {}", page.url, page.failure);
        }
    }
    println!(
        "Done. Saved {} page(s) to {}",
        summary.pages_saved(),
        summary.host_dir.display()
    );
    Ok(())
}
