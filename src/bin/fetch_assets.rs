//! `mirror-fetch-assets [base-url]`
//!
//! Reads `index.html` from the current directory and downloads the
//! first-party assets it references. Exits non-zero only when the HTML
//! cannot be read; download failures are listed in the summary.

use std::process::ExitCode;

use clap::Parser;
use site_mirror::utils::DEFAULT_ASSET_BASE_URL;
use site_mirror::{AssetFetchOptions, fetch_assets, init_logging};

#[derive(Debug, Parser)]
#[command(name = "mirror-fetch-assets", version, about = "Download assets referenced by a saved page")]
struct Cli {
    /// Origin that root-relative references resolve against
    #[arg(default_value = DEFAULT_ASSET_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match fetch_assets(&AssetFetchOptions::with_base_url(cli.base_url)).await {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("FAILED: {e:#}");
            ExitCode::FAILURE
        }
    }
}
