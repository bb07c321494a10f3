//! `mirror-fetch-one <absolute-url> [output-root]`
//!
//! Downloads one resource into `<output-root>/<host>/<path>` without rendering a page.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use site_mirror::utils::{DEFAULT_OUTPUT_ROOT, is_valid_url};
use site_mirror::{fetch_one, init_logging};

#[derive(Debug, Parser)]
#[command(name = "mirror-fetch-one", version, about = "Download a single resource into the mirror layout")]
struct Cli {
    /// Absolute http(s) URL of the resource
    url: String,

    /// Directory that receives `<host>/...`
    #[arg(default_value = DEFAULT_OUTPUT_ROOT)]
    output_root: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    if !is_valid_url(&cli.url) {
        eprintln!("Usage: mirror-fetch-one <absolute-url> [output-root]");
        return ExitCode::FAILURE;
    }

    match fetch_one(&cli.url, &cli.output_root).await {
        Ok(dest) => {
            println!("Saved: {}", dest.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("FAILED: {e:#}");
            ExitCode::FAILURE
        }
    }
}
