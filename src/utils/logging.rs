//! Logging setup shared by the command-line entry points.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// `log` records emitted by the library are forwarded through the
/// subscriber's log bridge. The chromiumoxide connection/handler targets
/// are silenced because they report every unrecognised CDP event.
pub fn init_logging() {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    for directive in ["chromiumoxide::conn=off", "chromiumoxide::handler=off"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}
