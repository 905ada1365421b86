use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        // queue transitions are logged at debug
        "info,alert_queue=debug"
    } else {
        "info"
    }
}

/// Install the global `tracing` subscriber. Call once, from `main`.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` turns on queue
/// transition logging.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Logging initialized");
}
