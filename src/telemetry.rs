//! Logging setup for the binary
//!
//! Logs go to stderr so rendered panels and JSON on stdout stay clean.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "title_critic=debug"
    } else {
        "title_critic=info"
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the verbosity flag. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(verbose).into());

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
