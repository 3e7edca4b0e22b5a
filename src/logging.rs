//! Logging and tracing setup.
//!
//! All logs go to **stderr**; stdout belongs to the host. Lifecycle callbacks
//! and dispatcher entry points run inside `tracing` spans, and the transport
//! logs every request attempt at `debug`.
//!
//! # Environment Variables
//!
//! - `HEMMER_LOG`: filter directives for this provider (e.g. `debug`,
//!   `hemmer_provider_aws::transport=debug`). Takes precedence over `RUST_LOG`.
//! - `RUST_LOG`: consulted when `HEMMER_LOG` is unset.
//!
//! # Example
//!
//! ```bash
//! # Show every request the transport sends
//! HEMMER_LOG=hemmer_provider_aws::transport=debug ./host apply
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Provider-specific filter variable, checked before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "HEMMER_LOG";

/// Build the filter from `HEMMER_LOG`, then `RUST_LOG`, then `default_level`.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Initialize the default logging subscriber at `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging with a custom default level, used when neither
/// `HEMMER_LOG` nor `RUST_LOG` is set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning false if already initialized.
///
/// Safe to call from every test.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}
