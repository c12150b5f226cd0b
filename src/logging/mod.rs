//! Tracing subscriber setup for the scan runner and anything embedding the
//! library.
//!
//! `APP_ENV=production` (or `prod`) emits one JSON object per event on
//! stdout for log collectors. Every other environment gets compact coloured
//! text on stderr, apart from the result rows the runner prints to stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::get_environment;

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn is_production(env: &str) -> bool {
    matches!(env, "production" | "prod")
}

/// Install the global subscriber. A second call keeps the first subscriber
/// and only logs at debug level.
pub fn init_logging() {
    let env = get_environment();

    let result = if is_production(&env) {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!(environment = %env, error = %e, "subscriber already installed");
    }
}
