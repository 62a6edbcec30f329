//! Logging setup using `tracing_subscriber`, in either JSON or pretty
//! format. The `RUST_LOG` environment variable overrides the default
//! filter when set.

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,pack_tally=debug";

/// Initializes the global subscriber.
///
/// # Arguments
///
/// * `pretty` - whether to use the human-readable format instead of JSON
pub fn setup_logging(pretty: bool) {
    match pretty {
        true => setup_logging_pretty(),
        false => setup_logging_json(),
    }
}

fn setup_logging_json() {
    let main_layer = tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_target(false)
        .with_line_number(true)
        .with_file(true)
        .with_timer(UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES)))
        .with(main_layer)
        .init()
}

fn setup_logging_pretty() {
    let main_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_timer(UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES)))
        .with(main_layer)
        .init()
}
