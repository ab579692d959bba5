//! Tracing subscriber setup.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Builds the filter directive: `RUST_LOG` wins when set, otherwise the
/// configured level applies with sqlx statement logging held at warn so
/// guest-submitted text does not end up in query logs.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter(config))
}

fn fallback_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::new(format!("{},sqlx::query=warn", config.level))
}

/// Initializes the logging subsystem based on configuration.
///
/// `format = "json"` emits structured lines for log aggregation; anything
/// else gets the human-readable pretty format used in development.
pub fn init_logging(config: &LoggingConfig) {
    let subscriber = tracing_subscriber::registry().with(env_filter(config));

    if config.format == "json" {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_current_span(true)
                    .with_target(true),
            )
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .pretty()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_target(true),
            )
            .init();
    }
}
