use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(log_level: &str) -> String {
    format!("prodev={0},prodev_cli={0}", log_level)
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `log_level`.
///
/// Logs go to stderr so command output on stdout stays machine readable.
pub fn init(log_level: &str) {
    let filter = default_filter(log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
