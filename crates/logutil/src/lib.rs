//! Utilities for logging.
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggingMode {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// Map a `-v` count to a max level.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize a global subscriber.
///
/// `RUST_LOG` takes precedence over the level derived from the verbosity.
/// Calling this more than once is a no-op.
pub fn init(verbosity: u8, mode: LoggingMode) {
    let level = level_for_verbosity(verbosity);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true);

    let _ = match mode {
        LoggingMode::Pretty => builder.pretty().try_init(),
        LoggingMode::Json => builder.json().try_init(),
        LoggingMode::Compact => builder.compact().try_init(),
    };
}

/// Initialize a subscriber that writes through the test harness.
pub fn init_test() {
    let _ = SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(Level::INFO, level_for_verbosity(0));
        assert_eq!(Level::DEBUG, level_for_verbosity(1));
        assert_eq!(Level::TRACE, level_for_verbosity(2));
        assert_eq!(Level::TRACE, level_for_verbosity(9));
    }

    #[test]
    fn init_twice_is_noop() {
        init(0, LoggingMode::Compact);
        init(2, LoggingMode::Json);
    }
}
