use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use super::config::{LogFormat, LoggingConfig};

/// Build the filter: `RUST_LOG` wins, then the configured filter, then the level
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = config
            .filter
            .clone()
            .unwrap_or_else(|| format!("listing_media={level},warn", level = config.level));
        EnvFilter::new(directives)
    })
}

/// Initialize structured logging
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init_tracing(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.console_format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry().with(fmt_layer).with(env_filter(config)).try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_level() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            filter: None,
            console_format: LogFormat::Compact,
        };

        if std::env::var("RUST_LOG").is_err() {
            assert!(env_filter(&config).to_string().contains("listing_media=debug"));
        }
    }
}
