//! Log subscriber setup for the native binaries

use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// Filter used when `RUST_LOG` is not set
pub fn default_directives(level: &str) -> String {
    format!(
        "implexa={level},implexa_admin={level},tower_http={level}",
        level = level
    )
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `logging.level`. `logging.format = "json"` selects
/// structured output; `logging.file` appends to a file instead of stderr.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));
    let json = config.format.eq_ignore_ascii_case("json");

    let output: Box<dyn Layer<Registry> + Send + Sync> = match &config.file {
        Some(path) => {
            let file = Arc::new(OpenOptions::new().create(true).append(true).open(path)?);
            if json {
                fmt::layer().json().with_writer(file).boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(file).boxed()
            }
        }
        None if json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        None => fmt::layer().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(output)
        .with(filter)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        let directives = default_directives("debug");
        assert!(directives.contains("implexa=debug"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
