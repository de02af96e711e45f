use anyhow::Context;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::fmt;

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. Logs go to stderr so that stdout stays
/// clean for `check` and `--print-config`.
///
/// # Errors
/// Fails on an unparsable level or when a subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let default_level: LevelFilter = config
        .level
        .parse()
        .with_context(|| format!("invalid logging.level '{}'", config.level))?;

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
        .add_directive("hyper_util=info".parse()?)
        .add_directive("sqlx=warn".parse()?);

    let (text, json) = match config.format {
        LogFormat::Text => (Some(fmt::layer().with_writer(std::io::stderr)), None),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
        .context("failed to install tracing subscriber")
}
