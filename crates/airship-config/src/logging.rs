//! Tracing subscriber initialization

use crate::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over the configured level)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// Logs always go to stderr; stdout carries command results.
///
/// # Examples
///
/// ```bash
/// # Trace configuration lookups only
/// RUST_LOG=airship_lang_typescript=trace airship output src/Shared/Foo.ts
///
/// # Machine-readable logs
/// LOG_FORMAT=json airship compile
/// ```
pub fn initialize(config: &LoggingConfig) {
    let log_level = config.level.parse().unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|f| match f.to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "human" => Some(LogFormat::Pretty),
            _ => None,
        })
        .unwrap_or_else(|| config.format.clone());

    // try_init: a second initialization (tests, embedding) is not an error
    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already initialized");
    }
}

/// Span wrapping one CLI command, so every nested event carries the command
/// name and the file it was invoked on.
pub fn command_span(command: &str, file: Option<&std::path::Path>) -> tracing::Span {
    tracing::info_span!(
        "command",
        command = %command,
        file = %file.map(|f| f.display().to_string()).unwrap_or_default()
    )
}
