//! Console logging for the analyzer
//!
//! - Hierarchical, optionally colored console output on stderr
//! - `RUST_LOG` overrides the configured level
//! - Helper functions for the recurring pipeline events

mod formatter;
mod helpers;
mod text_utils;

pub use helpers::{log_analysis_complete, log_routing_decision, log_strategy_failure};

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use formatter::CleanFormatter;

pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Installs the global subscriber writing to stderr.
///
/// `level` is the default directive when `RUST_LOG` is unset. Fails if a
/// subscriber is already installed.
///
/// ```no_run
/// zai_video_router::utils::setup_logging("warn", false, true).unwrap();
/// ```
pub fn setup_logging(
    level: &str,
    show_timestamps: bool,
    colored: bool,
) -> crate::utils::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(parse_level(level).into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(false)
        .event_format(CleanFormatter::new(show_timestamps, colored));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| crate::utils::Error::Logging(e.to_string()))?;

    Ok(())
}
