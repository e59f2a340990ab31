//! CLI command definitions and logging setup.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use iniq::config::Config;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log level implied by the resolved settings.
///
/// `quiet` wins over `verbose`.
pub fn log_level(config: &Config) -> LevelFilter {
    if config.quiet {
        LevelFilter::ERROR
    } else if config.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Install the stderr subscriber. `RUST_LOG`, when set, takes precedence.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::builder()
        .with_default_directive(log_level(config).into())
        .from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
